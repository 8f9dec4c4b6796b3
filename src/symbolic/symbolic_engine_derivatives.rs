//! # Symbolic Engine Derivatives Module
//!
//! Differentiation, direct numeric evaluation and string parsing entry points
//! for [`Expr`].
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var: &str)` - Analytical partial derivative
//! - `diff_multi_args()` - Partial derivatives with respect to a list of variables
//!
//! ### Function evaluation
//! - `eval_expression()` - Direct evaluation without closure creation
//!
//! ### Parsing
//! - `parse_expression()` - String to symbolic expression
//! - `parse_vector_expression()` - Several strings at once

use crate::symbolic::parse_expr::parse_expression_func;
use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements the standard differentiation rules:
    /// - Power rule: d/dx(x^n) = n*x^(n-1)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule: d/dx(f(g(x))) = f'(g(x))*g'(x)
    ///
    /// A power with a variable exponent uses d/dx(f^g) = f^g * (g' ln f + g f'/f).
    ///
    /// # Examples
    /// ```rust, ignore
    /// let r = Expr::Var("r".to_string());
    /// let f = r.clone().pow(Expr::Const(2.0)); // r^2
    /// let df_dr = f.diff("r"); // 2*r
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Mul(rhs.clone(), rhs.clone())),
            ),
            Expr::Pow(base, exp) => {
                if exp.contains_variable(var) {
                    // f^g * (g' ln f + g f'/f)
                    let log_part = Expr::Mul(Box::new(exp.diff(var)), Box::new(base.as_ref().clone().ln()));
                    let ratio_part = Expr::Div(
                        Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                        base.clone(),
                    );
                    Expr::Mul(
                        Box::new(self.clone()),
                        Box::new(Expr::Add(Box::new(log_part), Box::new(ratio_part))),
                    )
                } else {
                    Expr::Mul(
                        Box::new(Expr::Mul(
                            exp.clone(),
                            Box::new(Expr::Pow(
                                base.clone(),
                                Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                            )),
                        )),
                        Box::new(base.diff(var)),
                    )
                }
            }
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::cos(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
            // d atan2(y, x) = (x dy - y dx) / (x^2 + y^2)
            Expr::atan2(y, x) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(x.clone(), Box::new(y.diff(var)))),
                    Box::new(Expr::Mul(y.clone(), Box::new(x.diff(var)))),
                )),
                Box::new(Expr::Add(
                    Box::new(Expr::Pow(x.clone(), Box::new(Expr::Const(2.0)))),
                    Box::new(Expr::Pow(y.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
        }
    } // end of diff

    /// Partial derivatives with respect to each variable of `all_vars`, simplified.
    pub fn diff_multi_args(&self, all_vars: &[&str]) -> Vec<Expr> {
        all_vars
            .iter()
            .map(|var| self.diff(var).simplify())
            .collect()
    }

    /// Evaluates the expression at the given variable values.
    ///
    /// # Arguments
    /// * `vars` - Variable names in order matching values array
    /// * `values` - Numerical values for each variable
    ///
    /// # Returns
    /// Numerical result of expression evaluation. A variable missing from
    /// `vars` evaluates to NaN; call `try_eval` on a substituted expression
    /// when the caller needs to know which name was unbound.
    pub fn eval_expression(&self, vars: Vec<&str>, values: &[f64]) -> f64 {
        match self {
            Expr::Var(name) => vars
                .iter()
                .position(|&x| x == name)
                .and_then(|index| values.get(index).copied())
                .unwrap_or(f64::NAN),
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values) + rhs.eval_expression(vars, values)
            }
            Expr::Sub(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values) - rhs.eval_expression(vars, values)
            }
            Expr::Mul(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values) * rhs.eval_expression(vars, values)
            }
            Expr::Div(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values) / rhs.eval_expression(vars, values)
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.eval_expression(vars.clone(), values);
                let exp_fn = exp.eval_expression(vars, values);
                base_fn.powf(exp_fn)
            }
            Expr::Exp(expr) => expr.eval_expression(vars, values).exp(),
            Expr::Ln(expr) => expr.eval_expression(vars, values).ln(),
            Expr::sin(expr) => expr.eval_expression(vars, values).sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values).cos(),
            Expr::tg(expr) => expr.eval_expression(vars, values).tan(),
            Expr::arcsin(expr) => expr.eval_expression(vars, values).asin(),
            Expr::arccos(expr) => expr.eval_expression(vars, values).acos(),
            Expr::arctg(expr) => expr.eval_expression(vars, values).atan(),
            Expr::atan2(y, x) => {
                let y_fn = y.eval_expression(vars.clone(), values);
                let x_fn = x.eval_expression(vars, values);
                y_fn.atan2(x_fn)
            }
        }
    } // end of eval_expression

    /// EXPRESSION PARSING FROM STRINGS

    /// Parses a mathematical expression from string representation.
    ///
    /// # Supported Syntax
    /// - Variables: x, theta, var_name
    /// - Constants: 3.14, 2.5e-3, pi
    /// - Operators: +, -, *, /, ^ and unary minus
    /// - Functions: sin, cos, tan/tg, exp, ln/log, sqrt, asin/arcsin,
    ///   acos/arccos, atan/arctg, atan2(y, x)
    /// - Parentheses for grouping
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("k/r^2").unwrap();
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, String> {
        parse_expression_func(input)
    }

    /// Parses multiple expressions from a slice of strings, stopping at the first error.
    pub fn parse_vector_expression(input: &[&str]) -> Result<Vec<Expr>, String> {
        input.iter().map(|s| parse_expression_func(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_diff_power() {
        let r = Expr::Var("r".to_string());
        let f = r.clone().pow(Expr::Const(2.0));
        let df = f.diff("r");
        assert_relative_eq!(df.eval_expression(vec!["r"], &[3.0]), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diff_trig_chain() {
        // d/dtheta sin(2*theta) = 2 cos(2 theta)
        let f = Expr::parse_expression("sin(2*theta)").unwrap();
        let df = f.diff("theta");
        let at = 0.3;
        assert_relative_eq!(
            df.eval_expression(vec!["theta"], &[at]),
            2.0 * (2.0 * at).cos(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_diff_atan2() {
        // d/dx atan2(y, x) = -y / (x^2 + y^2)
        let f = Expr::parse_expression("atan2(y, x)").unwrap();
        let df = f.diff("x");
        let value = df.eval_expression(vec!["x", "y"], &[1.0, 2.0]);
        assert_relative_eq!(value, -2.0 / 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diff_variable_exponent() {
        // d/dx 2^x = 2^x ln 2
        let f = Expr::Const(2.0).pow(Expr::Var("x".to_string()));
        let df = f.diff("x");
        assert_relative_eq!(
            df.eval_expression(vec!["x"], &[1.5]),
            2f64.powf(1.5) * 2f64.ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_eval_atan2_quadrants() {
        let f = Expr::parse_expression("atan2(y, x)").unwrap();
        assert_relative_eq!(f.eval_expression(vec!["x", "y"], &[-1.0, 0.0]), PI);
        assert_relative_eq!(f.eval_expression(vec!["x", "y"], &[0.0, 1.0]), PI / 2.0);
        assert_relative_eq!(
            f.eval_expression(vec!["x", "y"], &[-1.0, -1.0]),
            -3.0 * PI / 4.0
        );
    }

    #[test]
    fn test_eval_missing_variable_is_nan() {
        let f = Expr::Var("q".to_string()) + Expr::Const(1.0);
        assert!(f.eval_expression(vec!["x"], &[1.0]).is_nan());
    }
}
