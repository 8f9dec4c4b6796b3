//! # Symbolic Engine Module
//!
//! Core expression tree used by the coordinate engine. Every point component,
//! vector-field component, rotation-matrix entry and integrand is an [`Expr`].
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "x", "theta"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `arcsin`, `arccos`, `arctg`
//! - **Two-argument arctangent**: `atan2(y, x)` - quadrant-correct azimuth
//!
//! ### Key Methods
//! - `set_variable()` / `substitute_variable()` - Replace one variable
//! - `substitute_variables()` - Simultaneous replacement from a map
//! - `free_variables()` - Names of all variables left in the tree
//! - `try_eval()` - Numeric value of a fully bound expression
//!
//! ## Interesting Code Features
//!
//! 1. **Recursive Expression Tree**: Uses Box<Expr> for nested expressions
//! 2. **Operator Overloading**: Implements std::ops traits for `x + y * z`
//! 3. **Single structural walk**: `map_operands` rebuilds a node from its
//!    transformed children, so substitution passes share one traversal
//! 4. **Non-standard Function Names**: Uses mathematical notation (tg, arctg)

#![allow(non_camel_case_types)]

use std::collections::{BTreeSet, HashMap};
use std::f64;
use std::f64::consts::PI;
use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use symbolic_engine::Expr;
/// let r = Expr::Var("r".to_string());
/// let expr = Expr::Mul(Box::new(r), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "theta")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function
    sin(Box<Expr>),
    /// Cosine function
    cos(Box<Expr>),
    /// Tangent function - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Arcsine function
    arcsin(Box<Expr>),
    /// Arccosine function, range [0, pi]
    arccos(Box<Expr>),
    /// Arctangent function - uses mathematical notation 'arctg'
    arctg(Box<Expr>),
    /// Two-argument arctangent atan2(y, x), range (-pi, pi]
    atan2(Box<Expr>, Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctg(expr) => write!(f, "arctg({})", expr),
            Expr::atan2(y, x) => write!(f, "atan2({}, {})", y, x),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        *self = Expr::Add(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::SubAssign for Expr {
    fn sub_assign(&mut self, rhs: Self) {
        *self = Expr::Sub(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        *self = Expr::Mul(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::DivAssign for Expr {
    fn div_assign(&mut self, rhs: Self) {
        *self = Expr::Div(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Const(value)
    }
}

impl From<&str> for Expr {
    /// Bare name becomes a variable; use `parse_expression` for formulas.
    fn from(name: &str) -> Self {
        Expr::Var(name.to_string())
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Rebuilds this node with every direct operand passed through `f`.
    /// Leaves (`Var`, `Const`) are returned unchanged.
    pub fn map_operands<F>(&self, f: F) -> Expr
    where
        F: Fn(&Expr) -> Expr,
    {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Mul(lhs, rhs) => Expr::Mul(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Div(lhs, rhs) => Expr::Div(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Pow(base, exp) => Expr::Pow(Box::new(f(base)), Box::new(f(exp))),
            Expr::Exp(expr) => Expr::Exp(Box::new(f(expr))),
            Expr::Ln(expr) => Expr::Ln(Box::new(f(expr))),
            Expr::sin(expr) => Expr::sin(Box::new(f(expr))),
            Expr::cos(expr) => Expr::cos(Box::new(f(expr))),
            Expr::tg(expr) => Expr::tg(Box::new(f(expr))),
            Expr::arcsin(expr) => Expr::arcsin(Box::new(f(expr))),
            Expr::arccos(expr) => Expr::arccos(Box::new(f(expr))),
            Expr::arctg(expr) => Expr::arctg(Box::new(f(expr))),
            Expr::atan2(y, x) => Expr::atan2(Box::new(f(y)), Box::new(f(x))),
        }
    }

    /// Direct operands of this node, left to right.
    pub fn operands(&self) -> Vec<&Expr> {
        match self {
            Expr::Var(_) | Expr::Const(_) => Vec::new(),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs)
            | Expr::atan2(lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr) => vec![expr.as_ref()],
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        self.substitute_variable(var, &Expr::Const(value))
    }

    /// substitute a variable with an expression
    pub fn substitute_variable(&self, var: &str, expr: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => expr.clone(),
            _ => self.map_operands(|e| e.substitute_variable(var, expr)),
        }
    }

    /// Simultaneous substitution: every variable found in `var_map` is replaced
    /// by its expression. Replacement expressions are inserted as-is and never
    /// traversed again, so `{x -> y, y -> x}` swaps the two names.
    pub fn substitute_variables(&self, var_map: &HashMap<String, Expr>) -> Expr {
        match self {
            Expr::Var(name) => match var_map.get(name) {
                Some(replacement) => replacement.clone(),
                None => self.clone(),
            },
            _ => self.map_operands(|e| e.substitute_variables(var_map)),
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            _ => self
                .operands()
                .into_iter()
                .any(|e| e.contains_variable(var_name)),
        }
    }

    /// Sorted names of all variables occurring in the expression.
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        self.collect_variables(&mut found);
        found
    }

    fn collect_variables(&self, found: &mut BTreeSet<String>) {
        match self {
            Expr::Var(name) => {
                found.insert(name.clone());
            }
            _ => {
                for operand in self.operands() {
                    operand.collect_variables(found);
                }
            }
        }
    }

    /// true when no variable is left in the tree
    pub fn is_numeric(&self) -> bool {
        match self {
            Expr::Var(_) => false,
            Expr::Const(_) => true,
            _ => self.operands().into_iter().all(|e| e.is_numeric()),
        }
    }

    /// Value of a constant node, without any folding.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(val) => Some(*val),
            _ => None,
        }
    }

    /// Evaluates a fully bound expression.
    ///
    /// # Returns
    /// `Err` with the comma-separated list of free variables when the
    /// expression still contains symbols.
    pub fn try_eval(&self) -> Result<f64, String> {
        let free = self.free_variables();
        if !free.is_empty() {
            let names: Vec<String> = free.into_iter().collect();
            return Err(names.join(", "));
        }
        Ok(self.eval_expression(Vec::new(), &[]))
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Square root, represented as self^0.5
    pub fn sqrt(self) -> Expr {
        Expr::Pow(self.boxed(), Box::new(Expr::Const(0.5)))
    }

    /// The constant pi.
    pub fn pi() -> Expr {
        Expr::Const(PI)
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        match self {
            Expr::Const(val) => val == &0.0,
            _ => false,
        }
    }
}

//___________________________________MACROS____________________________________

/// Macro to create symbolic variables from a comma-separated list
/// Usage: symbols!(r, theta, phi) -> creates variables r, theta, phi
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        {
            ($(
                $crate::symbolic::symbolic_engine::Expr::Var(stringify!($var).to_string())
            ),+)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_macro() {
        let (x, theta) = symbols!(x, theta);
        assert_eq!(x, Expr::Var("x".to_string()));
        assert_eq!(theta, Expr::Var("theta".to_string()));
    }

    #[test]
    fn test_neg() {
        let neg_expr = -Expr::Var("x".to_string());
        let expected = Expr::Mul(
            Box::new(Expr::Const(-1.0)),
            Box::new(Expr::Var("x".to_string())),
        );
        assert_eq!(neg_expr, expected);
    }

    #[test]
    fn test_substitute_variables_is_simultaneous() {
        let x = Expr::Var("x".to_string());
        let y = Expr::Var("y".to_string());
        let expr = x.clone() - y.clone();
        let mut map = HashMap::new();
        map.insert("x".to_string(), y.clone());
        map.insert("y".to_string(), x.clone());
        assert_eq!(expr.substitute_variables(&map), y - x);
    }

    #[test]
    fn test_substitute_inside_functions() {
        let expr = Expr::sin(Expr::Var("theta".to_string()).boxed())
            * Expr::cos(Expr::Var("phi".to_string()).boxed());
        let replaced = expr.substitute_variable("theta", &Expr::Const(0.5));
        assert!(!replaced.contains_variable("theta"));
        assert!(replaced.contains_variable("phi"));
    }

    #[test]
    fn test_free_variables_sorted() {
        let expr = Expr::atan2(
            Expr::Var("y".to_string()).boxed(),
            (Expr::Var("x".to_string()) + Expr::Var("a".to_string())).boxed(),
        );
        let free: Vec<String> = expr.free_variables().into_iter().collect();
        assert_eq!(free, vec!["a", "x", "y"]);
    }

    #[test]
    fn test_try_eval() {
        let expr = Expr::Const(2.0).pow(Expr::Const(3.0)) + Expr::Const(1.0);
        assert_eq!(expr.try_eval(), Ok(9.0));
        let open = Expr::Var("k".to_string()) * Expr::Var("r".to_string());
        assert_eq!(open.try_eval(), Err("k, r".to_string()));
    }

    #[test]
    fn test_display_atan2() {
        let expr = Expr::atan2(Expr::Const(1.0).boxed(), Expr::Var("x".to_string()).boxed());
        assert_eq!(expr.to_string(), "atan2(1, x)");
    }
}
