#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedCoordFields::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("r^2*sin(theta)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let value = parsed_expression.eval_expression(vec!["r", "theta"], &[2.0, 0.0]);
/// assert_eq!(value, 0.0);
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) turns a String expression into a symbolic expression
/// 2) substitutes, simplifies and differentiates it
/// 3) evaluates it numerically once every variable is bound
///# Example#
/// ```
/// use RustedCoordFields::symbolic::symbolic_engine::Expr;
/// let expr = Expr::parse_expression("k/r^2").unwrap();
/// // bind r, keep k symbolic
/// let bound = expr.set_variable("r", 2.0).simplify();
/// println!("bound = {}", bound);
/// assert!(bound.try_eval().is_err());
/// let d_dr = expr.diff("r").simplify();
/// println!("d/dr = {}", d_dr);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
///________________________________________________________________________________________________________________________________________________
/// closed-form integration over a finite rule set
/// Example#
/// ```
/// use RustedCoordFields::symbolic::symbolic_engine::Expr;
/// let expr = Expr::parse_expression("sin(theta)").unwrap();
/// let value = expr.definite_integrate("theta", 0.0, std::f64::consts::PI).unwrap();
/// assert!((value - 2.0).abs() < 1e-12);
/// ```
pub mod symbolic_integration;
pub mod symbolic_simplify;
/// symbolic vectors and matrices, evaluated into nalgebra types
pub mod symbolic_vectors;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket parsing and proceeding
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
