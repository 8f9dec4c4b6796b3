use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{
    brackets_balanced, find_char_positions_outside_brackets, find_pair_to_this_bracket,
    split_outside_brackets,
};
use std::f64::consts::PI;
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedCoordFields::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("k/r^2").unwrap();
/// let value = parsed_expression.eval_expression(vec!["k", "r"], &[4.0, 2.0]);
/// assert_eq!(value, 1.0);
/// ```
//                  search recursion diagram
//                "r^2*sin(theta)+cos(phi)"          |
//                |       left      | right         |
//                |_________________________________|
//                |   rightmost + outside brackets  |
//                |_________________________________|
//                |  r^2*sin(theta) |  cos(phi)     |
//                |_______\|/_______|______\|/______|
//                |  rightmost *    |  function     |
//                |_________________|_______________|
//                | r^2 | sin(theta)|     phi       |
//                |_\|/_|____\|/____|_______________|
//                |  ^  | function  |               |
//                  etc...

const OPERATOR_CHARS: &[char] = &['+', '-', '*', '/', '^', '(', ','];

/// true if the char at `pos` is a sign belonging to a scientific literal like 1e-3
fn is_exponent_sign(input: &str, pos: usize) -> bool {
    let before = &input[..pos];
    let Some(stripped) = before.strip_suffix(['e', 'E']) else {
        return false;
    };
    let mantissa: String = stripped
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if mantissa.is_empty() {
        return false;
    }
    // the mantissa must start a token, otherwise "x2e-1" would be swallowed
    let head = &stripped[..stripped.len() - mantissa.len()];
    match head.chars().last() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '_'),
    }
}

/// Rightmost binary operator among `operators` at bracket depth zero.
/// A '+' or '-' that opens the input or follows another operator is unary and skipped.
fn find_rightmost_operator_outside_brackets(
    input: &str,
    operators: &[char],
) -> Option<(usize, char)> {
    let mut bracket_depth = 0usize;
    let mut last_op = None;
    let mut previous: Option<char> = None;

    for (i, c) in input.char_indices() {
        match c {
            '(' => bracket_depth += 1,
            ')' => bracket_depth = bracket_depth.saturating_sub(1),
            _ if bracket_depth == 0 && operators.contains(&c) => {
                let unary = (c == '+' || c == '-')
                    && match previous {
                        None => true,
                        Some(p) => OPERATOR_CHARS.contains(&p) || is_exponent_sign(input, i),
                    };
                if !unary {
                    last_op = Some((i, c));
                }
            }
            _ => {}
        }
        if !c.is_whitespace() {
            previous = Some(c);
        }
    }
    last_op
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn parse_function_call(name: &str, args: &str) -> Result<Expr, String> {
    let parts = split_outside_brackets(args, ',');
    let single = |parts: &[&str]| -> Result<Box<Expr>, String> {
        if parts.len() != 1 {
            return Err(format!(
                "function '{}' takes 1 argument, got {}",
                name,
                parts.len()
            ));
        }
        Ok(Box::new(parse_expression_func(parts[0])?))
    };
    match name {
        "exp" => Ok(Expr::Exp(single(&parts)?)),
        "ln" | "log" => Ok(Expr::Ln(single(&parts)?)),
        "sin" => Ok(Expr::sin(single(&parts)?)),
        "cos" => Ok(Expr::cos(single(&parts)?)),
        "tg" | "tan" => Ok(Expr::tg(single(&parts)?)),
        "arcsin" | "asin" => Ok(Expr::arcsin(single(&parts)?)),
        "arccos" | "acos" => Ok(Expr::arccos(single(&parts)?)),
        "arctg" | "atan" => Ok(Expr::arctg(single(&parts)?)),
        "sqrt" => Ok(single(&parts)?.sqrt()),
        "atan2" => {
            if parts.len() != 2 {
                return Err(format!("atan2 takes 2 arguments, got {}", parts.len()));
            }
            Ok(Expr::atan2(
                Box::new(parse_expression_func(parts[0])?),
                Box::new(parse_expression_func(parts[1])?),
            ))
        }
        _ => Err(format!("unknown function '{}'", name)),
    }
}

/// Parses `input` into an [`Expr`].
///
/// Precedence from loosest to tightest: binary `+ -`, binary `* /`,
/// unary sign, `^` (right associative), function calls and atoms.
pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty expression".to_string());
    }
    if !brackets_balanced(input) {
        return Err(format!("unbalanced brackets in '{}'", input));
    }

    // whole input wrapped in one pair of brackets
    if input.starts_with('(') && find_pair_to_this_bracket(input, 0) == Some(input.len() - 1) {
        return parse_expression_func(&input[1..input.len() - 1]);
    }

    // addition and subtraction
    if let Some((pos, op)) = find_rightmost_operator_outside_brackets(input, &['+', '-']) {
        let left = parse_expression_func(&input[..pos])?;
        let right = parse_expression_func(&input[pos + 1..])?;
        return Ok(if op == '+' { left + right } else { left - right });
    }

    // multiplication and division, left associative
    if let Some((pos, op)) = find_rightmost_operator_outside_brackets(input, &['*', '/']) {
        let left = parse_expression_func(&input[..pos])?;
        let right = parse_expression_func(&input[pos + 1..])?;
        return Ok(if op == '*' { left * right } else { left / right });
    }

    // unary sign binds looser than '^': -r^2 == -(r^2)
    if let Some(rest) = input.strip_prefix('-') {
        return match parse_expression_func(rest)? {
            Expr::Const(value) => Ok(Expr::Const(-value)),
            inner => Ok(-inner),
        };
    }
    if let Some(rest) = input.strip_prefix('+') {
        return parse_expression_func(rest);
    }

    // power, right associative: split at the leftmost '^'
    if let Some(pos) = find_char_positions_outside_brackets(input, '^') {
        let base = parse_expression_func(&input[..pos])?;
        let exponent = parse_expression_func(&input[pos + 1..])?;
        return Ok(base.pow(exponent));
    }

    // function call: name(args)
    if let Some(open) = input.find('(') {
        let name = input[..open].trim();
        if is_identifier(name) && find_pair_to_this_bracket(input, open) == Some(input.len() - 1)
        {
            return parse_function_call(name, &input[open + 1..input.len() - 1]);
        }
        return Err(format!("cannot parse '{}'", input));
    }

    if let Ok(value) = input.parse::<f64>() {
        return Ok(Expr::Const(value));
    }
    if input == "pi" {
        return Ok(Expr::Const(PI));
    }
    if is_identifier(input) {
        return Ok(Expr::Var(input.to_string()));
    }
    Err(format!("cannot parse '{}'", input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse_expression_func("2.5").unwrap(), Expr::Const(2.5));
        assert_eq!(parse_expression_func("1e-3").unwrap(), Expr::Const(1e-3));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse_expression_func(" theta ").unwrap(), var("theta"));
    }

    #[test]
    fn test_parse_pi() {
        assert_eq!(parse_expression_func("pi").unwrap(), Expr::Const(PI));
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let expr = parse_expression_func("a - b - c").unwrap();
        assert_eq!(expr, (var("a") - var("b")) - var("c"));
    }

    #[test]
    fn test_division_is_left_associative() {
        let expr = parse_expression_func("a/b*c").unwrap();
        assert_eq!(expr, (var("a") / var("b")) * var("c"));
    }

    #[test]
    fn test_power_is_right_associative() {
        let expr = parse_expression_func("a^b^c").unwrap();
        assert_eq!(expr, var("a").pow(var("b").pow(var("c"))));
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        let expr = parse_expression_func("-r^2").unwrap();
        assert_eq!(expr, -(var("r").pow(Expr::Const(2.0))));
    }

    #[test]
    fn test_unary_minus_after_operator() {
        let expr = parse_expression_func("x*-y").unwrap();
        assert_eq!(expr, var("x") * -var("y"));
        let expr = parse_expression_func("r^-2").unwrap();
        assert_eq!(expr, var("r").pow(Expr::Const(-2.0)));
    }

    #[test]
    fn test_scientific_literal_inside_sum() {
        let expr = parse_expression_func("x + 2e-3").unwrap();
        assert_eq!(expr, var("x") + Expr::Const(2e-3));
    }

    #[test]
    fn test_parse_functions() {
        let expr = parse_expression_func("sin(theta)*cos(phi)").unwrap();
        assert_eq!(
            expr,
            Expr::sin(var("theta").boxed()) * Expr::cos(var("phi").boxed())
        );
        let expr = parse_expression_func("sqrt(x^2+y^2)").unwrap();
        assert_eq!(
            expr,
            (var("x").pow(Expr::Const(2.0)) + var("y").pow(Expr::Const(2.0))).sqrt()
        );
    }

    #[test]
    fn test_parse_atan2() {
        let expr = parse_expression_func("atan2(y, -x)").unwrap();
        assert_eq!(expr, Expr::atan2(var("y").boxed(), (-var("x")).boxed()));
    }

    #[test]
    fn test_parse_nested_brackets_evaluates() {
        let expr = parse_expression_func("((k)/(r^2))*(1+0)").unwrap();
        assert_relative_eq!(expr.eval_expression(vec!["k", "r"], &[8.0, 2.0]), 2.0);
    }

    #[test]
    fn test_unknown_function() {
        assert!(parse_expression_func("foo(x)").is_err());
    }

    #[test]
    fn test_unmatched_brackets() {
        assert!(parse_expression_func("sin(x").is_err());
        assert!(parse_expression_func("x)(").is_err());
    }

    #[test]
    fn test_invalid_expression() {
        assert!(parse_expression_func("").is_err());
        assert!(parse_expression_func("2x$").is_err());
        assert!(parse_expression_func("x +").is_err());
    }
}
