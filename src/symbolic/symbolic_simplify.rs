//! # Symbolic Expression Simplification Module
//!
//! Algebraic simplification and expansion for [`Expr`] trees.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: arithmetic and elementary functions of constants are evaluated
//! 2. **Algebraic Identities**: x + 0 = x, x * 1 = x, x^0 = 1 and friends
//! 3. **Factor Collection**: products are flattened, constants multiplied out and
//!    equal bases merged, so `r^2 * sin(theta) * r^-2` becomes `sin(theta)`
//! 4. **Term Collection**: sums are flattened and terms differing only by a numeric
//!    coefficient are combined, so `3*x*y + 2*y*x` becomes `5*x*y`
//! 5. **Pythagorean Merge**: `c*X*sin(u)^2 + c*X*cos(u)^2` becomes `c*X`, repeatedly, so
//!    `x^2 + y^2 + z^2` of a spherical point collapses to `r^2`
//!
//! ## Expansion
//!
//! `expand()` distributes products over sums, rewrites division by a symbolic
//! denominator as multiplication by its inverse power and raises sums to small
//! positive integer powers. Sums raised to any other power are left intact, which
//! keeps kernels like `(t^2 + 1)^-1.5` recognisable for the integrator.
//!
//! A folded value that is not finite (`ln(-1)`, `0/0` from constants, `(-8)^(1/3)`)
//! is never produced: the node stays symbolic instead.

use crate::symbolic::symbolic_engine::Expr;

/// Largest integer power of a sum that `expand()` multiplies out.
const MAX_EXPANDED_POWER: i32 = 6;

/// Integer value of `value` if it has no fractional part.
pub(crate) fn as_integer(value: f64) -> Option<i32> {
    if value.fract() == 0.0 && value.abs() < 1.0e6 {
        Some(value as i32)
    } else {
        None
    }
}

fn fold_unary(expr: Expr, f: fn(f64) -> f64, wrap: fn(Box<Expr>) -> Expr) -> Expr {
    match expr {
        Expr::Const(a) => {
            let value = f(a);
            if value.is_finite() {
                Expr::Const(value)
            } else {
                wrap(Box::new(Expr::Const(a)))
            }
        }
        other => wrap(Box::new(other)),
    }
}

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Recursive simplification: children first, then the identities of the node.
    ///
    /// ### Power Rules
    /// - `x^0 = 1`, `x^1 = x`, `0^c = 0` for c > 0, `1^x = 1`
    /// - `x^a * x^b = x^(a+b)` (through factor collection)
    /// - `(x^a)^n = x^(a*n)` for integer n only
    ///
    /// ### Trigonometric Rules
    /// - `sin(u)^2 + cos(u)^2 = 1`, also inside larger terms (through term collection)
    /// - `sin(arcsin u) = u`, `cos(arccos u) = u`, `tg(arctg u) = u`
    /// - `sin(arccos u) = cos(arcsin u) = sqrt(1 - u^2)`
    ///
    /// ### Division Rules
    /// - `0 / x = 0`, `x / 1 = x`, `x / x = 1`
    /// - `x / c = (1/c) * x` for a nonzero constant c
    /// - `x^a / x^b = x^(a-b)`
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) => self.clone(),
            Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
                    (Expr::Const(0.0), _) => rhs,
                    (_, Expr::Const(0.0)) => lhs,
                    _ => collect_terms(&Expr::Add(Box::new(lhs), Box::new(rhs))),
                }
            }
            Expr::Sub(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
                    (_, Expr::Const(0.0)) => lhs,
                    _ if lhs == rhs => Expr::Const(0.0),
                    _ => {
                        // a - b = a + (-1)*b
                        let neg_rhs =
                            collect_factors(&Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(rhs)));
                        collect_terms(&Expr::Add(Box::new(lhs), Box::new(neg_rhs)))
                    }
                }
            }
            Expr::Mul(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
                    (Expr::Const(0.0), _) | (_, Expr::Const(0.0)) => Expr::Const(0.0),
                    (Expr::Const(1.0), _) => rhs,
                    (_, Expr::Const(1.0)) => lhs,
                    _ => collect_factors(&Expr::Mul(Box::new(lhs), Box::new(rhs))),
                }
            }
            Expr::Div(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Expr::Const(a / b),
                    (Expr::Const(0.0), _) => Expr::Const(0.0),
                    (_, Expr::Const(1.0)) => lhs,
                    (_, Expr::Const(c)) if *c != 0.0 => {
                        collect_factors(&Expr::Mul(Box::new(Expr::Const(1.0 / c)), Box::new(lhs)))
                    }
                    _ if lhs == rhs && !lhs.is_zero() => Expr::Const(1.0),
                    (Expr::Pow(base1, exp1), Expr::Pow(base2, exp2)) if base1 == base2 => {
                        let new_exp = Expr::Sub(exp1.clone(), exp2.clone()).simplify_();
                        power_or_one(base1.as_ref().clone(), new_exp)
                    }
                    (Expr::Pow(base, exp), other) if base.as_ref() == other => {
                        let new_exp = Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0))).simplify_();
                        power_or_one(other.clone(), new_exp)
                    }
                    (other, Expr::Pow(base, exp)) if base.as_ref() == other => {
                        let new_exp = Expr::Sub(Box::new(Expr::Const(1.0)), exp.clone()).simplify_();
                        power_or_one(other.clone(), new_exp)
                    }
                    _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Pow(base, exp) => {
                let base = base.simplify_();
                let exp = exp.simplify_();
                match (&base, &exp) {
                    (Expr::Const(a), Expr::Const(b)) if a.powf(*b).is_finite() => {
                        Expr::Const(a.powf(*b))
                    }
                    (_, Expr::Const(0.0)) => Expr::Const(1.0),
                    (_, Expr::Const(1.0)) => base,
                    (Expr::Const(0.0), Expr::Const(b)) if *b > 0.0 => Expr::Const(0.0),
                    (Expr::Const(1.0), _) => Expr::Const(1.0),
                    // (x^a)^n = x^(a*n) for integer n
                    (Expr::Pow(inner_base, inner_exp), Expr::Const(n))
                        if as_integer(*n).is_some() =>
                    {
                        let new_exp = Expr::Mul(inner_exp.clone(), Box::new(exp.clone())).simplify_();
                        power_or_one(inner_base.as_ref().clone(), new_exp)
                    }
                    _ => Expr::Pow(Box::new(base), Box::new(exp)),
                }
            }
            Expr::Exp(expr) => fold_unary(expr.simplify_(), f64::exp, Expr::Exp),
            Expr::Ln(expr) => fold_unary(expr.simplify_(), f64::ln, Expr::Ln),
            Expr::sin(expr) => match expr.simplify_() {
                Expr::arcsin(u) => *u,
                Expr::arccos(u) => complementary_root(*u),
                other => fold_unary(other, f64::sin, Expr::sin),
            },
            Expr::cos(expr) => match expr.simplify_() {
                Expr::arccos(u) => *u,
                Expr::arcsin(u) => complementary_root(*u),
                other => fold_unary(other, f64::cos, Expr::cos),
            },
            Expr::tg(expr) => match expr.simplify_() {
                Expr::arctg(u) => *u,
                other => fold_unary(other, f64::tan, Expr::tg),
            },
            Expr::arcsin(expr) => fold_unary(expr.simplify_(), f64::asin, Expr::arcsin),
            Expr::arccos(expr) => fold_unary(expr.simplify_(), f64::acos, Expr::arccos),
            Expr::arctg(expr) => fold_unary(expr.simplify_(), f64::atan, Expr::arctg),
            Expr::atan2(y, x) => {
                let y = y.simplify_();
                let x = x.simplify_();
                match (&y, &x) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a.atan2(*b)),
                    _ => Expr::atan2(Box::new(y), Box::new(x)),
                }
            }
        }
    }

    /// Public interface for expression simplification.
    pub fn simplify(&self) -> Expr {
        self.simplify_()
    }

    //___________________________________EXPANSION____________________________________

    /// Multiplies out products of sums and returns the simplified result.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("(x + 1)*(x - 1)").unwrap();
    /// assert_eq!(expr.expand().to_string(), "((x ^ 2) - 1)");
    /// ```
    pub fn expand(&self) -> Expr {
        self.expand_().simplify_()
    }

    fn expand_(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.expand_()), Box::new(rhs.expand_())),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.expand_()), Box::new(rhs.expand_())),
            Expr::Mul(lhs, rhs) => distribute(&lhs.expand_(), &rhs.expand_()),
            Expr::Div(lhs, rhs) => {
                let numerator = lhs.expand_();
                let denominator = rhs.expand_().simplify_();
                let inverse = match denominator {
                    Expr::Const(c) if c != 0.0 => Expr::Const(1.0 / c),
                    other => inverse_power(other),
                };
                distribute(&numerator, &inverse)
            }
            Expr::Pow(base, exp) => {
                let base = base.expand_();
                let exp = exp.simplify_();
                let integer = exp.as_const().and_then(as_integer);
                match (&base, integer) {
                    (Expr::Add(..) | Expr::Sub(..), Some(n)) if (2..=MAX_EXPANDED_POWER).contains(&n) => {
                        let mut acc = base.clone();
                        for _ in 1..n {
                            acc = distribute(&acc, &base);
                        }
                        acc
                    }
                    // (a*b)^n = a^n * b^n
                    (Expr::Mul(..), Some(_)) => {
                        let mut factors = Vec::new();
                        flatten_mul(&base, &mut factors);
                        factors
                            .into_iter()
                            .map(|f| Expr::Pow(Box::new(f), Box::new(exp.clone())))
                            .reduce(|a, b| Expr::Mul(Box::new(a), Box::new(b)))
                            .unwrap_or(Expr::Const(1.0))
                    }
                    _ => Expr::Pow(Box::new(base), Box::new(exp)),
                }
            }
            _ => self.map_operands(|e| e.expand_()),
        }
    }
}

/// sqrt(1 - u^2). For u = n * q^(-1/2) this is sqrt(q - n^2) * q^(-1/2), so the
/// polar angle of a point with a symbolic coordinate keeps a polynomial radicand.
fn complementary_root(u: Expr) -> Expr {
    let expanded = u.expand();
    let mut factors = Vec::new();
    flatten_mul(&expanded, &mut factors);
    let inverse_root = factors
        .iter()
        .position(|f| matches!(f, Expr::Pow(_, e) if e.as_ref() == &Expr::Const(-0.5)));
    if let Some(index) = inverse_root {
        if let Expr::Pow(q, exponent) = factors.remove(index) {
            let numerator = product(factors).unwrap_or(Expr::Const(1.0));
            let radicand = (q.as_ref().clone() - numerator.pow(Expr::Const(2.0))).expand();
            return (radicand.sqrt() * Expr::Pow(q, exponent)).simplify_();
        }
    }
    (Expr::Const(1.0) - expanded.pow(Expr::Const(2.0)))
        .expand()
        .sqrt()
        .simplify_()
}

/// 1/den as a power, splitting products so each factor gets its own exponent.
fn inverse_power(denominator: Expr) -> Expr {
    let mut factors = Vec::new();
    flatten_mul(&denominator, &mut factors);
    factors
        .into_iter()
        .map(|factor| match factor {
            Expr::Const(c) => Expr::Const(1.0 / c),
            Expr::Pow(base, exp) => Expr::Pow(
                base,
                Box::new(Expr::Mul(Box::new(Expr::Const(-1.0)), exp)),
            ),
            other => Expr::Pow(Box::new(other), Box::new(Expr::Const(-1.0))),
        })
        .reduce(|a, b| Expr::Mul(Box::new(a), Box::new(b)))
        .unwrap_or(Expr::Const(1.0))
}

/// Product of two expanded expressions as a flat sum of products.
fn distribute(lhs: &Expr, rhs: &Expr) -> Expr {
    let mut left_terms = Vec::new();
    let mut right_terms = Vec::new();
    flatten_add(lhs, &mut left_terms);
    flatten_add(rhs, &mut right_terms);
    if left_terms.len() == 1 && right_terms.len() == 1 {
        return Expr::Mul(Box::new(lhs.clone()), Box::new(rhs.clone()));
    }
    let mut products = Vec::with_capacity(left_terms.len() * right_terms.len());
    for a in &left_terms {
        for b in &right_terms {
            products.push(distribute(a, b));
        }
    }
    products
        .into_iter()
        .reduce(|a, b| Expr::Add(Box::new(a), Box::new(b)))
        .unwrap_or(Expr::Const(0.0))
}

fn power_or_one(base: Expr, exponent: Expr) -> Expr {
    match exponent {
        Expr::Const(e) if e == 0.0 => Expr::Const(1.0),
        Expr::Const(e) if e == 1.0 => base,
        exponent => Expr::Pow(Box::new(base), Box::new(exponent)),
    }
}

/// Flatten nested Add/Sub expressions into a list of terms.
///
/// Subtraction becomes addition of the negated term and a `-1 * (a + b)` factor
/// is distributed, so `(a + b) - (c + d)` gives `[a, b, -1*c, -1*d]`.
pub(crate) fn flatten_add(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Add(a, b) => {
            flatten_add(a, out);
            flatten_add(b, out);
        }
        Expr::Sub(a, b) => {
            flatten_add(a, out);
            let neg_b = Expr::Mul(Box::new(Expr::Const(-1.0)), b.clone());
            flatten_add(&neg_b, out);
        }
        Expr::Mul(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
            (Expr::Const(-1.0), Expr::Add(a, b)) | (Expr::Add(a, b), Expr::Const(-1.0)) => {
                flatten_add(&Expr::Mul(Box::new(Expr::Const(-1.0)), a.clone()), out);
                flatten_add(&Expr::Mul(Box::new(Expr::Const(-1.0)), b.clone()), out);
            }
            (Expr::Const(-1.0), Expr::Sub(a, b)) | (Expr::Sub(a, b), Expr::Const(-1.0)) => {
                flatten_add(&Expr::Mul(Box::new(Expr::Const(-1.0)), a.clone()), out);
                flatten_add(b, out);
            }
            _ => out.push(expr.clone()),
        },
        _ => out.push(expr.clone()),
    }
}

/// Flatten nested multiplication expressions into a list of factors.
pub(crate) fn flatten_mul(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Mul(a, b) => {
            flatten_mul(a, out);
            flatten_mul(b, out);
        }
        _ => out.push(expr.clone()),
    }
}

/// Splits a term into its numeric coefficient and the product of the remaining factors.
fn split_coefficient(term: &Expr) -> (f64, Vec<Expr>) {
    let mut factors = Vec::new();
    flatten_mul(term, &mut factors);
    let mut coeff = 1.0;
    let mut rest = Vec::new();
    for factor in factors {
        match factor {
            Expr::Const(c) => coeff *= c,
            other => rest.push(other),
        }
    }
    (coeff, rest)
}

fn product(factors: Vec<Expr>) -> Option<Expr> {
    factors
        .into_iter()
        .reduce(|a, b| Expr::Mul(Box::new(a), Box::new(b)))
}

/// Flattens a product, multiplies the constants and merges factors sharing a base.
fn collect_factors(expr: &Expr) -> Expr {
    let (coeff, factors) = split_coefficient(expr);
    if coeff == 0.0 {
        return Expr::Const(0.0);
    }
    // (key, base, summed exponent) in order of first appearance
    let mut groups: Vec<(String, Expr, Expr)> = Vec::new();
    for factor in factors {
        let (base, exponent) = match factor {
            Expr::Pow(base, exponent) => (*base, *exponent),
            base => (base, Expr::Const(1.0)),
        };
        let key = base.to_string();
        match groups.iter_mut().find(|(k, _, _)| *k == key) {
            Some((_, _, total)) => {
                *total = Expr::Add(Box::new(total.clone()), Box::new(exponent)).simplify_();
            }
            None => groups.push((key, base, exponent)),
        }
    }
    let merged: Vec<Expr> = groups
        .into_iter()
        .filter(|(_, _, exponent)| !exponent.is_zero())
        .map(|(_, base, exponent)| power_or_one(base, exponent))
        .collect();
    match product(merged) {
        None => Expr::Const(coeff),
        Some(p) if coeff == 1.0 => p,
        Some(p) => Expr::Mul(Box::new(Expr::Const(coeff)), Box::new(p)),
    }
}

/// Flattens a sum and adds up the coefficients of terms with the same factors.
fn collect_terms(expr: &Expr) -> Expr {
    let mut terms = Vec::new();
    flatten_add(expr, &mut terms);
    // (key, coefficient, factors) in order of first appearance; key "" holds the constant
    let mut groups: Vec<(String, f64, Vec<Expr>)> = Vec::new();
    for term in &terms {
        let (coeff, factors) = split_coefficient(term);
        let key = term_key(&factors);
        match groups.iter_mut().find(|(k, _, _)| *k == key) {
            Some((_, total, _)) => *total += coeff,
            None => groups.push((key, coeff, factors)),
        }
    }
    merge_pythagorean(&mut groups);
    let mut result: Option<Expr> = None;
    for (_, coeff, factors) in groups {
        if coeff == 0.0 {
            continue;
        }
        let magnitude = match &result {
            Some(_) if coeff < 0.0 => -coeff,
            _ => coeff,
        };
        let term = match product(factors) {
            None => Expr::Const(magnitude),
            Some(p) if magnitude == 1.0 => p,
            Some(p) => Expr::Mul(Box::new(Expr::Const(magnitude)), Box::new(p)),
        };
        result = Some(match result {
            None => term,
            Some(acc) if coeff < 0.0 => Expr::Sub(Box::new(acc), Box::new(term)),
            Some(acc) => Expr::Add(Box::new(acc), Box::new(term)),
        });
    }
    result.unwrap_or(Expr::Const(0.0))
}

fn term_key(factors: &[Expr]) -> String {
    let mut names: Vec<String> = factors.iter().map(|f| f.to_string()).collect();
    names.sort();
    names.join("*")
}

/// `(sin(u), u, m)` for a factor `sin(u)^m` with integer m >= 2, cosine when `sine` is false
fn squared_trig(factor: &Expr, sine: bool) -> Option<(&Expr, &Expr, i32)> {
    let Expr::Pow(base, exponent) = factor else {
        return None;
    };
    let power = exponent.as_const().and_then(as_integer).filter(|m| *m >= 2)?;
    match (base.as_ref(), sine) {
        (Expr::sin(u), true) | (Expr::cos(u), false) => Some((base.as_ref(), u.as_ref(), power)),
        _ => None,
    }
}

/// factors with `factors[index] = base^power` replaced by `base^(power - 2)`
fn lowered_by_square(factors: &[Expr], index: usize, base: &Expr, power: i32) -> Vec<Expr> {
    let mut lowered = factors.to_vec();
    match power - 2 {
        0 => {
            lowered.remove(index);
        }
        1 => lowered[index] = base.clone(),
        n => lowered[index] = base.clone().pow(Expr::Const(n as f64)),
    }
    lowered
}

fn same_coefficient(a: f64, b: f64) -> bool {
    a != 0.0 && (a - b).abs() <= 1e-12 * a.abs().max(b.abs())
}

/// Indices of two groups `c*X*sin(u)^2` and `c*X*cos(u)^2` and the shared factors X.
fn find_pythagorean_pair(
    groups: &[(String, f64, Vec<Expr>)],
) -> Option<(usize, usize, Vec<Expr>)> {
    for (i, (_, ci, fi)) in groups.iter().enumerate() {
        for (a, factor) in fi.iter().enumerate() {
            let Some((sin_base, u, m)) = squared_trig(factor, true) else {
                continue;
            };
            let rest = lowered_by_square(fi, a, sin_base, m);
            let key = term_key(&rest);
            for (j, (_, cj, fj)) in groups.iter().enumerate() {
                if j == i || !same_coefficient(*ci, *cj) {
                    continue;
                }
                let matched = fj.iter().enumerate().any(|(b, other)| {
                    squared_trig(other, false).is_some_and(|(cos_base, v, n)| {
                        v == u && term_key(&lowered_by_square(fj, b, cos_base, n)) == key
                    })
                });
                if matched {
                    return Some((i, j, rest));
                }
            }
        }
    }
    None
}

/// Replaces `c*X*sin(u)^2 + c*X*cos(u)^2` by `c*X` until no such pair is left.
fn merge_pythagorean(groups: &mut Vec<(String, f64, Vec<Expr>)>) {
    while let Some((i, j, rest)) = find_pythagorean_pair(groups) {
        let coeff = groups[i].1;
        groups.remove(i.max(j));
        groups.remove(i.min(j));
        let key = term_key(&rest);
        match groups.iter_mut().find(|(k, _, _)| *k == key) {
            Some((_, total, _)) => *total += coeff,
            None => groups.push((key, coeff, rest)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    #[test]
    fn test_constant_folding() {
        let expr = Expr::Const(2.0) * Expr::Const(3.0) + Expr::Const(1.0);
        assert_eq!(expr.simplify(), Expr::Const(7.0));
        let expr = Expr::cos(Expr::Const(0.0).boxed()) + Expr::sin(Expr::Const(PI / 2.0).boxed());
        assert_eq!(expr.simplify(), Expr::Const(2.0));
    }

    #[test]
    fn test_atan2_folding() {
        let expr = Expr::atan2(Expr::Const(1.0).boxed(), Expr::Const(-1.0).boxed());
        assert_relative_eq!(expr.simplify().as_const().unwrap(), 3.0 * PI / 4.0);
        let origin = Expr::atan2(Expr::Const(0.0).boxed(), Expr::Const(0.0).boxed());
        assert_eq!(origin.simplify(), Expr::Const(0.0));
    }

    #[test]
    fn test_non_finite_folding_stays_symbolic() {
        let expr = Expr::Ln(Expr::Const(-1.0).boxed());
        assert_eq!(expr.simplify(), expr);
        let expr = Expr::Const(1.0) / Expr::Const(0.0);
        assert!(expr.simplify().as_const().is_none());
    }

    #[test]
    fn test_identities() {
        let x = var("x");
        assert_eq!((x.clone() + Expr::Const(0.0)).simplify(), x);
        assert_eq!((x.clone() * Expr::Const(1.0)).simplify(), x);
        assert_eq!((x.clone() * Expr::Const(0.0)).simplify(), Expr::Const(0.0));
        assert_eq!((x.clone() - x.clone()).simplify(), Expr::Const(0.0));
        assert_eq!((x.clone() / x.clone()).simplify(), Expr::Const(1.0));
        assert_eq!(x.clone().pow(Expr::Const(0.0)).simplify(), Expr::Const(1.0));
    }

    #[test]
    fn test_like_terms() {
        let (x, y) = (var("x"), var("y"));
        let expr = Expr::Const(3.0) * x.clone() * y.clone() + Expr::Const(2.0) * y.clone() * x.clone();
        assert_eq!(
            expr.simplify(),
            Expr::Mul(
                Box::new(Expr::Const(5.0)),
                Box::new(x.clone() * y.clone())
            )
        );
        let expr = x.clone() + y.clone() - x.clone();
        assert_eq!(expr.simplify(), y);
    }

    #[test]
    fn test_factor_merging() {
        let r = var("r");
        let theta = Expr::sin(var("theta").boxed());
        let expr = r.clone().pow(Expr::Const(2.0)) * theta.clone() * r.clone().pow(Expr::Const(-2.0));
        assert_eq!(expr.simplify(), theta);
        assert_eq!((r.clone() * r.clone()).simplify(), r.clone().pow(Expr::Const(2.0)));
    }

    #[test]
    fn test_pythagorean_identity() {
        let expr = Expr::parse_expression("cos(t)^2 + sin(t)^2 + 4").unwrap();
        assert_eq!(expr.simplify(), Expr::Const(5.0));
        // x^2 + y^2 + z^2 of the spherical point (3, theta, phi)
        let expr = Expr::parse_expression(
            "(3*sin(theta)*cos(phi))^2 + (3*sin(theta)*sin(phi))^2 + (3*cos(theta))^2",
        )
        .unwrap();
        assert_eq!(expr.expand(), Expr::Const(9.0));
        // the identity is found inside larger terms
        let expr = Expr::parse_expression("2*sin(theta)^3 + 2*sin(theta)*cos(theta)^2").unwrap();
        assert_eq!(
            expr.simplify(),
            Expr::Mul(
                Box::new(Expr::Const(2.0)),
                Box::new(Expr::sin(var("theta").boxed()))
            )
        );
        // different coefficients are left alone
        let expr = Expr::parse_expression("2*sin(t)^2 + cos(t)^2").unwrap();
        assert!(expr.simplify().contains_variable("t"));
    }

    #[test]
    fn test_inverse_trig_compositions() {
        let u = var("u");
        assert_eq!(Expr::sin(Expr::arcsin(u.clone().boxed()).boxed()).simplify(), u);
        assert_eq!(Expr::cos(Expr::arccos(u.clone().boxed()).boxed()).simplify(), u);
        assert_eq!(Expr::tg(Expr::arctg(u.clone().boxed()).boxed()).simplify(), u);
        let root = Expr::cos(Expr::arcsin(u.boxed()).boxed()).simplify();
        assert_relative_eq!(root.eval_expression(vec!["u"], &[0.6]), 0.8, epsilon = 1e-12);
        // sine of the polar angle of the cylindrical point (2, phi, z)
        let theta = Expr::parse_expression("acos(z/sqrt(4 + z^2))").unwrap();
        let sine = Expr::sin(theta.boxed()).simplify();
        assert!(!sine.to_string().contains("arccos"));
        assert!(!sine.to_string().contains("sin"));
        assert_relative_eq!(sine.eval_expression(vec!["z"], &[1.5]), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_division_by_constant() {
        let x = var("x");
        assert_eq!(
            (x.clone() / Expr::Const(4.0)).simplify(),
            Expr::Mul(Box::new(Expr::Const(0.25)), Box::new(x))
        );
    }

    #[test]
    fn test_power_of_power_integer_only() {
        let x = var("x");
        let expr = x.clone().pow(Expr::Const(0.5)).pow(Expr::Const(-2.0));
        assert_eq!(expr.simplify(), x.clone().pow(Expr::Const(-1.0)));
        let kept = x.clone().pow(Expr::Const(2.0)).pow(Expr::Const(0.5));
        assert_eq!(kept.simplify(), kept);
    }

    #[test]
    fn test_expand_product_of_sums() {
        let x = var("x");
        let expr = (x.clone() + Expr::Const(1.0)) * (x.clone() - Expr::Const(1.0));
        assert_eq!(
            expr.expand(),
            x.clone().pow(Expr::Const(2.0)) - Expr::Const(1.0)
        );
    }

    #[test]
    fn test_expand_integer_power() {
        let expr = Expr::parse_expression("(t - 2)^2").unwrap();
        let expanded = expr.expand();
        for t in [-1.0, 0.5, 3.0] {
            assert_relative_eq!(
                expanded.eval_expression(vec!["t"], &[t]),
                (t - 2.0) * (t - 2.0),
                epsilon = 1e-12
            );
        }
        let mut terms = Vec::new();
        flatten_add(&expanded, &mut terms);
        assert_eq!(terms.len(), 3);
    }

    #[test]
    fn test_expand_keeps_fractional_power_of_sum() {
        let expr = Expr::parse_expression("(t - 1)*(t^2 + 1)^-1.5").unwrap();
        let expanded = expr.expand();
        let mut terms = Vec::new();
        flatten_add(&expanded, &mut terms);
        assert_eq!(terms.len(), 2);
        for term in &terms {
            let mut factors = Vec::new();
            flatten_mul(term, &mut factors);
            assert!(factors.iter().any(|f| matches!(
                f,
                Expr::Pow(base, exp) if matches!(base.as_ref(), Expr::Add(..)) && exp.as_ref() == &Expr::Const(-1.5)
            )));
        }
    }

    #[test]
    fn test_expand_division_by_variable() {
        let expr = Expr::parse_expression("k/r^2 * (r^2*sin(theta))").unwrap();
        let expanded = expr.expand();
        assert_eq!(expanded, var("k") * Expr::sin(var("theta").boxed()));
    }
}
