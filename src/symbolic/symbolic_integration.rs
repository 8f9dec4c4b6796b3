use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_simplify::{as_integer, flatten_add, flatten_mul};

/// sin(u)^m * cos(u)^n with u = slope * var + const
#[derive(Clone, Debug, PartialEq)]
struct TrigFactor {
    argument: Expr,
    slope: f64,
    sin_power: i32,
    cos_power: i32,
}

/// A product split with respect to the integration variable:
/// coefficient * var^power * [trig] * [exp(u)] * [ln(var)] * [Q(var)^k]
#[derive(Clone, Debug)]
struct ProductForm {
    coefficient: Expr,
    power: f64,
    trig: Option<TrigFactor>,
    exponential: Option<(Expr, f64)>,
    log: bool,
    kernel: Option<(Vec<f64>, f64)>,
}

/// slope `a` of u = a*var + b, None when u is not linear in var
fn linear_slope(u: &Expr, var: &str) -> Option<f64> {
    match u.diff(var).simplify() {
        Expr::Const(a) if a != 0.0 && a.is_finite() => Some(a),
        _ => None,
    }
}

fn power_of(base: Expr, exponent: i32) -> Expr {
    match exponent {
        0 => Expr::Const(1.0),
        1 => base,
        n => base.pow(Expr::Const(n as f64)),
    }
}

/// a0 + a1*var + a2*var^2 + ...
fn polynomial_expr(coeffs: &[f64], var: &str) -> Expr {
    let x = Expr::Var(var.to_string());
    coeffs
        .iter()
        .enumerate()
        .filter(|(_, c)| **c != 0.0)
        .map(|(degree, c)| Expr::Const(*c) * power_of(x.clone(), degree as i32))
        .reduce(|a, b| a + b)
        .unwrap_or(Expr::Const(0.0))
}

/// ln|u|, written as ln(u^2)/2 so it stays real where u < 0
fn ln_abs(u: Expr) -> Expr {
    Expr::Const(0.5) * u.pow(Expr::Const(2.0)).ln()
}

/// Q^(e+1)/(e+1), or ln|Q| for e = -1
fn power_antiderivative(q: &Expr, e: f64) -> Expr {
    if (e + 1.0).abs() < f64::EPSILON {
        ln_abs(q.clone())
    } else {
        Expr::Const(1.0 / (e + 1.0)) * q.clone().pow(Expr::Const(e + 1.0))
    }
}

impl TrigFactor {
    /// Antiderivative of sin(u)^m cos(u)^n with respect to u (reduction formulas).
    fn antiderivative_in_u(&self, m: i32, n: i32) -> Expr {
        let u = &self.argument;
        let s = Expr::sin(Box::new(u.clone()));
        let c = Expr::cos(Box::new(u.clone()));
        match (m, n) {
            (0, 0) => u.clone(),
            (0, 1) => s,
            (1, _) => {
                Expr::Const(-1.0 / (n + 1) as f64) * power_of(c, n + 1)
            }
            (0, _) => {
                Expr::Const(1.0 / n as f64) * power_of(c, n - 1) * s
                    + Expr::Const((n - 1) as f64 / n as f64) * self.antiderivative_in_u(0, n - 2)
            }
            _ => {
                let total = (m + n) as f64;
                Expr::Const(-1.0 / total) * power_of(s, m - 1) * power_of(c, n + 1)
                    + Expr::Const((m - 1) as f64 / total) * self.antiderivative_in_u(m - 2, n)
            }
        }
    }

    fn antiderivative(&self) -> Expr {
        Expr::Const(1.0 / self.slope) * self.antiderivative_in_u(self.sin_power, self.cos_power)
    }
}

impl ProductForm {
    fn new() -> Self {
        ProductForm {
            coefficient: Expr::Const(1.0),
            power: 0.0,
            trig: None,
            exponential: None,
            log: false,
            kernel: None,
        }
    }

    fn add_trig(&mut self, argument: &Expr, m: i32, n: i32, var: &str) -> Option<()> {
        match &mut self.trig {
            Some(trig) if &trig.argument == argument => {
                trig.sin_power += m;
                trig.cos_power += n;
            }
            Some(_) => return None,
            None => {
                self.trig = Some(TrigFactor {
                    argument: argument.clone(),
                    slope: linear_slope(argument, var)?,
                    sin_power: m,
                    cos_power: n,
                })
            }
        }
        Some(())
    }

    fn add_exponential(&mut self, argument: Expr, var: &str) -> Option<()> {
        let slope = linear_slope(&argument, var)?;
        self.exponential = Some(match self.exponential.take() {
            None => (argument, slope),
            Some((u, a)) => {
                let merged = a + slope;
                if merged == 0.0 {
                    return None;
                }
                (u + argument, merged)
            }
        });
        Some(())
    }

    /// Adds one factor of a product, None if the factor has no supported shape.
    fn absorb(&mut self, factor: Expr, var: &str) -> Option<()> {
        if !factor.contains_variable(var) {
            self.coefficient = self.coefficient.clone() * factor;
            return Some(());
        }
        match factor {
            Expr::Var(_) => self.power += 1.0,
            Expr::Pow(base, exp) => {
                let e = exp.simplify().as_const()?;
                match *base {
                    Expr::Var(_) => self.power += e,
                    Expr::sin(u) => {
                        let m = as_integer(e).filter(|m| *m >= 0)?;
                        self.add_trig(&u, m, 0, var)?;
                    }
                    Expr::cos(u) => {
                        let n = as_integer(e).filter(|n| *n >= 0)?;
                        self.add_trig(&u, 0, n, var)?;
                    }
                    Expr::Exp(u) => self.add_exponential(Expr::Const(e) * *u, var)?,
                    other => {
                        let coeffs = other.polynomial_coefficients(var)?;
                        if coeffs.len() < 2 || self.kernel.is_some() {
                            return None;
                        }
                        self.kernel = Some((coeffs, e));
                    }
                }
            }
            Expr::sin(u) => self.add_trig(&u, 1, 0, var)?,
            Expr::cos(u) => self.add_trig(&u, 0, 1, var)?,
            Expr::Exp(u) => self.add_exponential(*u, var)?,
            Expr::Ln(u) if *u == Expr::Var(var.to_string()) && !self.log => self.log = true,
            _ => return None,
        }
        Some(())
    }

    /// ∫ x^n e^u dx = x^n e^u / a - (n/a) ∫ x^(n-1) e^u dx
    fn exponential_antiderivative(u: &Expr, a: f64, n: i32, var: &str) -> Expr {
        let e_u = u.clone().exp();
        if n == 0 {
            return Expr::Const(1.0 / a) * e_u;
        }
        let x = Expr::Var(var.to_string());
        Expr::Const(1.0 / a) * power_of(x, n) * e_u
            - Expr::Const(n as f64 / a) * Self::exponential_antiderivative(u, a, n - 1, var)
    }

    /// ∫ Q^(-1/2) dx for Q = a + b x + c x^2
    fn inverse_root_antiderivative(q: &Expr, a: f64, b: f64, c: f64, var: &str) -> Option<Expr> {
        let x = Expr::Var(var.to_string());
        let linear = Expr::Const(2.0 * c) * x + Expr::Const(b);
        let discriminant = b * b - 4.0 * a * c;
        if c > 0.0 {
            // ln|2cx + b + 2√c √Q| / √c
            let root_c = c.sqrt();
            Some(
                Expr::Const(1.0 / root_c)
                    * ln_abs(linear + Expr::Const(2.0 * root_c) * q.clone().sqrt()),
            )
        } else if c < 0.0 && discriminant > 0.0 {
            // -arcsin((2cx + b)/√(b² - 4ac)) / √-c
            let scaled = Expr::Const(1.0 / discriminant.sqrt()) * linear;
            Some(Expr::Const(-1.0 / (-c).sqrt()) * Expr::arcsin(Box::new(scaled)))
        } else {
            None
        }
    }

    /// ∫ x^p Q^k dx for p in {0, 1}
    fn kernel_antiderivative(coeffs: &[f64], k: f64, p: f64, var: &str) -> Option<Expr> {
        let x = Expr::Var(var.to_string());
        let q = polynomial_expr(coeffs, var);
        match coeffs.len() {
            2 => {
                let (a, b) = (coeffs[0], coeffs[1]);
                if p == 0.0 {
                    Some(Expr::Const(1.0 / b) * power_antiderivative(&q, k))
                } else if p == 1.0 {
                    // x = (Q - a)/b
                    Some(
                        Expr::Const(1.0 / (b * b))
                            * (power_antiderivative(&q, k + 1.0)
                                - Expr::Const(a) * power_antiderivative(&q, k)),
                    )
                } else {
                    None
                }
            }
            3 if (k + 0.5).abs() < f64::EPSILON => {
                let (a, b, c) = (coeffs[0], coeffs[1], coeffs[2]);
                let base = Self::inverse_root_antiderivative(&q, a, b, c, var)?;
                if p == 0.0 {
                    Some(base)
                } else if p == 1.0 {
                    // ∫ x/√Q = √Q/c - (b/2c) ∫ 1/√Q
                    Some(Expr::Const(1.0 / c) * q.sqrt() - Expr::Const(b / (2.0 * c)) * base)
                } else {
                    None
                }
            }
            3 if (k + 1.5).abs() < f64::EPSILON => {
                let (a, b, c) = (coeffs[0], coeffs[1], coeffs[2]);
                let delta = 4.0 * a * c - b * b;
                if delta == 0.0 {
                    return None;
                }
                let inv_sqrt_q = q.pow(Expr::Const(-0.5));
                if p == 0.0 {
                    // 2(2cx + b) / (Δ √Q)
                    Some(
                        Expr::Const(2.0 / delta)
                            * (Expr::Const(2.0 * c) * x + Expr::Const(b))
                            * inv_sqrt_q,
                    )
                } else if p == 1.0 {
                    // -2(2a + bx) / (Δ √Q)
                    Some(
                        Expr::Const(-2.0 / delta)
                            * (Expr::Const(2.0 * a) + Expr::Const(b) * x)
                            * inv_sqrt_q,
                    )
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn antiderivative(&self, var: &str) -> Option<Expr> {
        let x = Expr::Var(var.to_string());
        let p = self.power;
        let result = match (&self.trig, &self.exponential, self.log, &self.kernel) {
            (None, None, false, None) => {
                if (p + 1.0).abs() < f64::EPSILON {
                    ln_abs(x)
                } else {
                    Expr::Const(1.0 / (p + 1.0)) * x.pow(Expr::Const(p + 1.0))
                }
            }
            (Some(trig), None, false, None) if p == 0.0 => trig.antiderivative(),
            (None, Some((u, a)), false, None) => {
                let n = as_integer(p).filter(|n| *n >= 0)?;
                Self::exponential_antiderivative(u, *a, n, var)
            }
            (None, None, true, None) => {
                if (p + 1.0).abs() < f64::EPSILON {
                    // ∫ ln(x)/x dx = ln(x)^2 / 2
                    Expr::Const(0.5) * x.ln().pow(Expr::Const(2.0))
                } else {
                    let n1 = p + 1.0;
                    x.clone().pow(Expr::Const(n1))
                        * (Expr::Const(1.0 / n1) * x.ln() - Expr::Const(1.0 / (n1 * n1)))
                }
            }
            (None, None, false, Some((coeffs, k))) => {
                Self::kernel_antiderivative(coeffs, *k, p, var)?
            }
            _ => return None,
        };
        Some(self.coefficient.clone() * result)
    }
}

impl Expr {
    /// SYMBOLIC INTEGRATION

    /// Indefinite integral with respect to `var` (no integration constant).
    ///
    /// Supported shapes: sums, var-free factors, `x^p`, `sin(u)^m cos(u)^n` and
    /// `x^n e^u` for u linear in x, `x^p ln(x)`, `tg(u)`, `x^p Q(x)^k` where Q is a
    /// numeric polynomial of degree 1, or of degree 2 with k in {-1/2, -3/2} and p in {0, 1}.
    /// Logarithms in the result are taken of |u|, written `ln(u^2)/2`.
    /// Everything else is an `Err`; there is no numeric fallback.
    pub fn integrate(&self, var: &str) -> Result<Expr, String> {
        if !self.contains_variable(var) {
            return Ok(self.clone() * Expr::Var(var.to_string()));
        }
        match self {
            // ∫ (f + g) dx = ∫ f dx + ∫ g dx
            Expr::Add(lhs, rhs) => Ok(lhs.integrate(var)? + rhs.integrate(var)?),
            Expr::Sub(lhs, rhs) => Ok(lhs.integrate(var)? - rhs.integrate(var)?),
            Expr::Div(lhs, rhs) => self.integrate_division(lhs, rhs, var),
            _ => {
                if let Some(result) = self.integrate_product(var) {
                    return Ok(result);
                }
                match self {
                    Expr::Mul(lhs, rhs) => self.integrate_multiplication(lhs, rhs, var),
                    Expr::tg(expr) => self.integrate_tan(expr, var),
                    Expr::arcsin(expr) | Expr::arccos(expr) | Expr::arctg(expr) => {
                        self.integrate_inverse_trig(expr, var)
                    }
                    _ => Err(format!("Cannot integrate {} with respect to {}", self, var)),
                }
            }
        }
    }

    /// Classifies the expression as a product of supported factors and integrates it.
    fn integrate_product(&self, var: &str) -> Option<Expr> {
        let mut factors = Vec::new();
        flatten_mul(self, &mut factors);
        let mut form = ProductForm::new();
        for factor in factors {
            form.absorb(factor, var)?;
        }
        form.antiderivative(var).map(|e| e.simplify())
    }

    fn integrate_multiplication(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Expr, String> {
        if !lhs.contains_variable(var) {
            return Ok(lhs.clone() * rhs.integrate(var)?);
        }
        if !rhs.contains_variable(var) {
            return Ok(rhs.clone() * lhs.integrate(var)?);
        }
        let expanded = self.expand();
        if &expanded != self && matches!(expanded, Expr::Add(..) | Expr::Sub(..)) {
            return expanded.integrate(var);
        }
        Err(format!("Cannot integrate product: {} * {}", lhs, rhs))
    }

    fn integrate_division(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Expr, String> {
        // ∫ f(x)/c dx = (1/c) * ∫ f(x) dx
        if !rhs.contains_variable(var) {
            return Ok(lhs.integrate(var)? / rhs.clone());
        }
        // ∫ f'(x)/f(x) dx = ln|f(x)|
        if rhs.diff(var).simplify() == lhs.simplify() {
            return Ok(ln_abs(rhs.clone()));
        }
        let expanded = self.expand();
        if !matches!(expanded, Expr::Div(..)) {
            return expanded.integrate(var);
        }
        Err(format!("Cannot integrate division: {} / {}", lhs, rhs))
    }

    /// ∫ tg(u) dx = -ln|cos(u)| / a
    fn integrate_tan(&self, expr: &Expr, var: &str) -> Result<Expr, String> {
        match linear_slope(expr, var) {
            Some(a) => Ok(Expr::Const(-1.0 / a) * ln_abs(Expr::cos(Box::new(expr.clone())))),
            None => Err(format!("Cannot integrate tg({})", expr)),
        }
    }

    /// arcsin, arccos and arctg of the bare variable, by parts.
    fn integrate_inverse_trig(&self, expr: &Expr, var: &str) -> Result<Expr, String> {
        let x = Expr::Var(var.to_string());
        if *expr != x {
            return Err(format!("Cannot integrate {}", self));
        }
        let one_minus_x2 = (Expr::Const(1.0) - x.clone().pow(Expr::Const(2.0))).sqrt();
        match self {
            Expr::arcsin(_) => Ok(x * self.clone() + one_minus_x2),
            Expr::arccos(_) => Ok(x * self.clone() - one_minus_x2),
            _ => {
                let ln_term = (Expr::Const(1.0) + x.clone().pow(Expr::Const(2.0))).ln();
                Ok(x * self.clone() - Expr::Const(0.5) * ln_term)
            }
        }
    }

    /// Definite integral with symbolic bounds: F(upper) - F(lower), simplified.
    ///
    /// With numeric bounds the integrand is first checked on the closed interval:
    /// a polynomial under a negative power may not vanish there, and one under a
    /// logarithm or a fractional power must stay positive.
    pub fn definite_integral(&self, var: &str, lower: &Expr, upper: &Expr) -> Result<Expr, String> {
        if let (Some(a), Some(b)) = (lower.as_const(), upper.as_const()) {
            if let Some(reason) = domain_violation(self, var, a.min(b), a.max(b)) {
                return Err(format!(
                    "{} is undefined on [{}, {}]: {}",
                    self, lower, upper, reason
                ));
            }
        }
        let indefinite = self.integrate(var)?;
        let at_upper = indefinite.substitute_variable(var, upper);
        let at_lower = indefinite.substitute_variable(var, lower);
        Ok((at_upper - at_lower).simplify())
    }

    /// Definite integration using the fundamental theorem of calculus
    pub fn definite_integrate(&self, var: &str, lower: f64, upper: f64) -> Result<f64, String> {
        let value = self
            .definite_integral(var, &Expr::Const(lower), &Expr::Const(upper))?
            .try_eval()
            .map_err(|free| format!("integral still depends on {}", free))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!(
                "integral of {} over [{}, {}] is not finite",
                self, lower, upper
            ))
        }
    }

    /// Coefficients `[a0, a1, ...]` of the expression as a polynomial in `var`.
    /// None if it is not a polynomial with numeric coefficients.
    pub fn polynomial_coefficients(&self, var: &str) -> Option<Vec<f64>> {
        let expanded = self.expand();
        let mut terms = Vec::new();
        flatten_add(&expanded, &mut terms);
        let mut coeffs: Vec<f64> = Vec::new();
        for term in terms {
            let mut factors = Vec::new();
            flatten_mul(&term, &mut factors);
            let mut coeff = 1.0;
            let mut degree = 0usize;
            for factor in factors {
                match factor {
                    Expr::Var(name) if name == var => degree += 1,
                    Expr::Pow(base, exp) if *base == Expr::Var(var.to_string()) => {
                        let n = exp.as_const().and_then(as_integer).filter(|n| *n >= 0)?;
                        degree += n as usize;
                    }
                    other => coeff *= other.try_eval().ok()?,
                }
            }
            if coeffs.len() <= degree {
                coeffs.resize(degree + 1, 0.0);
            }
            coeffs[degree] += coeff;
        }
        while coeffs.len() > 1 && coeffs.last() == Some(&0.0) {
            coeffs.pop();
        }
        Some(coeffs)
    }
}

/// true if the polynomial has a real root in [lo, hi]
fn has_root_in(coeffs: &[f64], lo: f64, hi: f64) -> bool {
    let inside = |root: f64| lo <= root && root <= hi;
    match coeffs {
        [a, b] => inside(-a / b),
        [a, b, c] => {
            let discriminant = b * b - 4.0 * a * c;
            discriminant >= 0.0
                && [-1.0, 1.0]
                    .iter()
                    .any(|sign| inside((-b + sign * discriminant.sqrt()) / (2.0 * c)))
        }
        _ => false,
    }
}

/// Reason why `expr` is singular or undefined somewhere on [lo, hi]. Only
/// polynomial arguments of degree one or two are inspected.
fn domain_violation(expr: &Expr, var: &str, lo: f64, hi: f64) -> Option<String> {
    let vanishes = |base: &Expr| {
        base.polynomial_coefficients(var)
            .is_some_and(|coeffs| has_root_in(&coeffs, lo, hi))
    };
    let turns_negative = |base: &Expr| {
        base.polynomial_coefficients(var).is_some_and(|coeffs| {
            let mid = 0.5 * (lo + hi);
            has_root_in(&coeffs, lo, hi) || coeffs.iter().rev().fold(0.0, |acc, c| acc * mid + c) < 0.0
        })
    };
    let found = match expr {
        Expr::Ln(arg) if arg.contains_variable(var) && turns_negative(arg) => {
            Some(format!("ln({}) needs a positive argument", arg))
        }
        Expr::Div(_, den) if den.contains_variable(var) && vanishes(den) => {
            Some(format!("{} vanishes", den))
        }
        Expr::Pow(base, exp) if base.contains_variable(var) => match exp.as_const() {
            Some(e) if as_integer(e).is_none() && turns_negative(base) => {
                Some(format!("{} ^ {} needs a positive base", base, e))
            }
            Some(e) if e < 0.0 && vanishes(base) => Some(format!("{} vanishes", base)),
            _ => None,
        },
        _ => None,
    };
    found.or_else(|| {
        expr.operands()
            .into_iter()
            .find_map(|operand| domain_violation(operand, var, lo, hi))
    })
}

///////////////////////////////////////////////////////////////////////////////////////////
// tests
////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod integration_tests {

    use crate::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;
    use std::f64::consts::{E, PI};

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    #[test]
    fn test_integrate_constant() {
        // ∫ 5 dx = 5x
        let result = Expr::Const(5.0).integrate("x").unwrap();
        assert_eq!(result.simplify(), (Expr::Const(5.0) * x()).simplify());
    }

    #[test]
    fn test_integrate_different_variable() {
        // ∫ y dx = y*x
        let y = Expr::Var("y".to_string());
        let result = y.integrate("x").unwrap();
        assert_eq!(result.simplify(), (y * x()).simplify());
    }

    #[test]
    fn test_integrate_polynomial() {
        // ∫ (x² - x + 3) dx = x³/3 - x²/2 + 3x
        let expr = x().pow(Expr::Const(2.0)) - x() + Expr::Const(3.0);
        let result = expr.integrate("x").unwrap();
        let x_val: f64 = 3.0;
        let expected = x_val.powi(3) / 3.0 - x_val.powi(2) / 2.0 + 3.0 * x_val;
        assert_relative_eq!(result.eval_expression(vec!["x"], &[x_val]), expected, epsilon = 1e-10);
    }

    #[test]
    fn test_integrate_one_over_x() {
        // ∫ x^-1 dx = ln|x|
        let result = x().pow(Expr::Const(-1.0)).integrate("x").unwrap();
        assert_relative_eq!(result.eval_expression(vec!["x"], &[E]), 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.eval_expression(vec!["x"], &[-E]), 1.0, epsilon = 1e-12);
        let result = (Expr::Const(1.0) / x()).integrate("x").unwrap();
        assert_relative_eq!(result.eval_expression(vec!["x"], &[E]), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_definite_integration_polynomial() {
        // ∫₁³ (x² + 1) dx = 32/3
        let expr = x().pow(Expr::Const(2.0)) + Expr::Const(1.0);
        let result = expr.definite_integrate("x", 1.0, 3.0).unwrap();
        assert_relative_eq!(result, 32.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_definite_integration_exponential() {
        // ∫₀¹ e^x dx = e - 1
        let result = x().exp().definite_integrate("x", 0.0, 1.0).unwrap();
        assert_relative_eq!(result, E - 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_polynomial_times_exponential() {
        // ∫₀¹ x e^x dx = 1
        let expr = x() * x().exp();
        assert_relative_eq!(expr.definite_integrate("x", 0.0, 1.0).unwrap(), 1.0, epsilon = 1e-10);
        // ∫₀¹ x e^(-x) dx = 1 - 2/e
        let expr = x() * (Expr::Const(-1.0) * x()).exp();
        assert_relative_eq!(
            expr.definite_integrate("x", 0.0, 1.0).unwrap(),
            1.0 - 2.0 / E,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_logarithm() {
        // ∫₁^e ln(x) dx = 1
        assert_relative_eq!(x().ln().definite_integrate("x", 1.0, E).unwrap(), 1.0, epsilon = 1e-10);
        // ∫₁^e x ln(x) dx = (e² + 1)/4
        let expr = x() * x().ln();
        assert_relative_eq!(
            expr.definite_integrate("x", 1.0, E).unwrap(),
            (E * E + 1.0) / 4.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_integrate_sin_linear_argument() {
        // ∫₀^(π/2) sin(2x) dx = 1
        let expr = Expr::sin(Box::new(Expr::Const(2.0) * x()));
        assert_relative_eq!(
            expr.definite_integrate("x", 0.0, PI / 2.0).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_sin_cos_reduction() {
        let s = Expr::sin(Box::new(x()));
        let c = Expr::cos(Box::new(x()));
        // ∫₀^(π/2) sin cos² = 1/3
        let expr = s.clone() * c.clone().pow(Expr::Const(2.0));
        assert_relative_eq!(
            expr.definite_integrate("x", 0.0, PI / 2.0).unwrap(),
            1.0 / 3.0,
            epsilon = 1e-12
        );
        // ∫₀^π sin³ = 4/3
        let expr = s.clone().pow(Expr::Const(3.0));
        assert_relative_eq!(expr.definite_integrate("x", 0.0, PI).unwrap(), 4.0 / 3.0, epsilon = 1e-12);
        // ∫₀^2π cos² = π
        let expr = c.clone() * c.clone();
        assert_relative_eq!(expr.definite_integrate("x", 0.0, 2.0 * PI).unwrap(), PI, epsilon = 1e-12);
        // ∫₀^π sin² cos² = π/8
        let expr = s.pow(Expr::Const(2.0)) * c.pow(Expr::Const(2.0));
        assert_relative_eq!(expr.definite_integrate("x", 0.0, PI).unwrap(), PI / 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_symbolic_coefficient_survives() {
        // ∫₀^π k sin(theta) dtheta = 2k
        let expr = Expr::Var("k".to_string()) * Expr::sin(Box::new(Expr::Var("theta".to_string())));
        let result = expr
            .definite_integral("theta", &Expr::Const(0.0), &Expr::pi())
            .unwrap();
        assert!(result.contains_variable("k"));
        assert_relative_eq!(result.eval_expression(vec!["k"], &[1.5]), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_symbolic_bounds() {
        // ∫₀^R x dx = R²/2
        let r = Expr::Var("R".to_string());
        let result = x().definite_integral("x", &Expr::Const(0.0), &r).unwrap();
        assert_relative_eq!(result.eval_expression(vec!["R"], &[4.0]), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_coulomb_kernel_quadratic() {
        // ∫₋₁¹ (t² + 4)^(-3/2) dt = 2/(4 √5)
        let t = Expr::Var("t".to_string());
        let q = t.clone().pow(Expr::Const(2.0)) + Expr::Const(4.0);
        let kernel = q.clone().pow(Expr::Const(-1.5));
        let value = kernel.definite_integrate("t", -1.0, 1.0).unwrap();
        assert_relative_eq!(value, 2.0 / (4.0 * 5.0_f64.sqrt()), epsilon = 1e-12);
        // odd integrand vanishes on a symmetric interval
        let odd = t.clone() * kernel.clone();
        assert_relative_eq!(odd.definite_integrate("t", -1.0, 1.0).unwrap(), 0.0, epsilon = 1e-12);
        // ∫₀¹ t (t² + 4)^(-3/2) dt = 1/2 - 1/√5
        assert_relative_eq!(
            odd.definite_integrate("t", 0.0, 1.0).unwrap(),
            0.5 - 1.0 / 5.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_coulomb_kernel_shifted_source() {
        // Q = (t - 1)² + 1 = t² - 2t + 2, ∫₀² Q^(-3/2) dt = √2
        let t = Expr::Var("t".to_string());
        let q = (t.clone() - Expr::Const(1.0)).pow(Expr::Const(2.0)) + Expr::Const(1.0);
        let value = q.pow(Expr::Const(-1.5)).definite_integrate("t", 0.0, 2.0).unwrap();
        assert_relative_eq!(value, 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_linear_kernel() {
        // ∫₀¹ (2t + 1)^(-2) dt = 1/3, ∫₀¹ t (2t + 1)^(-1) dt = 1/2 - ln(3)/4
        let t = Expr::Var("t".to_string());
        let base = Expr::Const(2.0) * t.clone() + Expr::Const(1.0);
        let value = base.clone().pow(Expr::Const(-2.0)).definite_integrate("t", 0.0, 1.0).unwrap();
        assert_relative_eq!(value, 1.0 / 3.0, epsilon = 1e-12);
        let value = (t * base.pow(Expr::Const(-1.0)))
            .definite_integrate("t", 0.0, 1.0)
            .unwrap();
        assert_relative_eq!(value, 0.5 - 3.0_f64.ln() / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_kernel_fails() {
        // field point on the line: Q = t², no closed form
        let t = Expr::Var("t".to_string());
        let kernel = (t.clone() * t.clone() + Expr::Const(0.0) * t).pow(Expr::Const(-1.5));
        assert!(kernel.integrate("t").is_err());
    }

    #[test]
    fn test_unsupported_integrands_fail() {
        assert!(Expr::sin(Box::new(x().pow(Expr::Const(2.0)))).integrate("x").is_err());
        assert!((x() * Expr::sin(Box::new(x()))).integrate("x").is_err());
        assert!(Expr::atan2(Box::new(x()), Box::new(Expr::Const(1.0))).integrate("x").is_err());
    }

    #[test]
    fn test_non_finite_definite_integral_fails() {
        let expr = x().pow(Expr::Const(-1.0));
        assert!(expr.definite_integrate("x", 0.0, 1.0).is_err());
    }

    #[test]
    fn test_logarithms_on_negative_ranges() {
        // ∫₋₂⁻¹ dx/x = -ln 2
        let expr = x().pow(Expr::Const(-1.0));
        assert_relative_eq!(
            expr.definite_integrate("x", -2.0, -1.0).unwrap(),
            -(2.0_f64.ln()),
            epsilon = 1e-12
        );
        // ∫₋₁⁰ dx/(2x - 1) = -ln(3)/2
        let expr = Expr::Const(1.0) / (Expr::Const(2.0) * x() - Expr::Const(1.0));
        assert_relative_eq!(
            expr.definite_integrate("x", -1.0, 0.0).unwrap(),
            -(3.0_f64.ln()) / 2.0,
            epsilon = 1e-12
        );
        // ∫_{3π/4}^{π} tg(x) dx = -ln(2)/2, cos is negative there
        let expr = Expr::tg(Box::new(x()));
        assert_relative_eq!(
            expr.definite_integrate("x", 3.0 * PI / 4.0, PI).unwrap(),
            -(2.0_f64.ln()) / 2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_undefined_on_range_fails() {
        let err = x().pow(Expr::Const(-1.0)).definite_integrate("x", -1.0, 1.0).unwrap_err();
        assert!(err.contains("undefined"));
        assert!(x().ln().definite_integrate("x", -2.0, -1.0).is_err());
        assert!((x() * x().ln()).definite_integrate("x", -1.0, 2.0).is_err());
        let root = (Expr::Const(1.0) - x()).pow(Expr::Const(0.5));
        assert!(root.definite_integrate("x", 0.0, 2.0).is_err());
        // a symbolic bound skips the check
        let upper = Expr::Var("R".to_string());
        assert!(x().ln().definite_integral("x", &Expr::Const(1.0), &upper).is_ok());
    }

    #[test]
    fn test_inverse_root_kernel() {
        let t = Expr::Var("t".to_string());
        // ∫₋₁¹ (t² + 4)^(-1/2) dt = 2 asinh(1/2)
        let kernel = (t.clone().pow(Expr::Const(2.0)) + Expr::Const(4.0)).pow(Expr::Const(-0.5));
        assert_relative_eq!(
            kernel.definite_integrate("t", -1.0, 1.0).unwrap(),
            2.0 * 0.5_f64.asinh(),
            epsilon = 1e-12
        );
        // ∫₀¹ t (t² + 4)^(-1/2) dt = √5 - 2
        assert_relative_eq!(
            (t.clone() * kernel).definite_integrate("t", 0.0, 1.0).unwrap(),
            5.0_f64.sqrt() - 2.0,
            epsilon = 1e-12
        );
        // ∫₀^½ (1 - t²)^(-1/2) dt = π/6
        let kernel = (Expr::Const(1.0) - t.clone().pow(Expr::Const(2.0))).pow(Expr::Const(-0.5));
        assert_relative_eq!(
            kernel.definite_integrate("t", 0.0, 0.5).unwrap(),
            PI / 6.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_division_by_variable_power() {
        // ∫₁² 3/x² dx = 3/2
        let expr = Expr::Const(3.0) / x().pow(Expr::Const(2.0));
        assert_relative_eq!(expr.definite_integrate("x", 1.0, 2.0).unwrap(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_polynomial_coefficients() {
        let t = Expr::Var("t".to_string());
        let q = (t.clone() - Expr::Const(1.0)).pow(Expr::Const(2.0)) + Expr::Const(3.0);
        assert_eq!(q.polynomial_coefficients("t"), Some(vec![4.0, -2.0, 1.0]));
        assert_eq!(Expr::Const(2.0).polynomial_coefficients("t"), Some(vec![2.0]));
        let symbolic = t.clone() * Expr::Var("a".to_string());
        assert_eq!(symbolic.polynomial_coefficients("t"), None);
        assert_eq!(Expr::sin(Box::new(t)).polynomial_coefficients("t"), None);
    }

    #[test]
    fn test_tan_and_inverse_trig() {
        // ∫₀^(π/4) tg(x) dx = ln(2)/2
        let expr = Expr::tg(Box::new(x()));
        assert_relative_eq!(
            expr.definite_integrate("x", 0.0, PI / 4.0).unwrap(),
            2.0_f64.ln() / 2.0,
            epsilon = 1e-12
        );
        // ∫₀¹ arctg(x) dx = π/4 - ln(2)/2
        let expr = Expr::arctg(Box::new(x()));
        assert_relative_eq!(
            expr.definite_integrate("x", 0.0, 1.0).unwrap(),
            PI / 4.0 - 2.0_f64.ln() / 2.0,
            epsilon = 1e-12
        );
    }
}
