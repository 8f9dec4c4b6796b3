//! Vector calculus in the scale factors of each coordinate kind.

use crate::coordinates::coord_kind::CoordKind;
use crate::coordinates::vector_field::VecField;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbols;

/// Lamé coefficients (h1, h2, h3) of the kind's axes
pub fn scale_factors(kind: CoordKind) -> [Expr; 3] {
    let (r, theta) = symbols!(r, theta);
    match kind {
        CoordKind::Cartesian => [Expr::Const(1.0), Expr::Const(1.0), Expr::Const(1.0)],
        CoordKind::Spherical => [Expr::Const(1.0), r.clone(), r * Expr::sin(theta.boxed())],
        CoordKind::Cylindrical => [Expr::Const(1.0), r, Expr::Const(1.0)],
    }
}

/// Divergence in the field's own kind. Components must be written in that
/// kind's variables, e.g. `r theta phi` for a spherical field.
pub fn divergence(field: &VecField) -> Expr {
    let kind = field.kind();
    let h = scale_factors(kind);
    let volume = (h[0].clone() * h[1].clone() * h[2].clone()).simplify();
    let names = kind.variable_names();
    let mut sum = Expr::Const(0.0);
    for (i, name) in names.iter().enumerate() {
        let Some(component) = field.component(i) else {
            continue;
        };
        let flux_density = (volume.clone() / h[i].clone() * component.clone()).simplify();
        sum = sum + flux_density.diff(name);
    }
    (sum / volume).simplify()
}

/// Gradient of `scalar` (written in the variables of `kind`) with components in that basis.
pub fn gradient(scalar: &Expr, kind: CoordKind) -> VecField {
    let h = scale_factors(kind);
    let names = kind.variable_names();
    let partials = scalar.diff_multi_args(&names);
    let components = [0, 1, 2].map(|i| (partials[i].clone() / h[i].clone()).simplify());
    VecField::new(kind, components)
}

/// Curl in the field's own kind, components in that basis. Uses the right-handed
/// axis order of the kind, `(r, theta, phi)` and `(r, phi, z)` for the curvilinear ones.
pub fn curl(field: &VecField) -> VecField {
    let kind = field.kind();
    let h = scale_factors(kind);
    let names = kind.variable_names();
    // h_i F_i
    let scaled = |i: usize| match field.component(i) {
        Some(component) => h[i].clone() * component.clone(),
        None => Expr::Const(0.0),
    };
    let components = [0, 1, 2].map(|i| {
        let (j, k) = ((i + 1) % 3, (i + 2) % 3);
        let circulation = scaled(k).diff(names[j]) - scaled(j).diff(names[k]);
        (circulation / (h[j].clone() * h[k].clone())).simplify()
    });
    VecField::new(kind, components)
}
