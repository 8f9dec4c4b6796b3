use crate::coordinates::coord_kind::CoordKind;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_vectors::ExprMatrix;

fn theta() -> Expr {
    Expr::Var("theta".to_string())
}

fn phi() -> Expr {
    Expr::Var("phi".to_string())
}

fn sin(e: Expr) -> Expr {
    Expr::sin(Box::new(e))
}

fn cos(e: Expr) -> Expr {
    Expr::cos(Box::new(e))
}

fn zero() -> Expr {
    Expr::Const(0.0)
}

fn one() -> Expr {
    Expr::Const(1.0)
}

/// rows are the unit vectors r̂, θ̂, φ̂ written in Cartesian components
pub fn cartesian_to_spherical() -> ExprMatrix {
    ExprMatrix::new(vec![
        vec![
            sin(theta()) * cos(phi()),
            sin(theta()) * sin(phi()),
            cos(theta()),
        ],
        vec![
            cos(theta()) * cos(phi()),
            cos(theta()) * sin(phi()),
            -sin(theta()),
        ],
        vec![-sin(phi()), cos(phi()), zero()],
    ])
    .simplify()
}

/// rows are r̂, φ̂, ẑ of the cylindrical basis in Cartesian components
pub fn cartesian_to_cylindrical() -> ExprMatrix {
    ExprMatrix::new(vec![
        vec![cos(phi()), sin(phi()), zero()],
        vec![-sin(phi()), cos(phi()), zero()],
        vec![zero(), zero(), one()],
    ])
    .simplify()
}

/// rows are r̂, θ̂, φ̂ in cylindrical components (r, φ, z)
pub fn cylindrical_to_spherical() -> ExprMatrix {
    ExprMatrix::new(vec![
        vec![sin(theta()), zero(), cos(theta())],
        vec![cos(theta()), zero(), -sin(theta())],
        vec![zero(), one(), zero()],
    ])
    .simplify()
}

/// Matrix M with `v_to = M * v_from`.
/// Entries depend on the free variables "theta" and "phi"; reverse directions are transposes.
pub fn rotation_matrix(from: CoordKind, to: CoordKind) -> ExprMatrix {
    use CoordKind::*;
    match (from, to) {
        (Cartesian, Cartesian) | (Spherical, Spherical) | (Cylindrical, Cylindrical) => {
            ExprMatrix::identity(3)
        }
        (Cartesian, Spherical) => cartesian_to_spherical(),
        (Spherical, Cartesian) => cartesian_to_spherical().transpose(),
        (Cartesian, Cylindrical) => cartesian_to_cylindrical(),
        (Cylindrical, Cartesian) => cartesian_to_cylindrical().transpose(),
        (Cylindrical, Spherical) => cylindrical_to_spherical(),
        (Spherical, Cylindrical) => cylindrical_to_spherical().transpose(),
    }
}
