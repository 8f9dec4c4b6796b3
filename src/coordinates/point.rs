//! # Point representation
//!
//! A [`Coord`] is an immutable triple of [`Expr`] components tagged with a
//! [`CoordKind`]. Component order is fixed per kind:
//! - Cartesian `(x, y, z)`
//! - Spherical `(r, theta, phi)`, theta is the polar angle from +z, phi the azimuth from +x
//! - Cylindrical `(r, phi, z)`
//!
//! Conversions always build a new point. The azimuth is computed with `atan2`
//! and lies in (-pi, pi]; a numeric azimuth given to [`Coord::new`] is folded into
//! the same interval. Radii are expected non-negative and theta in [0, pi].
//! At the origin the polar angle is taken as 0.

use crate::coordinates::coord_kind::{Axis, CoordKind};
use crate::coordinates::errors::CoordError;
use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::{PI, TAU};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Coord {
    kind: CoordKind,
    components: [Expr; 3],
}

/// Named view of a point's components, one variant per kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordComponents<'a> {
    Cartesian {
        x: &'a Expr,
        y: &'a Expr,
        z: &'a Expr,
    },
    Spherical {
        r: &'a Expr,
        theta: &'a Expr,
        phi: &'a Expr,
    },
    Cylindrical {
        r: &'a Expr,
        phi: &'a Expr,
        z: &'a Expr,
    },
}

/// sqrt(a^2 + b^2 [+ c^2])
fn norm(parts: &[&Expr]) -> Expr {
    parts
        .iter()
        .map(|p| (*p).clone().pow(Expr::Const(2.0)))
        .reduce(|a, b| a + b)
        .unwrap_or(Expr::Const(0.0))
        .sqrt()
        .simplify()
}

/// polar angle acos(z / r), 0 when r is exactly zero
fn polar_angle(z: &Expr, r: &Expr) -> Expr {
    if r.is_zero() {
        return Expr::Const(0.0);
    }
    Expr::arccos(Box::new(z.clone() / r.clone())).simplify()
}

fn azimuth(y: &Expr, x: &Expr) -> Expr {
    Expr::atan2(Box::new(y.clone()), Box::new(x.clone())).simplify()
}

/// azimuth folded into (-pi, pi]
fn wrap_azimuth(phi: f64) -> f64 {
    phi - TAU * ((phi - PI) / TAU).ceil()
}

impl Coord {
    pub fn new(kind: CoordKind, mut components: [Expr; 3]) -> Self {
        if let Some(index) = kind.index_of(Axis::Phi) {
            if let Expr::Const(phi) = components[index] {
                components[index] = Expr::Const(wrap_azimuth(phi));
            }
        }
        Coord { kind, components }
    }

    pub fn numeric(kind: CoordKind, values: [f64; 3]) -> Self {
        Coord::new(kind, values.map(Expr::Const))
    }

    /// point from a string tag, `InvalidKind` for an unknown tag
    pub fn from_tag(tag: &str, components: [Expr; 3]) -> Result<Self, CoordError> {
        Ok(Coord::new(CoordKind::from_tag(tag)?, components))
    }

    /// Builds a point from named assignments such as `[("r", ..), ("phi", ..), ("z", ..)]`.
    /// The kind is inferred from the set of names; order does not matter.
    pub fn from_named(assignments: &[(&str, Expr)]) -> Result<Self, CoordError> {
        let described: Vec<&str> = assignments.iter().map(|(name, _)| *name).collect();
        let wrong = || {
            CoordError::WrongArgumentType(format!(
                "names {:?} do not describe a point of any coordinate kind",
                described
            ))
        };
        if assignments.len() != 3 {
            return Err(wrong());
        }
        let kind = [
            CoordKind::Cartesian,
            CoordKind::Spherical,
            CoordKind::Cylindrical,
        ]
        .into_iter()
        .find(|kind| {
            kind.variable_names()
                .iter()
                .all(|name| described.contains(name))
        })
        .ok_or_else(wrong)?;
        let mut components = [Expr::Const(0.0), Expr::Const(0.0), Expr::Const(0.0)];
        for (name, value) in assignments {
            components[kind.index_of_name(name)?] = value.clone();
        }
        Ok(Coord::new(kind, components))
    }

    pub fn kind(&self) -> CoordKind {
        self.kind
    }

    pub fn as_array(&self) -> &[Expr; 3] {
        &self.components
    }

    /// component by axis name; asking a Cartesian point for "r" is an error
    pub fn get(&self, name: &str) -> Result<&Expr, CoordError> {
        Ok(&self.components[self.kind.index_of_name(name)?])
    }

    pub fn components(&self) -> CoordComponents<'_> {
        let [a, b, c] = &self.components;
        match self.kind {
            CoordKind::Cartesian => CoordComponents::Cartesian { x: a, y: b, z: c },
            CoordKind::Spherical => CoordComponents::Spherical {
                r: a,
                theta: b,
                phi: c,
            },
            CoordKind::Cylindrical => CoordComponents::Cylindrical { r: a, phi: b, z: c },
        }
    }

    pub fn to_cartesian(&self) -> Coord {
        match self.components() {
            CoordComponents::Cartesian { .. } => self.clone(),
            CoordComponents::Spherical { r, theta, phi } => {
                let sin_theta = Expr::sin(Box::new(theta.clone()));
                let x = r.clone() * sin_theta.clone() * Expr::cos(Box::new(phi.clone()));
                let y = r.clone() * sin_theta * Expr::sin(Box::new(phi.clone()));
                let z = r.clone() * Expr::cos(Box::new(theta.clone()));
                Coord::new(
                    CoordKind::Cartesian,
                    [x.simplify(), y.simplify(), z.simplify()],
                )
            }
            CoordComponents::Cylindrical { r, phi, z } => {
                let x = r.clone() * Expr::cos(Box::new(phi.clone()));
                let y = r.clone() * Expr::sin(Box::new(phi.clone()));
                Coord::new(CoordKind::Cartesian, [x.simplify(), y.simplify(), z.clone()])
            }
        }
    }

    pub fn to_spherical(&self) -> Coord {
        match self.components() {
            CoordComponents::Spherical { .. } => self.clone(),
            CoordComponents::Cartesian { x, y, z } => {
                let r = norm(&[x, y, z]);
                let theta = polar_angle(z, &r);
                Coord::new(CoordKind::Spherical, [r, theta, azimuth(y, x)])
            }
            CoordComponents::Cylindrical { r, phi, z } => {
                let r_sph = norm(&[r, z]);
                let theta = polar_angle(z, &r_sph);
                Coord::new(CoordKind::Spherical, [r_sph, theta, phi.clone()])
            }
        }
    }

    pub fn to_cylindrical(&self) -> Coord {
        match self.components() {
            CoordComponents::Cylindrical { .. } => self.clone(),
            CoordComponents::Cartesian { x, y, z } => Coord::new(
                CoordKind::Cylindrical,
                [norm(&[x, y]), azimuth(y, x), z.clone()],
            ),
            CoordComponents::Spherical { r, theta, phi } => {
                let r_cyl = r.clone() * Expr::sin(Box::new(theta.clone()));
                let z = r.clone() * Expr::cos(Box::new(theta.clone()));
                Coord::new(
                    CoordKind::Cylindrical,
                    [r_cyl.simplify(), phi.clone(), z.simplify()],
                )
            }
        }
    }

    pub fn to_kind(&self, kind: CoordKind) -> Coord {
        match kind {
            CoordKind::Cartesian => self.to_cartesian(),
            CoordKind::Spherical => self.to_spherical(),
            CoordKind::Cylindrical => self.to_cylindrical(),
        }
    }

    /// Numeric components, `UnresolvedVariable` if any component is still symbolic.
    pub fn values(&self) -> Result<[f64; 3], CoordError> {
        let mut out = [0.0; 3];
        for (slot, component) in out.iter_mut().zip(self.components.iter()) {
            *slot = component.try_eval().map_err(CoordError::UnresolvedVariable)?;
        }
        Ok(out)
    }

    /// replaces named free variables inside the components
    pub fn set_variable(&self, var: &str, value: f64) -> Coord {
        Coord::new(
            self.kind,
            self.components
                .clone()
                .map(|c| c.set_variable(var, value).simplify()),
        )
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names = self.kind.variable_names();
        write!(
            f,
            "{}({} = {}, {} = {}, {} = {})",
            self.kind,
            names[0],
            self.components[0],
            names[1],
            self.components[1],
            names[2],
            self.components[2]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_named_access() {
        let p = Coord::numeric(CoordKind::Cylindrical, [2.0, 0.5, -1.0]);
        assert_eq!(p.get("phi").unwrap(), &Expr::Const(0.5));
        assert_eq!(p.get("z").unwrap(), &Expr::Const(-1.0));
        assert!(matches!(
            p.get("theta"),
            Err(CoordError::InvalidAxisName { .. })
        ));
        match p.components() {
            CoordComponents::Cylindrical { r, .. } => assert_eq!(r, &Expr::Const(2.0)),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_azimuth_folded_on_construction() {
        let p = Coord::numeric(CoordKind::Spherical, [2.0, 1.0, 3.5]);
        let [_, _, phi] = p.values().unwrap();
        assert_relative_eq!(phi, 3.5 - 2.0 * PI, epsilon = 1e-12);
        let back = p.to_cartesian().to_spherical().values().unwrap();
        for (got, want) in back.iter().zip(p.values().unwrap()) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
        let p = Coord::numeric(CoordKind::Cylindrical, [1.0, -PI, 0.0]);
        assert_relative_eq!(p.values().unwrap()[1], PI, epsilon = 1e-12);
        let p = Coord::numeric(CoordKind::Cylindrical, [1.0, 5.0, 0.0]);
        assert_relative_eq!(p.values().unwrap()[1], 5.0 - 2.0 * PI, epsilon = 1e-12);
        let p = Coord::numeric(CoordKind::Cartesian, [1.0, 2.0, 3.5]);
        assert_eq!(p.values().unwrap(), [1.0, 2.0, 3.5]);
        let p = Coord::new(
            CoordKind::Spherical,
            [Expr::Const(1.0), Expr::Const(1.0), Expr::Var("phi".to_string())],
        );
        assert_eq!(p.get("phi").unwrap(), &Expr::Var("phi".to_string()));
    }

    #[test]
    fn test_from_named() {
        let p = Coord::from_named(&[
            ("z", Expr::Const(3.0)),
            ("r", Expr::Const(1.0)),
            ("phi", Expr::Const(0.0)),
        ])
        .unwrap();
        assert_eq!(p.kind(), CoordKind::Cylindrical);
        assert_eq!(p.values().unwrap(), [1.0, 0.0, 3.0]);

        let p = Coord::from_named(&[
            ("theta", Expr::Const(1.0)),
            ("phi", Expr::Const(2.0)),
            ("r", Expr::Const(3.0)),
        ])
        .unwrap();
        assert_eq!(p.kind(), CoordKind::Spherical);

        let bad = Coord::from_named(&[
            ("x", Expr::Const(1.0)),
            ("r", Expr::Const(1.0)),
            ("z", Expr::Const(1.0)),
        ]);
        assert!(matches!(bad, Err(CoordError::WrongArgumentType(_))));
        assert!(Coord::from_named(&[("x", Expr::Const(1.0))]).is_err());
    }

    #[test]
    fn test_from_tag() {
        let p = Coord::from_tag("cyl", [Expr::Const(1.0), Expr::Const(0.0), Expr::Const(0.0)]);
        assert_eq!(p.unwrap().kind(), CoordKind::Cylindrical);
        let p = Coord::from_tag("ellipsoidal", [Expr::Const(1.0), Expr::Const(0.0), Expr::Const(0.0)]);
        assert!(matches!(p, Err(CoordError::InvalidKind(_))));
    }

    #[test]
    fn test_cylindrical_spherical() {
        let p = Coord::numeric(CoordKind::Cylindrical, [3.0, 1.0, 4.0]);
        let [r, theta, phi] = p.to_spherical().values().unwrap();
        assert_relative_eq!(r, 5.0, epsilon = 1e-12);
        assert_relative_eq!(theta, (4.0f64 / 5.0).acos(), epsilon = 1e-12);
        assert_relative_eq!(phi, 1.0, epsilon = 1e-12);
        let [r_cyl, phi_cyl, z] = p.to_spherical().to_cylindrical().values().unwrap();
        assert_relative_eq!(r_cyl, 3.0, epsilon = 1e-12);
        assert_relative_eq!(phi_cyl, 1.0, epsilon = 1e-12);
        assert_relative_eq!(z, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_third_quadrant() {
        let p = Coord::numeric(CoordKind::Cartesian, [-1.0, -1.0, 0.0]);
        let [r, phi, _] = p.to_cylindrical().values().unwrap();
        assert_relative_eq!(r, 2.0f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(phi, -3.0 * PI / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_origin() {
        let p = Coord::numeric(CoordKind::Cartesian, [0.0, 0.0, 0.0]);
        assert_eq!(p.to_spherical().values().unwrap(), [0.0, 0.0, 0.0]);
        assert_eq!(p.to_cylindrical().values().unwrap(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_symbolic_components() {
        let p = Coord::new(
            CoordKind::Spherical,
            [Expr::Const(2.0), Expr::Var("theta".to_string()), Expr::Const(0.0)],
        );
        let cart = p.to_cartesian();
        assert!(cart.values().is_err());
        let [x, y, z] = cart.set_variable("theta", PI / 2.0).values().unwrap();
        assert_relative_eq!(x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_display() {
        let p = Coord::numeric(CoordKind::Cartesian, [1.0, 2.0, 3.0]);
        assert_eq!(p.to_string(), "Cartesian(x = 1, y = 2, z = 3)");
    }
}
