//! Structured differential elements and integration bounds.
//!
//! A [`DifferentialElement`] holds one [`ElementTerm`] per axis of its kind. An
//! integrated term carries the coefficient of the area element (for instance
//! `r^2 sin(theta)` for a sphere) and the axes it is integrated over; the other
//! axes of the kind are held at the fixed values given in [`Bounds`].

use crate::coordinates::coord_kind::{Axis, CoordKind};
use crate::coordinates::errors::CoordError;
use crate::symbolic::symbolic_engine::Expr;
use std::collections::BTreeMap;
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub enum ElementTerm {
    /// the axis contributes nothing
    Zero,
    /// a coefficient without integration marker, contributes nothing to a flux
    Constant(Expr),
    /// `coefficient * d(over[0]) d(over[1]) ...`
    Integrated { coefficient: Expr, over: Vec<Axis> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DifferentialElement {
    pub kind: CoordKind,
    pub terms: [ElementTerm; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Fixed(Expr),
    Range(Expr, Expr),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bounds {
    entries: BTreeMap<Axis, Bound>,
}

impl ElementTerm {
    pub fn integrated(coefficient: Expr, over: &[Axis]) -> Self {
        ElementTerm::Integrated {
            coefficient,
            over: over.to_vec(),
        }
    }

    pub fn is_integrated(&self) -> bool {
        matches!(self, ElementTerm::Integrated { .. })
    }
}

impl DifferentialElement {
    pub fn new(kind: CoordKind, terms: [ElementTerm; 3]) -> Self {
        DifferentialElement { kind, terms }
    }

    /// Checks that every integration axis belongs to the element's kind and appears once.
    pub fn validate(&self) -> Result<(), CoordError> {
        for term in &self.terms {
            if let ElementTerm::Integrated { over, .. } = term {
                if over.is_empty() {
                    return Err(CoordError::InvalidBounds(
                        "integrated term without integration axes".to_string(),
                    ));
                }
                for (i, axis) in over.iter().enumerate() {
                    if self.kind.index_of(*axis).is_none() {
                        return Err(CoordError::InvalidAxisName {
                            name: axis.name().to_string(),
                            kind: self.kind.to_string(),
                        });
                    }
                    if over[..i].contains(axis) {
                        return Err(CoordError::InvalidBounds(format!(
                            "axis {} is integrated twice",
                            axis
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// outward r̂ dA of a sphere: r^2 sin(theta) dtheta dphi on the r component
    pub fn spherical_shell() -> Self {
        let coefficient =
            Axis::R.var().pow(Expr::Const(2.0)) * Expr::sin(Box::new(Axis::Theta.var()));
        DifferentialElement::new(
            CoordKind::Spherical,
            [
                ElementTerm::integrated(coefficient, &[Axis::Theta, Axis::Phi]),
                ElementTerm::Zero,
                ElementTerm::Zero,
            ],
        )
    }

    /// outward side of a cylinder: r dphi dz on the r component
    pub fn cylinder_side() -> Self {
        DifferentialElement::new(
            CoordKind::Cylindrical,
            [
                ElementTerm::integrated(Axis::R.var(), &[Axis::Phi, Axis::Z]),
                ElementTerm::Zero,
                ElementTerm::Zero,
            ],
        )
    }

    /// +z facing disc: r dr dphi on the z component
    pub fn cylinder_cap() -> Self {
        DifferentialElement::new(
            CoordKind::Cylindrical,
            [
                ElementTerm::Zero,
                ElementTerm::Zero,
                ElementTerm::integrated(Axis::R.var(), &[Axis::R, Axis::Phi]),
            ],
        )
    }

    /// +z facing rectangle: dx dy on the z component
    pub fn plane_xy() -> Self {
        DifferentialElement::new(
            CoordKind::Cartesian,
            [
                ElementTerm::Zero,
                ElementTerm::Zero,
                ElementTerm::integrated(Expr::Const(1.0), &[Axis::X, Axis::Y]),
            ],
        )
    }
}

impl Bounds {
    pub fn new() -> Self {
        Bounds::default()
    }

    pub fn with_fixed(mut self, axis: Axis, value: impl Into<Expr>) -> Self {
        self.entries.insert(axis, Bound::Fixed(value.into()));
        self
    }

    pub fn with_range(mut self, axis: Axis, lower: impl Into<Expr>, upper: impl Into<Expr>) -> Self {
        self.entries
            .insert(axis, Bound::Range(lower.into(), upper.into()));
        self
    }

    pub fn get(&self, axis: Axis) -> Option<&Bound> {
        self.entries.get(&axis)
    }

    /// value of a held axis, `InvalidBounds` if it is missing or a range
    pub fn fixed(&self, axis: Axis) -> Result<&Expr, CoordError> {
        match self.entries.get(&axis) {
            Some(Bound::Fixed(value)) => Ok(value),
            Some(Bound::Range(..)) => Err(CoordError::InvalidBounds(format!(
                "axis {} is held constant but has a range",
                axis
            ))),
            None => Err(CoordError::InvalidBounds(format!(
                "missing value for held axis {}",
                axis
            ))),
        }
    }

    /// range of an integrated axis, `InvalidBounds` if it is missing or fixed
    pub fn range(&self, axis: Axis) -> Result<(&Expr, &Expr), CoordError> {
        match self.entries.get(&axis) {
            Some(Bound::Range(lower, upper)) => Ok((lower, upper)),
            Some(Bound::Fixed(_)) => Err(CoordError::InvalidBounds(format!(
                "axis {} is integrated but has a fixed value",
                axis
            ))),
            None => Err(CoordError::InvalidBounds(format!(
                "missing range for integrated axis {}",
                axis
            ))),
        }
    }

    pub fn spherical_shell(radius: impl Into<Expr>) -> Self {
        Bounds::new()
            .with_fixed(Axis::R, radius)
            .with_range(Axis::Theta, 0.0, PI)
            .with_range(Axis::Phi, 0.0, 2.0 * PI)
    }

    pub fn cylinder_side(radius: impl Into<Expr>, z_lower: impl Into<Expr>, z_upper: impl Into<Expr>) -> Self {
        Bounds::new()
            .with_fixed(Axis::R, radius)
            .with_range(Axis::Phi, 0.0, 2.0 * PI)
            .with_range(Axis::Z, z_lower, z_upper)
    }

    pub fn cylinder_cap(radius: impl Into<Expr>, height: impl Into<Expr>) -> Self {
        Bounds::new()
            .with_range(Axis::R, 0.0, radius)
            .with_range(Axis::Phi, 0.0, 2.0 * PI)
            .with_fixed(Axis::Z, height)
    }

    /// solid sphere of `radius` about the origin
    pub fn ball(radius: impl Into<Expr>) -> Self {
        Bounds::new()
            .with_range(Axis::R, 0.0, radius)
            .with_range(Axis::Theta, 0.0, PI)
            .with_range(Axis::Phi, 0.0, 2.0 * PI)
    }

    pub fn solid_cylinder(
        radius: impl Into<Expr>,
        z_lower: impl Into<Expr>,
        z_upper: impl Into<Expr>,
    ) -> Self {
        Bounds::new()
            .with_range(Axis::R, 0.0, radius)
            .with_range(Axis::Phi, 0.0, 2.0 * PI)
            .with_range(Axis::Z, z_lower, z_upper)
    }

    pub fn cuboid(x_range: (f64, f64), y_range: (f64, f64), z_range: (f64, f64)) -> Self {
        Bounds::new()
            .with_range(Axis::X, x_range.0, x_range.1)
            .with_range(Axis::Y, y_range.0, y_range.1)
            .with_range(Axis::Z, z_range.0, z_range.1)
    }

    pub fn plane_xy(
        height: impl Into<Expr>,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> Self {
        Bounds::new()
            .with_range(Axis::X, x_range.0, x_range.1)
            .with_range(Axis::Y, y_range.0, y_range.1)
            .with_fixed(Axis::Z, height)
    }
}
