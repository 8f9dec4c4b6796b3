use crate::coordinates::errors::CoordError;
use crate::symbolic::symbolic_engine::Expr;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// The closed set of supported coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum CoordKind {
    #[strum(to_string = "Cartesian", serialize = "cart", serialize = "cartesian")]
    Cartesian,
    #[strum(to_string = "Spherical", serialize = "sph", serialize = "spherical")]
    Spherical,
    #[strum(to_string = "Cylindrical", serialize = "cyl", serialize = "cylindrical")]
    Cylindrical,
}

/// A named coordinate axis. `R`, `Phi` and `Z` are shared between kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
    R,
    Theta,
    Phi,
}

impl CoordKind {
    /// parse a tag such as "cart", "sph" or "cylindrical"
    pub fn from_tag(tag: &str) -> Result<CoordKind, CoordError> {
        CoordKind::from_str(tag.trim()).map_err(|_| CoordError::InvalidKind(tag.to_string()))
    }

    /// axes in component order
    pub fn axes(&self) -> [Axis; 3] {
        match self {
            CoordKind::Cartesian => [Axis::X, Axis::Y, Axis::Z],
            CoordKind::Spherical => [Axis::R, Axis::Theta, Axis::Phi],
            CoordKind::Cylindrical => [Axis::R, Axis::Phi, Axis::Z],
        }
    }

    /// position of `axis` in this kind's component triple
    pub fn index_of(&self, axis: Axis) -> Option<usize> {
        self.axes().iter().position(|a| *a == axis)
    }

    /// component index of a named axis, `InvalidAxisName` if the kind has no such axis
    pub fn index_of_name(&self, name: &str) -> Result<usize, CoordError> {
        Axis::from_str(name)
            .ok()
            .and_then(|axis| self.index_of(axis))
            .ok_or_else(|| CoordError::InvalidAxisName {
                name: name.to_string(),
                kind: self.to_string(),
            })
    }

    pub fn variable_names(&self) -> [&'static str; 3] {
        let [a, b, c] = self.axes();
        [a.name(), b.name(), c.name()]
    }
}

impl Axis {
    /// name of the free variable standing for this axis
    pub fn name(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::R => "r",
            Axis::Theta => "theta",
            Axis::Phi => "phi",
        }
    }

    pub fn var(&self) -> Expr {
        Expr::Var(self.name().to_string())
    }
}
