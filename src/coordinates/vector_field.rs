use crate::coordinates::coord_kind::CoordKind;
use crate::coordinates::errors::CoordError;
use crate::coordinates::evaluator::{evaluate_vector, evaluate_vector_numeric};
use crate::coordinates::point::Coord;
use crate::coordinates::rotation::rotation_matrix;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_vectors::ExprVector;
use nalgebra::DVector;
use std::fmt;

/// Three symbolic components measured in the basis of `kind`.
///
/// The component expressions may use any of the names `x y z r theta phi`;
/// `kind` only fixes which rotation applies when the components are reprojected.
#[derive(Debug, Clone, PartialEq)]
pub struct VecField {
    kind: CoordKind,
    components: ExprVector,
}

impl VecField {
    pub fn new(kind: CoordKind, components: [Expr; 3]) -> Self {
        VecField {
            kind,
            components: ExprVector::new(components.to_vec()),
        }
    }

    pub fn from_numbers(kind: CoordKind, values: [f64; 3]) -> Self {
        VecField::new(kind, values.map(Expr::Const))
    }

    /// parses each component, e.g. `["k/r^2", "0", "0"]`
    pub fn from_strings(kind: CoordKind, components: [&str; 3]) -> Result<Self, CoordError> {
        let parsed = Expr::parse_vector_expression(&components).map_err(CoordError::ParseError)?;
        Ok(VecField {
            kind,
            components: ExprVector::new(parsed),
        })
    }

    pub fn from_tag(tag: &str, components: [Expr; 3]) -> Result<Self, CoordError> {
        Ok(VecField::new(CoordKind::from_tag(tag)?, components))
    }

    pub fn kind(&self) -> CoordKind {
        self.kind
    }

    pub fn components(&self) -> &ExprVector {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&Expr> {
        self.components.get(index)
    }

    /// Reprojects the components into the basis of `target`.
    /// Only the basis changes; variables inside the components are left as they are.
    pub fn to_kind(&self, target: CoordKind) -> VecField {
        if target == self.kind {
            return self.clone();
        }
        let rotated = rotation_matrix(self.kind, target)
            .mul_vector(&self.components)
            .simplify();
        VecField {
            kind: target,
            components: rotated,
        }
    }

    pub fn to_cartesian(&self) -> VecField {
        self.to_kind(CoordKind::Cartesian)
    }

    pub fn to_spherical(&self) -> VecField {
        self.to_kind(CoordKind::Spherical)
    }

    pub fn to_cylindrical(&self) -> VecField {
        self.to_kind(CoordKind::Cylindrical)
    }

    /// same basis, coordinate variables bound to `point`
    pub fn evaluate_at(&self, point: &Coord) -> VecField {
        VecField {
            kind: self.kind,
            components: evaluate_vector(self, point),
        }
    }

    pub fn evaluate_numeric(&self, point: &Coord) -> Result<[f64; 3], CoordError> {
        evaluate_vector_numeric(self, point)
    }

    /// Components in the basis of `kind` at `point`: the field is evaluated in its
    /// own basis and turned by the rotation matrix taken at the point's angles.
    pub fn components_at(&self, kind: CoordKind, point: &Coord) -> Result<[f64; 3], CoordError> {
        let own = DVector::from_row_slice(&self.evaluate_numeric(point)?);
        let [_, theta, phi] = point.to_spherical().values()?;
        let rotation = rotation_matrix(self.kind, kind).evaluate(&["theta", "phi"], &[theta, phi]);
        let turned = rotation * own;
        Ok([turned[0], turned[1], turned[2]])
    }
}

impl fmt::Display for VecField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} field {}", self.kind, self.components)
    }
}
