//! Resolution of the coordinate variables `x y z r theta phi` against a point.
//!
//! `x, y, z` take the point's Cartesian projection and `r, theta, phi` its
//! spherical projection. For a cylindrical point `r`, `phi` and `z` come from
//! the point itself, so `r` means the cylindrical radius there. All names are
//! replaced in one simultaneous pass.

use crate::coordinates::coord_kind::{Axis, CoordKind};
use crate::coordinates::errors::CoordError;
use crate::coordinates::point::Coord;
use crate::coordinates::vector_field::VecField;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_vectors::ExprVector;
use log::debug;
use std::collections::HashMap;

/// variable name -> value expressed through the point's components
pub fn substitution_map(point: &Coord) -> HashMap<String, Expr> {
    let mut map = HashMap::new();
    let mut insert_all = |projection: &Coord| {
        for (axis, value) in projection.kind().axes().iter().zip(projection.as_array()) {
            map.insert(axis.name().to_string(), value.clone());
        }
    };
    insert_all(&point.to_cartesian());
    insert_all(&point.to_spherical());
    if point.kind() == CoordKind::Cylindrical {
        insert_all(point);
    }
    debug!(
        "substitution map for {}: {}",
        point,
        [Axis::X, Axis::Y, Axis::Z, Axis::R, Axis::Theta, Axis::Phi]
            .iter()
            .filter_map(|axis| map.get(axis.name()).map(|v| format!("{} -> {}", axis, v)))
            .collect::<Vec<_>>()
            .join(", ")
    );
    map
}

/// expression with every coordinate variable bound to the point, simplified
pub fn var(expr: &Expr, point: &Coord) -> Expr {
    expr.substitute_variables(&substitution_map(point)).simplify()
}

/// numeric value of `expr` at `point`
pub fn var_numeric(expr: &Expr, point: &Coord) -> Result<f64, CoordError> {
    var(expr, point)
        .try_eval()
        .map_err(CoordError::UnresolvedVariable)
}

/// The field's components with the coordinate variables bound to `point`.
/// Components stay in the field's own basis.
pub fn evaluate_vector(field: &VecField, point: &Coord) -> ExprVector {
    let map = substitution_map(point);
    field
        .components()
        .map(|c| c.substitute_variables(&map).simplify())
}

/// `UnresolvedVariable` lists the names left free in the first symbolic component
pub fn evaluate_vector_numeric(field: &VecField, point: &Coord) -> Result<[f64; 3], CoordError> {
    let bound = evaluate_vector(field, point);
    let mut out = [0.0; 3];
    for (slot, component) in out.iter_mut().zip(bound.iter()) {
        *slot = component
            .try_eval()
            .map_err(CoordError::UnresolvedVariable)?;
    }
    Ok(out)
}
