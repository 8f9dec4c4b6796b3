//! # Flux and line integrals
//!
//! `flux` integrates a field against a [`DifferentialElement`]: the field is
//! reprojected into the element's kind, each integrated term takes its matching
//! component at the partially bound point, and the product with the term's
//! coefficient is integrated in closed form over the ranges in [`Bounds`].
//!
//! `volume_integral` integrates a scalar over a solid region with the volume
//! element `h1 h2 h3 dq1 dq2 dq3` of the region's kind.
//!
//! `line_integral` integrates the Coulomb kernel of a charged curve. All of them
//! return either a closed-form number or an error, never an approximation.

use crate::coordinates::coord_kind::{Axis, CoordKind};
use crate::coordinates::differential::{Bounds, DifferentialElement, ElementTerm};
use crate::coordinates::errors::CoordError;
use crate::coordinates::differential_ops::scale_factors;
use crate::coordinates::evaluator::{self, evaluate_vector};
use crate::coordinates::point::Coord;
use crate::coordinates::settings::{IntegrationSettings, init_logger};
use crate::coordinates::vector_field::VecField;
use crate::symbolic::symbolic_engine::Expr;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::f64::consts::PI;

/// vacuum permittivity, F/m
pub const VACUUM_PERMITTIVITY: f64 = 8.8541878128e-12;

/// Flux of `field` through the surface described by `element` and `bounds`,
/// with default settings.
pub fn flux(
    element: &DifferentialElement,
    field: &VecField,
    bounds: &Bounds,
) -> Result<f64, CoordError> {
    flux_with_settings(element, field, bounds, &IntegrationSettings::default())
}

pub fn flux_with_settings(
    element: &DifferentialElement,
    field: &VecField,
    bounds: &Bounds,
    settings: &IntegrationSettings,
) -> Result<f64, CoordError> {
    if let Some(level) = &settings.loglevel {
        init_logger(level);
    }
    let total = symbolic_flux(element, field, bounds, settings)?;
    let value = total
        .try_eval()
        .map_err(CoordError::UnresolvedVariable)?;
    if !value.is_finite() {
        return Err(CoordError::IntegrationFailure(format!(
            "flux evaluates to {}",
            value
        )));
    }
    info!("flux of {} through {} element = {}", field, element.kind, value);
    Ok(value)
}

/// Same as [`flux`] but keeps free symbols, e.g. a symbolic radius or field strength.
pub fn flux_symbolic(
    element: &DifferentialElement,
    field: &VecField,
    bounds: &Bounds,
) -> Result<Expr, CoordError> {
    symbolic_flux(element, field, bounds, &IntegrationSettings::default())
}

fn symbolic_flux(
    element: &DifferentialElement,
    field: &VecField,
    bounds: &Bounds,
    settings: &IntegrationSettings,
) -> Result<Expr, CoordError> {
    element.validate()?;
    let kind = element.kind;
    let projected = field.to_kind(kind);
    let mut total = Expr::Const(0.0);
    for (index, (axis, term)) in kind.axes().iter().zip(element.terms.iter()).enumerate() {
        let ElementTerm::Integrated { coefficient, over } = term else {
            debug!("axis {} carries no integration marker, skipped", axis);
            continue;
        };
        let contribution = axis_contribution(
            kind,
            index,
            coefficient,
            over,
            &projected,
            bounds,
            settings,
        )?;
        info!("axis {} contributes {}", axis, contribution);
        total = total + contribution;
    }
    Ok(total.simplify())
}

fn axis_contribution(
    kind: CoordKind,
    index: usize,
    coefficient: &Expr,
    over: &[Axis],
    projected: &VecField,
    bounds: &Bounds,
    settings: &IntegrationSettings,
) -> Result<Expr, CoordError> {
    let axes = kind.axes();
    let mut held: HashMap<String, Expr> = HashMap::new();
    for axis in axes {
        if over.contains(&axis) {
            bounds.range(axis)?;
        } else {
            held.insert(axis.name().to_string(), bounds.fixed(axis)?.clone());
        }
    }
    let coefficient = coefficient.substitute_variables(&held).simplify();
    if let Some(value) = coefficient.as_const() {
        if value.abs() < settings.zero_tolerance {
            debug!(
                "coefficient of axis {} vanishes on the surface, integration skipped",
                axes[index]
            );
            return Ok(Expr::Const(0.0));
        }
    }
    // held axes take their values, integrated axes stay free
    let point = Coord::new(
        kind,
        axes.map(|axis| held.get(axis.name()).cloned().unwrap_or_else(|| axis.var())),
    );
    let component = evaluate_vector(projected, &point)[index].clone();
    let mut integrand = (coefficient * component).expand();
    debug!("integrand on axis {}: {}", axes[index], integrand);
    for axis in over {
        let (lower, upper) = bounds.range(*axis)?;
        integrand = integrand
            .definite_integral(axis.name(), lower, upper)
            .map_err(|e| {
                warn!("integration over {} failed: {}", axis, e);
                CoordError::IntegrationFailure(e)
            })?
            .expand();
    }
    Ok(integrand)
}

/// Integral of `scalar` over the solid region of `kind` spanned by the three
/// ranges in `bounds`, e.g. the total charge of a density.
pub fn volume_integral(scalar: &Expr, kind: CoordKind, bounds: &Bounds) -> Result<f64, CoordError> {
    let total = volume_integral_symbolic(scalar, kind, bounds)?;
    let value = total
        .try_eval()
        .map_err(CoordError::UnresolvedVariable)?;
    if !value.is_finite() {
        return Err(CoordError::IntegrationFailure(format!(
            "volume integral evaluates to {}",
            value
        )));
    }
    info!("integral of {} over the {} region = {}", scalar, kind, value);
    Ok(value)
}

/// Same as [`volume_integral`] but keeps free symbols.
///
/// `scalar` may use any of `x y z r theta phi`. The axes are integrated in
/// component order, so a range may depend on the axes that follow it.
pub fn volume_integral_symbolic(
    scalar: &Expr,
    kind: CoordKind,
    bounds: &Bounds,
) -> Result<Expr, CoordError> {
    let axes = kind.axes();
    for axis in axes {
        bounds.range(axis)?;
    }
    let point = Coord::new(kind, axes.map(|axis| axis.var()));
    let jacobian = scale_factors(kind)
        .into_iter()
        .fold(Expr::Const(1.0), |acc, h| acc * h);
    let mut integrand = (evaluator::var(scalar, &point) * jacobian).expand();
    debug!("volume integrand in {} coordinates: {}", kind, integrand);
    for axis in axes {
        let (lower, upper) = bounds.range(axis)?;
        integrand = integrand
            .definite_integral(axis.name(), lower, upper)
            .map_err(|e| {
                warn!("integration over {} failed: {}", axis, e);
                CoordError::IntegrationFailure(e)
            })?
            .expand();
    }
    Ok(integrand.simplify())
}

/// Electric field at `field_point` of a charged curve `source(var)`, `var` in
/// `[lower, upper]`, as Cartesian components.
///
/// `charge_density` is the charge per unit of `var`; for a parameter that is not
/// arc length the caller folds |d source / d var| into it.
pub fn line_integral(
    charge_density: &Expr,
    var: &str,
    lower: f64,
    upper: f64,
    source: &Coord,
    field_point: &Coord,
) -> Result<[f64; 3], CoordError> {
    let source = source.to_cartesian();
    let target = field_point.to_cartesian();
    let displacement: Vec<Expr> = target
        .as_array()
        .iter()
        .zip(source.as_array().iter())
        .map(|(t, s)| (t.clone() - s.clone()).simplify())
        .collect();
    let distance_sq = displacement
        .iter()
        .map(|d| d.clone().pow(Expr::Const(2.0)))
        .fold(Expr::Const(0.0), |acc, d| acc + d)
        .expand();
    let coulomb = Expr::Const(1.0 / (4.0 * PI * VACUUM_PERMITTIVITY));
    let kernel = distance_sq.pow(Expr::Const(-1.5));

    let mut result = [0.0; 3];
    for (slot, d) in result.iter_mut().zip(displacement.iter()) {
        let integrand =
            (coulomb.clone() * charge_density.clone() * d.clone() * kernel.clone()).expand();
        let unresolved: Vec<String> = integrand
            .free_variables()
            .into_iter()
            .filter(|name| name != var)
            .collect();
        if !unresolved.is_empty() {
            return Err(CoordError::UnresolvedVariable(unresolved.join(", ")));
        }
        *slot = integrand
            .definite_integrate(var, lower, upper)
            .map_err(|e| {
                warn!("line integral over {} failed: {}", var, e);
                CoordError::IntegrationFailure(e)
            })?;
    }
    info!(
        "line integral at {} = ({}, {}, {})",
        field_point, result[0], result[1], result[2]
    );
    Ok(result)
}
