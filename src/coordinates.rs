/// coordinate kinds and the named axes they span
///
///# Example
/// ```
/// use RustedCoordFields::coordinates::coord_kind::{Axis, CoordKind};
/// let kind: CoordKind = "sph".parse().unwrap();
/// assert_eq!(kind.axes(), [Axis::R, Axis::Theta, Axis::Phi]);
/// ```
pub mod coord_kind;
/// the error type of the coordinate engine
pub mod errors;
/// integration settings and logger initialisation
pub mod settings;
///________________________________________________________________________________________________________________________________
/// # Points
/// a triple of symbolic or numeric components tagged with its coordinate kind
///# Example
/// ```
/// use RustedCoordFields::coordinates::coord_kind::CoordKind;
/// use RustedCoordFields::coordinates::point::Coord;
/// let p = Coord::numeric(CoordKind::Cartesian, [0.0, 1.0, 0.0]);
/// let [r, theta, phi] = p.to_spherical().values().unwrap();
/// assert!((r - 1.0).abs() < 1e-12);
/// assert!((theta - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// assert!((phi - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod point;
/// direction-cosine matrices between the three bases
pub mod rotation;
///________________________________________________________________________________________________________________________________
/// # Vector fields
/// three symbolic components plus the basis they are measured in
///# Example
/// ```
/// use RustedCoordFields::coordinates::coord_kind::CoordKind;
/// use RustedCoordFields::coordinates::point::Coord;
/// use RustedCoordFields::coordinates::vector_field::VecField;
/// let uniform_z = VecField::from_numbers(CoordKind::Cartesian, [0.0, 0.0, 1.0]);
/// let on_axis = Coord::numeric(CoordKind::Spherical, [1.0, 0.0, 0.0]);
/// let e = uniform_z.components_at(CoordKind::Spherical, &on_axis).unwrap();
/// assert!((e[0] - 1.0).abs() < 1e-12);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod vector_field;
/// substitution of coordinate variables by a point's values
pub mod evaluator;
/// structured differential surface elements and integration bounds
pub mod differential;
///________________________________________________________________________________________________________________________________
/// # Flux and line integrals
///# Example
/// ```
/// use RustedCoordFields::coordinates::coord_kind::CoordKind;
/// use RustedCoordFields::coordinates::differential::{Bounds, DifferentialElement};
/// use RustedCoordFields::coordinates::flux::flux;
/// use RustedCoordFields::coordinates::vector_field::VecField;
/// // E = 3/r^2 r̂ through a sphere of radius 2
/// let field = VecField::from_strings(CoordKind::Spherical, ["3/r^2", "0", "0"]).unwrap();
/// let value = flux(
///     &DifferentialElement::spherical_shell(),
///     &field,
///     &Bounds::spherical_shell(2.0),
/// )
/// .unwrap();
/// assert!((value - 12.0 * std::f64::consts::PI).abs() < 1e-9);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod flux;
/// divergence and gradient with the scale factors of each kind
pub mod differential_ops;
