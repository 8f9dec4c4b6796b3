use std::fmt;

/// Error types of the coordinate engine
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// unknown coordinate-system tag
    InvalidKind(String),
    /// axis name that does not exist in the given kind
    InvalidAxisName { name: String, kind: String },
    /// input that does not describe a point
    WrongArgumentType(String),
    /// expression still symbolic where a number was required
    UnresolvedVariable(String),
    /// missing or malformed integration bound
    InvalidBounds(String),
    /// no closed form for the integral
    IntegrationFailure(String),
    /// string that could not be parsed into an expression
    ParseError(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoordError::InvalidKind(tag) => write!(f, "Invalid coordinate kind: {}", tag),
            CoordError::InvalidAxisName { name, kind } => {
                write!(f, "Axis '{}' does not exist in {} coordinates", name, kind)
            }
            CoordError::WrongArgumentType(msg) => write!(f, "Wrong argument type: {}", msg),
            CoordError::UnresolvedVariable(vars) => {
                write!(f, "Unresolved variables after substitution: {}", vars)
            }
            CoordError::InvalidBounds(msg) => write!(f, "Invalid bounds: {}", msg),
            CoordError::IntegrationFailure(msg) => write!(f, "Integration failed: {}", msg),
            CoordError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for CoordError {}
