use foundation::side::Side;
use params::{MapType, ParamError};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    MapTypeMismatch {
        side: Side,
        expected: MapType,
        found: MapType,
    },
    InvalidParameter(ParamError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::MapTypeMismatch {
                side,
                expected,
                found,
            } => write!(
                f,
                "cannot show {found} parameters on the {side} side of a {expected} comparison"
            ),
            SessionError::InvalidParameter(e) => write!(f, "invalid parameter: {e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::InvalidParameter(e) => Some(e),
            SessionError::MapTypeMismatch { .. } => None,
        }
    }
}

impl From<ParamError> for SessionError {
    fn from(e: ParamError) -> Self {
        SessionError::InvalidParameter(e)
    }
}
