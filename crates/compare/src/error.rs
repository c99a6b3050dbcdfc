use foundation::side::Side;
use params::{MapType, ParamError};

/// Why a comparison URL was rejected.
///
/// Decode failures are an expected entry path (partial bookmarks, hand-edited
/// links); callers fall back to defaults rather than surfacing these.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    NotComparison,
    MissingSide(Side),
    Malformed { side: Side, message: String },
    MapTypeMismatch { side: Side, expected: MapType, found: MapType },
    InvalidParameter { side: Side, source: ParamError },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::NotComparison => write!(f, "compare flag absent or not \"true\""),
            DecodeError::MissingSide(side) => write!(f, "missing {side} parameters"),
            DecodeError::Malformed { side, message } => {
                write!(f, "malformed {side} parameters: {message}")
            }
            DecodeError::MapTypeMismatch {
                side,
                expected,
                found,
            } => write!(f, "{side} parameters are for {found}, expected {expected}"),
            DecodeError::InvalidParameter { side, source } => {
                write!(f, "invalid {side} parameters: {source}")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::InvalidParameter { source, .. } => Some(source),
            _ => None,
        }
    }
}
