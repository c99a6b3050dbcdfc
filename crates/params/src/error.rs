use crate::map_type::MapType;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    UnknownMapType(String),
    UnknownField { map_type: MapType, field: String },
    NonFinite { field: &'static str, value: f64 },
}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::UnknownMapType(id) => write!(f, "unknown map type: {id}"),
            ParamError::UnknownField { map_type, field } => {
                write!(f, "{map_type} has no parameter named {field}")
            }
            ParamError::NonFinite { field, value } => {
                write!(f, "parameter {field} is not finite: {value}")
            }
        }
    }
}

impl std::error::Error for ParamError {}
