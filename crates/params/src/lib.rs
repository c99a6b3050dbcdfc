//! Parameter sets for the supported chaotic systems.

pub mod error;
pub mod map_type;
pub mod parameter_set;
pub mod stability;

pub use error::*;
pub use map_type::*;
pub use parameter_set::*;
pub use stability::*;
