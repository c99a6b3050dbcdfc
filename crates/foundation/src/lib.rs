pub mod math;
pub mod side;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use math::*;
pub use side::*;
pub use time::*;
