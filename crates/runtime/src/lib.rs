pub mod debounce;
pub mod subscribers;

pub use debounce::*;
pub use subscribers::*;
