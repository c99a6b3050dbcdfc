//! Page-level composition of comparison mode.

pub mod config;
pub mod error;
pub mod history;
pub mod session;

pub use config::*;
pub use error::*;
pub use history::*;
pub use session::*;
