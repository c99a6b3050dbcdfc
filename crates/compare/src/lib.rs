//! URL codec for comparison mode.
//!
//! A comparison page carries both parameter sets in its query string:
//! `?compare=true&left=<json>&right=<json>`, each JSON object tagged with the
//! system id under `type`.

pub mod codec;
pub mod error;
pub mod query;
pub mod state;

pub use codec::*;
pub use error::*;
pub use query::*;
pub use state::*;
