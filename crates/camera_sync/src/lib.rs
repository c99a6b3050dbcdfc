//! Camera synchronization between the two views of a comparison page.
//!
//! Each view reports its orientation to a [`CameraSyncCoordinator`] through a
//! [`ViewHandle`]; the coordinator debounces reports per side, records which
//! side wrote last, and never hands a side its own write back.

pub mod adapter;
pub mod config;
pub mod coordinator;
pub mod handle;
pub mod orbit;
pub mod orientation;

pub use adapter::*;
pub use config::*;
pub use coordinator::*;
pub use handle::*;
pub use orbit::*;
pub use orientation::*;
