//! # Application Layer
//!
//! The controller and the handle to its background task.

mod controller;
mod handle;

pub use controller::ConsentStateController;
pub use handle::ControllerHandle;
