//! Terminal user interface.

pub mod canvas;
pub mod error;
pub mod scope;

pub use canvas::CanvasSurface;
pub use error::ErrorScreen;
pub use scope::{ScopeTui, ScopeTuiOptions};
