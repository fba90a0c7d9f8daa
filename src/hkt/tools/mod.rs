pub mod aggregate;
pub mod error;
pub mod io;
pub mod model;
pub mod partition;
pub mod render;
pub mod report;
pub mod transfer;

pub use error::{Result, ToolError};
