pub mod audit;
pub mod error;
pub mod io;
pub mod layout;
pub mod logging;
pub mod merge;
pub mod model;
pub mod run;

pub use error::{Result, ToolError};
