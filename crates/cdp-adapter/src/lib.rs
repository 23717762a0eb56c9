//! Chromium driver backing the browser pool (C10) and action executor
//! (C12). Wraps `chromiumoxide` with the narrow, typed surface those
//! layers actually call — goto, content, evaluate, and the handful of
//! input primitives driven by validated `AgentAction`s.

mod driver;
mod error;

pub use driver::{ChromeDriver, DriverPage, LaunchConfig};
pub use error::AdapterError;
