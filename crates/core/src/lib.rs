#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod navigator;
pub mod time;

pub use error::Error;
pub use navigator::{ModuleNavigator, NavigatorState, Transition};
pub use time::Clock;
