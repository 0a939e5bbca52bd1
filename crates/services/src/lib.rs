#![forbid(unsafe_code)]

pub mod analytics;
pub mod content;
pub mod countdown;
pub mod error;
pub mod evaluator;
pub mod session;

pub use academy_core::Clock;

pub use analytics::{ConversionConfig, ConversionSink};
pub use content::{ContentResolver, StepView};
pub use countdown::{Countdown, remaining};
pub use error::SessionError;
pub use session::{CompletionHooks, ModuleProgress, ModuleSession};
