mod ids;
mod locale;
mod module;
mod progress;

pub use ids::{ModuleId, ParseIdError, StepId};
pub use locale::{Locale, Localized, ParseLocaleError};
pub use module::{
    DecisionOption, Difficulty, InteractiveElement, Module, ModuleError, Step, StepKind,
};
pub use progress::ProgressRecord;
