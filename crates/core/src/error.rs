use thiserror::Error;

use crate::model::{ModuleError, ParseIdError, ParseLocaleError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Module(#[from] ModuleError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
    #[error(transparent)]
    ParseLocale(#[from] ParseLocaleError),
}
