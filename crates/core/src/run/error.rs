use std::error::Error;
use std::fmt::{self, Display};
use std::io;

use chatline_model::{ErrorKind, ModelProviderError};

/// Errors that end a run.
#[derive(Debug)]
pub enum RunError {
    /// The model request failed.
    Model(Box<dyn ModelProviderError>),
    /// The model asked for a tool the agent doesn't have.
    UnknownTool(String),
    /// The model kept asking for tools beyond the allowed round trips.
    MaxTurnsExceeded(usize),
    /// Neither the run configuration nor the agent has a model.
    ModelNotConfigured,
    /// The runtime for a blocking run could not be created.
    Runtime(io::Error),
}

impl RunError {
    /// Returns the provider's error kind if the model request failed.
    #[inline]
    pub fn model_error_kind(&self) -> Option<ErrorKind> {
        match self {
            RunError::Model(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Model(err) => write!(f, "{} ({})", err, err.kind()),
            RunError::UnknownTool(name) => {
                write!(f, "model called an unknown tool: {name}")
            }
            RunError::MaxTurnsExceeded(max) => {
                write!(f, "max turns ({max}) exceeded")
            }
            RunError::ModelNotConfigured => write!(f, "no model configured"),
            RunError::Runtime(err) => write!(f, "failed to start runtime: {err}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RunError::Runtime(err) => Some(err),
            _ => None,
        }
    }
}
