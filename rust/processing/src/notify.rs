// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status values a caller can surface after a cutout run.

use serde::Serialize;
use std::fmt;

use crate::error::{CutoutError, Result};
use crate::pipeline::CutoutResult;

/// Message shown when a cutout completes
pub const SUCCESS_MESSAGE: &str = "Any-form Cutout operation finished.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotifyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        })
    }
}

/// One user-facing status line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotifyLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotifyLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotifyLevel::Error,
            message: message.into(),
        }
    }

    /// Status for a pipeline outcome.
    ///
    /// Rejected input is a warning the user can fix and retry; anything else
    /// that stops the run is an error. A finished run that dropped elements
    /// is reported as a warning.
    pub fn from_outcome(outcome: &Result<CutoutResult>) -> Self {
        match outcome {
            Ok(result) if result.warnings.is_empty() => Self::success(SUCCESS_MESSAGE),
            Ok(result) => Self::warning(format!(
                "{SUCCESS_MESSAGE} {} element(s) could not be cut and were dropped.",
                result.warnings.len()
            )),
            Err(err) => Self::from(err),
        }
    }
}

impl From<&CutoutError> for Notification {
    fn from(err: &CutoutError) -> Self {
        if err.is_invalid_input() {
            Self::warning(format!("{err}. Change it and retry."))
        } else {
            Self::error(format!("Cancelled. {err}."))
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}
