//! Per-run diagnostic state.
//!
//! A [`Diagnostics`] instance is created at the start of each generation run
//! and threaded explicitly through every call that can produce a warning.
//! Nothing here is process-global, so concurrent or repeated runs each own
//! their diagnostic state exclusively from creation to the final
//! [`Outcome`] read.

use crate::error::{GenerateError, GenerateResult};

/// Terminal outcome of a generation run that produced output.
///
/// A failed run never reaches an outcome; it surfaces as a
/// [`GenerateError`] before any output exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No diagnostics were recorded.
    Success,
    /// Diagnostics were recorded but the run was not strict.
    SuccessWithWarnings,
}

/// Run-scoped diagnostics sink with a strict-mode toggle.
#[derive(Debug, Default)]
pub struct Diagnostics {
    strict: bool,
    warnings: Vec<String>,
}

impl Diagnostics {
    /// Create a fresh diagnostics context for one run.
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            warnings: Vec::new(),
        }
    }

    /// Whether strict mode is active.
    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Record a diagnostic.
    ///
    /// In strict mode the diagnostic escalates to a hard failure; otherwise
    /// it is remembered as a warning and the run continues.
    pub fn report(&mut self, diagnostic: GenerateError) -> GenerateResult<()> {
        if self.strict {
            return Err(diagnostic);
        }
        self.warnings.push(diagnostic.to_string());
        Ok(())
    }

    /// Record a plain warning that never escalates.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// All warnings recorded so far, in order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Whether any warning was recorded.
    pub fn warnings_occurred(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Compute the terminal outcome for a run that completed.
    pub fn outcome(&self) -> Outcome {
        if self.warnings_occurred() {
            Outcome::SuccessWithWarnings
        } else {
            Outcome::Success
        }
    }
}
