//! Outcome collection for compacted registrations.
//!
//! A compacted registration runs many cases inside one test body. Each
//! case outcome lands in an [`OutcomeLedger`]; finalizing a ledger that
//! saw failures produces a single [`CollatedFailure`] listing every
//! outcome in order, so one glance tells which cases broke and which were
//! fine.

use std::any::Any;
use std::backtrace::Backtrace;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

const TRACE_SEPARATOR: &str = "----------------------------------------";

/// What kind of failure a caught panic was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// A message-carrying panic, the shape `assert!` and friends produce.
    Assertion,
    /// Any other payload.
    Runtime,
}

/// One caught per-case failure.
#[derive(Debug)]
pub struct CaseFailure {
    message: String,
    kind: FailureKind,
    backtrace: Backtrace,
}

impl CaseFailure {
    /// Builds a failure from a `catch_unwind` payload, capturing the
    /// backtrace of the recording site.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let (message, kind) = if let Some(s) = payload.downcast_ref::<&str>() {
            ((*s).to_string(), FailureKind::Assertion)
        } else if let Some(s) = payload.downcast_ref::<String>() {
            (s.clone(), FailureKind::Assertion)
        } else {
            ("unknown panic".to_string(), FailureKind::Runtime)
        };
        Self {
            message,
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}

type Entries = Vec<(String, Option<CaseFailure>)>;

/// Ordered log of per-case outcomes for one compacted registration.
///
/// Recording takes `&self` so concurrently running cases can share one
/// ledger; finalizing consumes it once everything has joined.
#[derive(Debug, Default)]
pub struct OutcomeLedger {
    entries: Mutex<Entries>,
}

impl OutcomeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a passed case.
    pub fn record_success(&self, description: impl Into<String>) {
        self.lock().push((description.into(), None));
    }

    /// Records a failed case.
    pub fn record_failure(&self, description: impl Into<String>, failure: CaseFailure) {
        self.lock().push((description.into(), Some(failure)));
    }

    /// Number of recorded outcomes.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Folds the ledger into one verdict for `context_label`: `Ok` when
    /// every case passed, otherwise a [`CollatedFailure`] listing every
    /// outcome in recording order.
    pub fn finalize(self, context_label: &str) -> Result<(), CollatedFailure> {
        let entries = self
            .entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let mut kind = FailureKind::Assertion;
        let mut first: Option<(&str, &CaseFailure)> = None;
        for (description, failure) in &entries {
            if let Some(failure) = failure {
                if failure.kind == FailureKind::Runtime {
                    kind = FailureKind::Runtime;
                }
                if first.is_none() {
                    first = Some((description, failure));
                }
            }
        }
        let Some((first_description, first_failure)) = first else {
            return Ok(());
        };

        let mut message = String::new();
        message.push_str(context_label);
        message.push('\n');
        for (description, failure) in &entries {
            match failure {
                None => {
                    message.push_str("OK:    ");
                    message.push_str(description);
                }
                Some(failure) => {
                    message.push_str("Error: ");
                    message.push_str(description);
                    message.push_str(": ");
                    message.push_str(&failure.message);
                }
            }
            message.push('\n');
        }
        message.push_str(TRACE_SEPARATOR);
        message.push('\n');
        message.push_str(&format!(
            "Stack trace of first error: {first_description}\n{}\n",
            first_failure.backtrace
        ));
        message.push_str(TRACE_SEPARATOR);

        let failures = entries
            .into_iter()
            .filter_map(|(description, failure)| failure.map(|f| (description, f)))
            .collect();

        Err(CollatedFailure {
            message,
            kind,
            failures,
        })
    }
}

/// Every failure of a compacted registration folded into one error.
///
/// The message carries the registration's context label, an `OK:` /
/// `Error:` line per case in original order, and the first failure's
/// backtrace between separator lines. Raised with [`raise`], the whole
/// value travels as the panic payload, so nothing recorded is lost.
///
/// [`raise`]: CollatedFailure::raise
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CollatedFailure {
    message: String,
    kind: FailureKind,
    failures: Vec<(String, CaseFailure)>,
}

impl CollatedFailure {
    /// [`FailureKind::Assertion`] iff every collected failure was an
    /// assertion.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Every collected failure with its case description, first one
    /// first.
    pub fn failures(&self) -> &[(String, CaseFailure)] {
        &self.failures
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Re-raises the failure as a panic carrying `self`, so runners can
    /// downcast the typed payload back out.
    pub fn raise(self) -> ! {
        std::panic::panic_any(self)
    }
}
