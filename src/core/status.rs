//! Non-fatal compile status and diagnostic accumulation.
//!
//! A successful operation either finished cleanly or finished with diagnostic
//! text the front end or decompiler wanted to report. Failure is the `Err`
//! arm of [`CompileResult`](super::CompileResult), so together they form the
//! three-level Ok / Warning / Error status the driver acts on.

use std::fmt;

/// Outcome of an operation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[must_use]
pub enum Status {
    #[default]
    Ok,
    /// Succeeded, but carries accumulated diagnostic text.
    Warning(String),
}

impl Status {
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Status::Warning(_))
    }

    /// Diagnostic text, empty for [`Status::Ok`].
    pub fn message(&self) -> &str {
        match self {
            Status::Ok => "",
            Status::Warning(text) => text,
        }
    }

    /// Fold another status into this one, appending warning text.
    pub fn merge(self, other: Status) -> Status {
        match (self, other) {
            (Status::Ok, other) => other,
            (this, Status::Ok) => this,
            (Status::Warning(mut a), Status::Warning(b)) => {
                a.push_str(&b);
                Status::Warning(a)
            }
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "ok"),
            Status::Warning(text) => write!(f, "{}", text),
        }
    }
}

/// Per-request accumulator for collaborator diagnostics.
///
/// Text is only ever appended, so several benign diagnostics from different
/// pipeline steps are all surfaced together. One instance belongs to one
/// request and is never shared.
#[derive(Debug, Default)]
pub struct Diagnostics {
    text: String,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append collaborator output. Empty text is ignored.
    pub fn append(&mut self, text: &str) {
        if !text.is_empty() {
            self.text.push_str(text);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Take the accumulated text, leaving the accumulator empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn into_status(self) -> Status {
        if self.text.is_empty() {
            Status::Ok
        } else {
            Status::Warning(self.text)
        }
    }
}
