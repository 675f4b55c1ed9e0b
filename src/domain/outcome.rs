use serde::Serialize;

use crate::domain::LedgerError;

/// Caller-facing result shape: `value` is present iff `is_success`,
/// `reason` is present iff not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Self {
            is_success: true,
            value: Some(value),
            reason: None,
        }
    }

    pub fn failure(error: &LedgerError) -> Self {
        Self {
            is_success: false,
            value: None,
            reason: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.is_success
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl<T> From<Result<T, LedgerError>> for Outcome<T> {
    fn from(result: Result<T, LedgerError>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(e) => Self::failure(&e),
        }
    }
}
