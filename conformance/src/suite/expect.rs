//! Expectation helpers that turn a failed check into `ConformanceError::Assertion`.

use std::fmt::Debug;

use crate::error::ConformanceError;
use crate::types::ResourceId;

type Result<T> = std::result::Result<T, ConformanceError>;

pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(ConformanceError::Assertion(message()))
    }
}

pub fn ensure_eq<T, U>(what: &str, expected: T, actual: U) -> Result<()>
where
    T: Debug,
    U: Debug + PartialEq<T>,
{
    ensure(actual == expected, || {
        format!("expected {what} to be {expected:?}, but it was {actual:?}")
    })
}

pub fn ensure_len<T: Debug>(what: &str, items: &[T], expected: usize) -> Result<()> {
    ensure(items.len() == expected, || {
        format!(
            "expected {what} to have length {expected}, but it had length {}: {items:?}",
            items.len()
        )
    })
}

pub fn first<'a, T>(what: &str, items: &'a [T]) -> Result<&'a T> {
    items
        .first()
        .ok_or_else(|| ConformanceError::Assertion(format!("expected {what} not to be empty")))
}

/// The value of an optional field, failing when the backend left it out.
pub fn present<'a, T>(what: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| ConformanceError::Assertion(format!("expected {what} to be present")))
}

pub fn ensure_id(what: &str, id: &ResourceId) -> Result<()> {
    ensure(!matches!(id, ResourceId::Text(s) if s.is_empty()), || {
        format!("expected {what} to have a non-empty id")
    })
}

pub fn ensure_url(what: &str, url: &str) -> Result<()> {
    ensure(!url.trim().is_empty(), || {
        format!("expected {what} to have a non-empty url")
    })
}
