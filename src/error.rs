use thiserror::Error;

/// Errors raised while denormalizing a JSON:API document.
///
/// Both variants are fatal to the current `parse` call; no partial result is
/// returned. Malformed *nested* structures (a non-object entry in `included`,
/// an identifier missing `id` or `type`) are deliberately not errors - they
/// resolve as "no match" instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    /// The top-level input is not an object, lacks a `data` member, or its
    /// `data` member is neither an object nor an array.
    #[error("unexpected input data format: {0}")]
    MalformedDocument(&'static str),

    /// A relation name collides with an attribute key already present on the
    /// record it would be attached to.
    #[error("cannot set relation '{0}' on record: property name already in use")]
    DuplicateProperty(String),
}
