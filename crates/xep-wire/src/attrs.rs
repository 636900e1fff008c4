//! Typed attribute extractors.
//!
//! Each reads one attribute from the start tag the cursor is positioned
//! on. Optional extractors yield `None` when the attribute is absent but
//! still fail when it is present and lexically invalid, so a malformed
//! value is never mistaken for a missing one.

use std::str::FromStr;

use crate::cursor::EventCursor;
use crate::error::WireError;
use crate::source::EventSource;

/// A required string attribute.
///
/// # Errors
///
/// [`WireError::MissingRequiredAttribute`] if absent.
pub fn required_string<S: EventSource>(
    cursor: &EventCursor<S>,
    name: &'static str,
) -> Result<String, WireError> {
    cursor.required_attribute(name).map(str::to_owned)
}

/// An optional string attribute, kept verbatim.
pub fn optional_string<S: EventSource>(cursor: &EventCursor<S>, name: &str) -> Option<String> {
    cursor.attribute(name).map(str::to_owned)
}

/// A required integer attribute.
///
/// # Errors
///
/// - [`WireError::MissingRequiredAttribute`] if absent.
/// - [`WireError::InvalidFieldFormat`] if present but not a valid `T`.
pub fn required_integer<S: EventSource, T: FromStr>(
    cursor: &EventCursor<S>,
    name: &'static str,
) -> Result<T, WireError> {
    parse_integer(name, cursor.required_attribute(name)?)
}

/// An optional integer attribute.
///
/// # Errors
///
/// [`WireError::InvalidFieldFormat`] if present but not a valid `T`
/// (including values out of range for `T`).
pub fn optional_integer<S: EventSource, T: FromStr>(
    cursor: &EventCursor<S>,
    name: &'static str,
) -> Result<Option<T>, WireError> {
    cursor
        .attribute(name)
        .map(|raw| parse_integer(name, raw))
        .transpose()
}

/// An optional `xs:boolean` attribute: `true`, `false`, `1` or `0`.
///
/// # Errors
///
/// [`WireError::InvalidFieldFormat`] for any other lexical form.
pub fn optional_boolean<S: EventSource>(
    cursor: &EventCursor<S>,
    name: &'static str,
) -> Result<Option<bool>, WireError> {
    cursor
        .attribute(name)
        .map(|raw| parse_boolean(name, raw))
        .transpose()
}

/// Parse an integer field, mapping failure to [`WireError::InvalidFieldFormat`].
///
/// Shared with grammars that carry integers as element text.
///
/// # Errors
///
/// [`WireError::InvalidFieldFormat`] if `raw` does not parse.
pub fn parse_integer<T: FromStr>(field: &'static str, raw: &str) -> Result<T, WireError> {
    raw.trim().parse().map_err(|_| WireError::InvalidFieldFormat {
        field,
        value: raw.to_owned(),
    })
}

/// Parse an `xs:boolean` lexical value.
///
/// # Errors
///
/// [`WireError::InvalidFieldFormat`] if `raw` is not one of the four
/// accepted spellings.
pub fn parse_boolean(field: &'static str, raw: &str) -> Result<bool, WireError> {
    match raw.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(WireError::InvalidFieldFormat {
            field,
            value: raw.to_owned(),
        }),
    }
}
