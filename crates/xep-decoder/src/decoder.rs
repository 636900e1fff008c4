use xep_types::{DecodeError, ProtocolElement};
use xep_wire::{EventCursor, EventSource, XmlEvent};

use crate::config::DecoderConfig;
use crate::error::ReadError;
use crate::stanza::DecodedStanza;

/// Whole-input decoder: one buffer in, one value out.
///
/// Decoding proceeds in three steps:
///
///   1. **Guard**: reject input larger than `max_input_len`.
///   2. **Locate**: skip the XML declaration, comments and whitespace to
///      the first start tag. Input with none is [`ReadError::NoElement`].
///   3. **Decode** the element, then require that nothing but whitespace
///      and comments follows it ([`ReadError::TrailingData`]).
///
/// # Example
///
/// ```rust
/// use xep_decoder::ElementDecoder;
/// use xep_types::ProtocolElement;
///
/// let element = ElementDecoder::decode(
///     "<retry xmlns='urn:xmpp:http:upload:0' stamp='2024-01-01T00:00:00Z'/>",
/// )
/// .unwrap();
/// assert!(matches!(element, ProtocolElement::Retry(_)));
/// ```
pub struct ElementDecoder;

impl ElementDecoder {
    /// Decode exactly one protocol element with the default limits.
    ///
    /// # Errors
    ///
    /// - [`ReadError::NoElement`] for empty input.
    /// - [`ReadError::TrailingData`] if a second element follows.
    /// - [`ReadError::InputTooLarge`] above 1 MiB.
    /// - [`ReadError::Decode`] for anything the element grammar rejects,
    ///   including [`DecodeError::UnsupportedElement`].
    pub fn decode(input: &str) -> Result<ProtocolElement, ReadError> {
        Self::decode_with_config(input, &DecoderConfig::default())
    }

    /// [`decode`](Self::decode) with explicit limits.
    ///
    /// # Errors
    ///
    /// As [`decode`](Self::decode).
    pub fn decode_with_config(
        input: &str,
        config: &DecoderConfig,
    ) -> Result<ProtocolElement, ReadError> {
        Self::decode_whole(input, config, ProtocolElement::decode)
    }

    /// Decode one `iq`, `message` or `presence` stanza.
    ///
    /// # Errors
    ///
    /// As [`decode`](Self::decode), with
    /// [`DecodeError::UnexpectedElement`] if the root is not a stanza.
    pub fn decode_stanza(input: &str) -> Result<DecodedStanza, ReadError> {
        Self::decode_stanza_with_config(input, &DecoderConfig::default())
    }

    /// [`decode_stanza`](Self::decode_stanza) with explicit limits.
    ///
    /// # Errors
    ///
    /// As [`decode_stanza`](Self::decode_stanza).
    pub fn decode_stanza_with_config(
        input: &str,
        config: &DecoderConfig,
    ) -> Result<DecodedStanza, ReadError> {
        Self::decode_whole(input, config, DecodedStanza::decode)
    }

    fn decode_whole<'a, T>(
        input: &'a str,
        config: &DecoderConfig,
        decode: impl FnOnce(&mut EventCursor<xep_wire::XmlSource<'a>>) -> Result<T, DecodeError>,
    ) -> Result<T, ReadError> {
        config.check_len(input.len())?;
        let mut cursor = config.cursor(input);
        locate_root(&mut cursor)?;
        let value = decode(&mut cursor)?;
        ensure_exhausted(&mut cursor)?;
        Ok(value)
    }
}

/// Advance onto the first start tag.
fn locate_root<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<(), ReadError> {
    loop {
        match cursor.next_event()? {
            XmlEvent::StartElement(_) => return Ok(()),
            XmlEvent::Text(_) => {}
            XmlEvent::EndElement(name) => {
                return Err(DecodeError::UnexpectedElement {
                    expected: "a start tag",
                    found: format!("/{name}"),
                }
                .into());
            }
            XmlEvent::EndOfInput => return Err(ReadError::NoElement),
        }
    }
}

/// Require that the input holds nothing after the decoded element.
fn ensure_exhausted<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<(), ReadError> {
    loop {
        match cursor.next_event()? {
            XmlEvent::EndOfInput => return Ok(()),
            XmlEvent::StartElement(tag) => return Err(ReadError::TrailingData { found: tag.name }),
            XmlEvent::Text(_) | XmlEvent::EndElement(_) => {}
        }
    }
}
