use std::collections::VecDeque;

use quick_xml::NsReader;
use quick_xml::errors::{Error as XmlError, IllFormedError, SyntaxError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use crate::error::WireError;
use crate::event::{StartTag, XmlEvent};

/// A push-style producer of [`XmlEvent`]s.
///
/// This is the seam between the codec and whatever parser sits below it.
/// Implementations must keep returning [`XmlEvent::EndOfInput`] once they
/// are exhausted; the decoder engine relies on that to terminate on
/// truncated input.
pub trait EventSource {
    /// Produce the next event.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Xml`] when the underlying parser rejects the
    /// input outright (as opposed to simply running out of it).
    fn pull(&mut self) -> Result<XmlEvent, WireError>;
}

/// Event source backed by quick-xml's namespace-aware reader over an
/// in-memory buffer.
///
/// The reader is configured so that:
///
/// - self-closing tags expand into a start/end pair,
/// - whitespace-only text (indentation between tags) is dropped; any
///   other text is passed on verbatim, surrounding whitespace included,
/// - CDATA sections surface as ordinary text,
/// - declarations, comments, processing instructions and doctypes are
///   skipped.
///
/// Input that stops in the middle of a tag, comment or CDATA section is
/// reported as [`XmlEvent::EndOfInput`] rather than a syntax error, so
/// callers see one truncation condition regardless of where the cut fell.
pub struct XmlSource<'a> {
    reader: NsReader<&'a [u8]>,
    finished: bool,
}

impl<'a> XmlSource<'a> {
    /// Create a source reading from `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut reader = NsReader::from_str(input);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        Self {
            reader,
            finished: false,
        }
    }

    /// Byte offset of the reader within the input.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.reader.buffer_position()
    }

    fn start_tag(namespace: &ResolveResult<'_>, start: &BytesStart<'_>) -> Result<StartTag, WireError> {
        let namespace = match namespace {
            ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
            ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
        };

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(XmlError::from)?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(StartTag {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            namespace,
            attributes,
        })
    }
}

impl EventSource for XmlSource<'_> {
    fn pull(&mut self) -> Result<XmlEvent, WireError> {
        if self.finished {
            return Ok(XmlEvent::EndOfInput);
        }

        loop {
            let (namespace, event) = match self.reader.read_resolved_event() {
                Ok(pair) => pair,
                Err(err) => {
                    self.finished = true;
                    return if is_truncation(&err) {
                        Ok(XmlEvent::EndOfInput)
                    } else {
                        Err(err.into())
                    };
                }
            };

            return match event {
                Event::Start(start) => Ok(XmlEvent::StartElement(Self::start_tag(&namespace, &start)?)),
                Event::End(end) => Ok(XmlEvent::EndElement(
                    String::from_utf8_lossy(end.local_name().as_ref()).into_owned(),
                )),
                Event::Text(text) => {
                    let text = text.unescape()?;
                    if text.chars().all(char::is_whitespace) {
                        continue;
                    }
                    Ok(XmlEvent::Text(text.into_owned()))
                }
                Event::CData(data) => Ok(XmlEvent::Text(String::from_utf8_lossy(&data).into_owned())),
                Event::Eof => {
                    self.finished = true;
                    Ok(XmlEvent::EndOfInput)
                }
                _ => continue,
            };
        }
    }
}

/// Whether a reader error means "the input stopped too early" rather than
/// "the input is not XML".
///
/// Stanza framers use this to tell "wait for more bytes" apart from
/// "give up on this stream".
pub fn is_truncation(err: &XmlError) -> bool {
    match err {
        XmlError::Syntax(SyntaxError::InvalidBangMarkup) => false,
        XmlError::Syntax(_) | XmlError::IllFormed(IllFormedError::MissingEndTag(_)) => true,
        _ => false,
    }
}

/// Event source that replays a pre-recorded sequence.
///
/// Useful for driving grammars with event streams a real parser would
/// never produce (mismatched end tags, text after the root, streams cut
/// at an arbitrary point) and for replaying captured traffic.
#[derive(Clone, Debug, Default)]
pub struct ReplaySource {
    events: VecDeque<XmlEvent>,
}

impl ReplaySource {
    #[must_use]
    pub fn new(events: impl IntoIterator<Item = XmlEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Events not yet pulled.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for ReplaySource {
    fn pull(&mut self) -> Result<XmlEvent, WireError> {
        Ok(self.events.pop_front().unwrap_or(XmlEvent::EndOfInput))
    }
}
