//! Stanza boundary detection over a raw byte buffer.
//!
//! The buffer is scanned from its start with a non-validating reader that
//! only counts element depth. A frame is complete when depth returns to
//! zero; a buffer that ends inside a tag or element is "not yet", not an
//! error. Anything left between stanzas once the buffer is exhausted
//! (whitespace, comments, processing instructions, stray text) is
//! reported as [`Frame::Filler`] so the caller can drop it.

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::trace;
use xep_wire::is_truncation;

use crate::error::ReadError;

const STREAM_CLOSE: &[u8] = b"</stream:stream>";

/// A complete unit at the front of a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame<'a> {
    /// A top-level element, exactly as it appeared on the wire.
    Stanza(&'a str),
    /// The `<stream:stream>` opening tag or its closing tag.
    StreamBoundary,
    /// Non-element content at the top level with nothing after it.
    Filler,
}

/// Find the first complete frame in `buffer`.
///
/// Returns the frame and the number of bytes it consumed (including any
/// whitespace, declaration or comment in front of it), or `None` if the
/// buffer does not yet hold a complete frame. A returned frame always
/// consumes at least one byte.
///
/// # Errors
///
/// - [`ReadError::InvalidUtf8`] if a complete stanza is not UTF-8.
/// - [`ReadError::Decode`] if the bytes cannot be XML however many more
///   arrive.
pub fn extract_stanza(buffer: &[u8]) -> Result<Option<(Frame<'_>, usize)>, ReadError> {
    let leading = buffer.iter().take_while(|b| b.is_ascii_whitespace()).count();
    if buffer[leading..].starts_with(STREAM_CLOSE) {
        return Ok(Some((Frame::StreamBoundary, leading + STREAM_CLOSE.len())));
    }

    let mut reader = Reader::from_reader(buffer);
    reader.config_mut().check_end_names = false;

    let mut depth: u32 = 0;
    let mut stanza_start = 0;

    loop {
        let before = position(&reader);
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) if is_truncation(&err) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match event {
            Event::Start(start) if depth == 0 && is_stream_tag(start.name().as_ref()) => {
                return Ok(Some((Frame::StreamBoundary, position(&reader))));
            }
            Event::Start(_) => {
                if depth == 0 {
                    stanza_start = before;
                }
                depth += 1;
            }
            Event::Empty(_) if depth == 0 => {
                let end = position(&reader);
                return complete(buffer, before, end).map(Some);
            }
            Event::End(end) if depth == 0 && is_stream_tag(end.name().as_ref()) => {
                return Ok(Some((Frame::StreamBoundary, position(&reader))));
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = position(&reader);
                    return complete(buffer, stanza_start, end).map(Some);
                }
            }
            Event::Text(text) if depth == 0 => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    trace!(
                        offset = before,
                        bytes = text.len(),
                        "discarding text between stanzas"
                    );
                }
            }
            Event::Eof if depth == 0 && before > 0 => {
                trace!(bytes = before, "top-level filler");
                return Ok(Some((Frame::Filler, before)));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn complete(buffer: &[u8], start: usize, end: usize) -> Result<(Frame<'_>, usize), ReadError> {
    let stanza = std::str::from_utf8(&buffer[start..end])?;
    trace!(bytes = end - start, "framed stanza");
    Ok((Frame::Stanza(stanza), end))
}

fn is_stream_tag(name: &[u8]) -> bool {
    name == b"stream:stream" || name == b"stream"
}

#[allow(clippy::cast_possible_truncation)]
fn position(reader: &Reader<&[u8]>) -> usize {
    reader.buffer_position() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stanza(buffer: &[u8]) -> (&str, usize) {
        match extract_stanza(buffer).unwrap() {
            Some((Frame::Stanza(text), consumed)) => (text, consumed),
            other => panic!("expected stanza, got {other:?}"),
        }
    }

    #[test]
    fn self_closing_stanza() {
        assert_eq!(stanza(b"<presence/>"), ("<presence/>", 11));
    }

    #[test]
    fn nested_stanza_and_remainder() {
        let buf = b"  <iq type='result'><slot><put>p</put></slot></iq><presence/>";
        let (text, consumed) = stanza(buf);
        assert_eq!(text, "<iq type='result'><slot><put>p</put></slot></iq>");
        assert_eq!(stanza(&buf[consumed..]).0, "<presence/>");
    }

    #[test]
    fn incomplete_stanza_waits() {
        assert_eq!(extract_stanza(b"<iq type='get'><query xmlns='q'>").unwrap(), None);
        assert_eq!(extract_stanza(b"<iq type='ge").unwrap(), None);
        assert_eq!(extract_stanza(b"<!-- unfinished").unwrap(), None);
        assert_eq!(extract_stanza(b"").unwrap(), None);
    }

    #[test]
    fn trailing_comment_is_filler() {
        let buf = b"<presence/><!-- end of capture -->\n";
        let (_, consumed) = stanza(buf);
        assert_eq!(
            extract_stanza(&buf[consumed..]).unwrap(),
            Some((Frame::Filler, buf.len() - consumed))
        );
        assert_eq!(
            extract_stanza(b"<?xml version='1.0'?>  ").unwrap(),
            Some((Frame::Filler, 23))
        );
        assert_eq!(extract_stanza(b"   ").unwrap(), Some((Frame::Filler, 3)));
    }

    #[test]
    fn stray_text_before_stanza_is_skipped() {
        let buf = b"keepalive?\n<presence id='a'/>";
        assert_eq!(stanza(buf), ("<presence id='a'/>", buf.len()));
        assert_eq!(
            extract_stanza(b"trailing junk").unwrap(),
            Some((Frame::Filler, 13))
        );
    }

    #[test]
    fn stream_tags_are_boundaries() {
        let open = b"<?xml version='1.0'?><stream:stream xmlns='jabber:client' xmlns:stream='http://etherx.jabber.org/streams'>";
        assert_eq!(
            extract_stanza(open).unwrap(),
            Some((Frame::StreamBoundary, open.len()))
        );
        assert_eq!(
            extract_stanza(b"\n</stream:stream>").unwrap(),
            Some((Frame::StreamBoundary, 17))
        );
        assert_eq!(
            extract_stanza(b"<!-- bye --></stream:stream>").unwrap(),
            Some((Frame::StreamBoundary, 28))
        );
    }
}
