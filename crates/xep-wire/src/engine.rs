use crate::cursor::EventCursor;
use crate::error::WireError;
use crate::event::XmlEvent;
use crate::source::EventSource;

/// Content offered to a grammar while its element is being walked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Content<'a> {
    /// A direct child start tag. The cursor is on it, so the handler can
    /// read its attributes, its text, or walk it as a nested element.
    Child(&'a str),
    /// Text directly inside the element being walked.
    Text(&'a str),
}

/// The depth-tracked loop every grammar decodes through.
///
/// Must be called with the cursor on the element's start tag. Events are
/// pulled one at a time until the element's own end tag is read at the
/// depth it started at:
///
/// ```text
///   StartElement at depth + 1   → handler(Content::Child(name))
///   Text at depth               → handler(Content::Text(text))
///   EndElement(own name) at depth → done, cursor left on that end tag
///   EndOfInput                  → WireError::TruncatedInput
///   anything else               → skipped
/// ```
///
/// A handler may consume the child's events (text content, nested walk)
/// or leave them; unconsumed grandchildren and the child's end tag fall
/// into the "skipped" arm. Every iteration consumes exactly one event,
/// so the loop ends after at most as many iterations as the source has
/// events before it reports end of input.
///
/// # Errors
///
/// - [`WireError::TruncatedInput`] if the input ends before the element
///   is closed.
/// - [`WireError::UnexpectedElement`] if the cursor is not on a start tag.
/// - Whatever the handler or the source returns.
pub fn walk_content<S, E, F>(cursor: &mut EventCursor<S>, mut handler: F) -> Result<(), E>
where
    S: EventSource,
    E: From<WireError>,
    F: FnMut(&mut EventCursor<S>, Content<'_>) -> Result<(), E>,
{
    let Some(start) = cursor.current() else {
        return Err(WireError::UnexpectedElement {
            expected: "a start tag",
            found: "no element".to_owned(),
        }
        .into());
    };
    let name = start.name.clone();
    let depth = cursor.depth();

    loop {
        match cursor.next_event()? {
            XmlEvent::StartElement(tag) if cursor.depth() == depth + 1 => {
                handler(cursor, Content::Child(&tag.name))?;
            }
            XmlEvent::Text(text) if cursor.depth() == depth => {
                handler(cursor, Content::Text(&text))?;
            }
            XmlEvent::EndElement(end) if cursor.depth() == depth && end == name => {
                return Ok(());
            }
            XmlEvent::EndOfInput => return Err(WireError::TruncatedInput.into()),
            _ => {}
        }
    }
}

/// [`walk_content`] for grammars that only care about child elements.
///
/// # Errors
///
/// As [`walk_content`].
pub fn walk_children<S, E, F>(cursor: &mut EventCursor<S>, mut handler: F) -> Result<(), E>
where
    S: EventSource,
    E: From<WireError>,
    F: FnMut(&mut EventCursor<S>, &str) -> Result<(), E>,
{
    walk_content(cursor, |cursor, content| match content {
        Content::Child(name) => handler(cursor, name),
        Content::Text(_) => Ok(()),
    })
}

/// Consume the current element and everything inside it.
///
/// # Errors
///
/// As [`walk_content`].
pub fn skip_element<S: EventSource>(cursor: &mut EventCursor<S>) -> Result<(), WireError> {
    walk_children(cursor, |_, _| Ok(()))
}
