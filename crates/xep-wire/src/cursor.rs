use crate::error::WireError;
use crate::event::{StartTag, XmlEvent};
use crate::source::EventSource;

/// Default nesting limit used by [`EventCursor::new`].
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Forward-only cursor over an [`EventSource`] that tracks element depth.
///
/// Depth follows the pull-parser convention: it is the nesting level of
/// the element whose start or end tag was just read, so a start tag and
/// its matching end tag report the same depth. The root element is at
/// depth 1.
///
/// ```text
///   event                  depth
///   ─────────────────────  ─────
///   <services>             1
///     <service>            2
///     </service>           2
///   </services>            1
/// ```
///
/// Attribute access is only meaningful while the cursor sits on a start
/// tag; on any other event [`attribute`](Self::attribute) returns `None`.
pub struct EventCursor<S> {
    source: S,
    open: u32,
    close_pending: bool,
    current: Option<StartTag>,
    max_depth: u32,
    events_read: usize,
}

impl<S: EventSource> EventCursor<S> {
    /// Create a cursor with the default depth limit.
    pub fn new(source: S) -> Self {
        Self::with_max_depth(source, DEFAULT_MAX_DEPTH)
    }

    /// Create a cursor that fails once elements nest deeper than `max_depth`.
    pub fn with_max_depth(source: S, max_depth: u32) -> Self {
        Self {
            source,
            open: 0,
            close_pending: false,
            current: None,
            max_depth,
            events_read: 0,
        }
    }

    /// Advance to the next event and return it.
    ///
    /// # Errors
    ///
    /// - [`WireError::DepthLimitExceeded`] if a start tag nests deeper
    ///   than the configured limit.
    /// - Any error the source reports.
    pub fn next_event(&mut self) -> Result<XmlEvent, WireError> {
        if self.close_pending {
            self.open = self.open.saturating_sub(1);
            self.close_pending = false;
        }

        let event = self.source.pull()?;
        self.events_read += 1;
        self.current = None;

        match &event {
            XmlEvent::StartElement(tag) => {
                self.open += 1;
                if self.open > self.max_depth {
                    return Err(WireError::DepthLimitExceeded {
                        limit: self.max_depth,
                    });
                }
                self.current = Some(tag.clone());
            }
            XmlEvent::EndElement(_) => self.close_pending = true,
            XmlEvent::Text(_) | XmlEvent::EndOfInput => {}
        }

        Ok(event)
    }

    /// Nesting level of the element whose tag was just read.
    pub fn depth(&self) -> u32 {
        self.open
    }

    /// Number of events pulled from the source so far.
    pub fn events_read(&self) -> usize {
        self.events_read
    }

    /// The start tag the cursor is positioned on, if any.
    pub fn current(&self) -> Option<&StartTag> {
        self.current.as_ref()
    }

    /// Resolved namespace of the current start tag.
    pub fn namespace(&self) -> Option<&str> {
        self.current.as_ref().and_then(|tag| tag.namespace.as_deref())
    }

    /// Value of attribute `name` on the current start tag.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.current.as_ref().and_then(|tag| tag.attribute(name))
    }

    /// Value of attribute `name`, which must be present.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MissingRequiredAttribute`] if the attribute is
    /// absent (or the cursor is not on a start tag).
    pub fn required_attribute(&self, name: &'static str) -> Result<&str, WireError> {
        self.attribute(name)
            .ok_or(WireError::MissingRequiredAttribute { field: name })
    }

    /// Move onto the next start tag unless already positioned on one.
    ///
    /// Text ahead of the tag is discarded. This is how a decode enters an
    /// element "about to start" rather than already on its start tag.
    ///
    /// # Errors
    ///
    /// - [`WireError::TruncatedInput`] if the input ends first.
    /// - [`WireError::UnexpectedElement`] with `found` set to the closing
    ///   tag's name if an end tag comes first.
    pub fn seek_start(&mut self) -> Result<&StartTag, WireError> {
        while self.current.is_none() {
            match self.next_event()? {
                XmlEvent::StartElement(_) | XmlEvent::Text(_) => {}
                XmlEvent::EndElement(name) => {
                    return Err(WireError::UnexpectedElement {
                        expected: "a start tag",
                        found: format!("/{name}"),
                    });
                }
                XmlEvent::EndOfInput => return Err(WireError::TruncatedInput),
            }
        }
        self.current.as_ref().ok_or(WireError::TruncatedInput)
    }

    /// Position on the start tag of element `name`.
    ///
    /// # Errors
    ///
    /// As [`seek_start`](Self::seek_start), plus
    /// [`WireError::UnexpectedElement`] if the tag found has another name.
    pub fn enter(&mut self, name: &'static str) -> Result<&StartTag, WireError> {
        let tag = self.seek_start()?;
        if tag.name != name {
            return Err(WireError::UnexpectedElement {
                expected: name,
                found: tag.name.clone(),
            });
        }
        Ok(tag)
    }

    /// Read the text content of the current element and stop on its end tag.
    ///
    /// Must be called with the cursor on the element's start tag. After
    /// it returns, the cursor sits on the matching end tag.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedChild`] if the element contains a child
    ///   element instead of plain text.
    /// - [`WireError::TruncatedInput`] if the input ends first.
    pub fn text_content(&mut self) -> Result<String, WireError> {
        let mut text = String::new();
        loop {
            match self.next_event()? {
                XmlEvent::Text(chunk) => text.push_str(&chunk),
                XmlEvent::EndElement(_) => return Ok(text),
                XmlEvent::StartElement(tag) => {
                    return Err(WireError::UnexpectedChild {
                        expected: "text content",
                        found: tag.name,
                    });
                }
                XmlEvent::EndOfInput => return Err(WireError::TruncatedInput),
            }
        }
    }

    /// Give back the underlying source.
    pub fn into_source(self) -> S {
        self.source
    }
}
