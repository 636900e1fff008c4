/// A start tag as seen by the cursor: local name, resolved namespace and
/// attributes in document order.
///
/// Namespace declarations (`xmlns`, `xmlns:*`) are not kept as
/// attributes; they are already folded into `namespace`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub namespace: Option<String>,
    pub attributes: Vec<(String, String)>,
}

impl StartTag {
    /// Build a start tag with no attributes.
    pub fn new(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(str::to_owned),
            attributes: Vec::new(),
        }
    }

    /// Append an attribute. Chainable, mostly for building replayed streams.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Look up an attribute value by name.
    ///
    /// If the attribute is repeated (only possible with a replayed
    /// stream), the first occurrence wins.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// One event of the linear stream every grammar consumes.
///
/// ```text
///   <slot xmlns='urn:xmpp:http:upload'><put>https://u/p</put></slot>
///
///   StartElement(slot)  depth 1
///   StartElement(put)   depth 2
///   Text("https://u/p") depth 2
///   EndElement(put)     depth 2
///   EndElement(slot)    depth 1
///   EndOfInput
/// ```
///
/// Self-closing elements are reported as a start immediately followed by
/// the matching end, so grammars never distinguish the two spellings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlEvent {
    StartElement(StartTag),
    EndElement(String),
    Text(String),
    /// The source is exhausted. Returned again on every later pull.
    EndOfInput,
}

impl XmlEvent {
    /// Shorthand for an end event, used when scripting event streams.
    pub fn end(name: impl Into<String>) -> Self {
        Self::EndElement(name.into())
    }

    /// Shorthand for a text event.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}
