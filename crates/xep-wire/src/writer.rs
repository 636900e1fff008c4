use quick_xml::escape::escape;

/// A node in an outbound element tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(ElementNode),
    Text(String),
}

/// Outbound element, built by a grammar's encoder and rendered to wire text.
///
/// Rendering rules:
///
/// - attributes are written in insertion order, single-quoted, escaped;
/// - an element with no children is written self-closing (`<get url='…'/>`);
/// - `xmlns` is just another attribute, set by the grammar that owns the
///   namespace and omitted on children that inherit it.
///
/// ```text
///   ElementNode::new("slot")
///       .with_attr("xmlns", "urn:xmpp:http:upload:0")
///       .with_child(ElementNode::new("get").with_attr("url", "https://u/g"))
///
///   → <slot xmlns='urn:xmpp:http:upload:0'><get url='https://u/g'/></slot>
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl ElementNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Element named `name` carrying a default namespace declaration.
    pub fn namespaced(name: impl Into<String>, namespace: &str) -> Self {
        Self::new(name).with_attr("xmlns", namespace)
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add the attribute only when a value is present.
    #[must_use]
    pub fn with_opt_attr<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with_attr(name, value.to_string()),
            None => self,
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = ElementNode>) -> Self {
        self.children.extend(children.into_iter().map(Node::Element));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Append a child in place, for builders that assemble trees in steps.
    pub fn push_child(&mut self, child: ElementNode) {
        self.children.push(Node::Element(child));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Value of an attribute set on this node.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Render the tree to wire text.
    pub fn to_wire(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Render the tree, appending to `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("='");
            out.push_str(&escape(value.as_str()));
            out.push('\'');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_to(out),
                Node::Text(text) => out.push_str(&escape(text.as_str())),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}
