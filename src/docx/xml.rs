//! Minimal owned XML tree over quick-xml events.
//!
//! Parts are parsed into a tree that keeps every event as read (escaped text,
//! raw attributes, declaration, comments), so an untouched subtree is written
//! back exactly as it came in.

use crate::error::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// A node of the tree.
#[derive(Debug, Clone)]
pub(crate) enum XmlNode {
    Element(XmlElement),
    Text(BytesText<'static>),
    /// Declaration, comment, CDATA, processing instruction or doctype.
    Other(Event<'static>),
}

/// An element with its start tag and children.
#[derive(Debug, Clone)]
pub(crate) struct XmlElement {
    pub start: BytesStart<'static>,
    pub children: Vec<XmlNode>,
    /// Written as `<name/>` when it has no children.
    pub self_closing: bool,
}

impl XmlElement {
    /// New element without attributes.
    pub fn new(name: &'static str) -> Self {
        Self {
            start: BytesStart::new(name),
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// Add an attribute.
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.start.push_attribute((key, value));
        self
    }

    /// Add a child element.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.push(XmlNode::Element(child));
        self
    }

    /// Add a child text node, escaping it.
    pub fn with_text(mut self, text: &str) -> Self {
        self.push(XmlNode::Text(BytesText::new(text).into_owned()));
        self
    }

    /// Append a child node.
    pub fn push(&mut self, node: XmlNode) {
        self.self_closing = false;
        self.children.push(node);
    }

    /// Qualified name check, e.g. `is(b"w:p")`.
    pub fn is(&self, name: &[u8]) -> bool {
        self.start.name().as_ref() == name
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Direct child elements, mutably.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First direct child element with the given name.
    pub fn child(&self, name: &[u8]) -> Option<&XmlElement> {
        self.elements().find(|e| e.is(name))
    }

    /// Value of an attribute, unescaped.
    pub fn attr(&self, key: &[u8]) -> Option<String> {
        self.start
            .attributes()
            .flatten()
            .find(|a| a.key.as_ref() == key)
            .map(|a| {
                a.unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&a.value).into_owned())
            })
    }

    /// Concatenated, unescaped text of the direct text children.
    pub fn text(&self) -> Result<String> {
        let mut out = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(t) => out.push_str(&t.unescape()?),
                XmlNode::Other(Event::CData(c)) => out.push_str(&String::from_utf8_lossy(c)),
                _ => {}
            }
        }
        Ok(out)
    }
}

/// A parsed XML part.
#[derive(Debug, Clone)]
pub(crate) struct XmlTree {
    /// Nodes before, around and after the root element.
    pub nodes: Vec<XmlNode>,
}

impl XmlTree {
    /// Parse a part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        // Whitespace inside w:t is content.
        reader.config_mut().trim_text(false);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut nodes: Vec<XmlNode> = Vec::new();

        loop {
            let node = match reader.read_event()? {
                Event::Start(e) => {
                    stack.push(XmlElement {
                        start: e.into_owned(),
                        children: Vec::new(),
                        self_closing: false,
                    });
                    continue;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::XmlParse("unbalanced end tag".to_string()))?;
                    XmlNode::Element(element)
                }
                Event::Empty(e) => XmlNode::Element(XmlElement {
                    start: e.into_owned(),
                    children: Vec::new(),
                    self_closing: true,
                }),
                Event::Text(t) => XmlNode::Text(t.into_owned()),
                Event::Eof => break,
                other => XmlNode::Other(other.into_owned()),
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => nodes.push(node),
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::XmlParse(format!(
                "unclosed element <{}>",
                String::from_utf8_lossy(open.start.name().as_ref())
            )));
        }

        Ok(Self { nodes })
    }

    /// The document element.
    pub fn root(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// The document element, mutably.
    pub fn root_mut(&mut self) -> Option<&mut XmlElement> {
        self.nodes.iter_mut().find_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Serialize the tree back to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }
        Ok(writer.into_inner())
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<()> {
    match node {
        XmlNode::Element(element) => {
            if element.self_closing && element.children.is_empty() {
                writer.write_event(Event::Empty(element.start.borrow()))?;
            } else {
                writer.write_event(Event::Start(element.start.borrow()))?;
                for child in &element.children {
                    write_node(writer, child)?;
                }
                let end: BytesEnd<'_> = element.start.to_end();
                writer.write_event(Event::End(end))?;
            }
        }
        XmlNode::Text(text) => writer.write_event(Event::Text(text.clone()))?,
        XmlNode::Other(event) => writer.write_event(event.clone())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t xml:space="preserve"> A &amp; B </w:t></w:r></w:p><!-- note --><w:sectPr/></w:body></w:document>"#;

    #[test]
    fn test_roundtrip_is_exact() {
        let tree = XmlTree::parse(SAMPLE).unwrap();
        assert_eq!(String::from_utf8(tree.to_bytes().unwrap()).unwrap(), SAMPLE);
    }

    #[test]
    fn test_navigation_and_text() {
        let tree = XmlTree::parse(SAMPLE).unwrap();
        let root = tree.root().unwrap();
        assert!(root.is(b"w:document"));

        let body = root.child(b"w:body").unwrap();
        let t = body
            .child(b"w:p")
            .and_then(|p| p.child(b"w:r"))
            .and_then(|r| r.child(b"w:t"))
            .unwrap();
        assert_eq!(t.text().unwrap(), " A & B ");
        assert_eq!(t.attr(b"xml:space").as_deref(), Some("preserve"));
    }

    #[test]
    fn test_built_elements_are_escaped() {
        let element = XmlElement::new("w:t")
            .with_attr("xml:space", "preserve")
            .with_text("<<Nom>> & co");
        let tree = XmlTree {
            nodes: vec![XmlNode::Element(element.with_child(XmlElement::new("w:x")))],
        };
        assert_eq!(
            String::from_utf8(tree.to_bytes().unwrap()).unwrap(),
            r#"<w:t xml:space="preserve">&lt;&lt;Nom&gt;&gt; &amp; co<w:x/></w:t>"#
        );
    }

    #[test]
    fn test_unclosed_element_is_error() {
        assert!(XmlTree::parse("<w:document><w:body>").is_err());
    }
}
