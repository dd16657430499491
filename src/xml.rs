//! Generic markup tree built from quick-xml events.
//!
//! The protocol codec works on a small element tree rather than on the raw
//! event stream: parsing needs direct-children scoping ("only the `value`
//! elements immediately inside this `enum`") and recursive text collection,
//! both of which are tree queries. Entity references in text and attribute
//! values are decoded leniently with [`crate::text::unescape`]; unknown
//! entities pass through as written.
//!
//! Comments, processing instructions, the declaration and DOCTYPE are
//! skipped. CDATA joins the surrounding text run. Reading stops once the
//! first top-level element is complete; trailing siblings are ignored.
//! Element nesting deeper than [`MAX_DEPTH`] levels is rejected.

use crate::text::unescape;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("Could not read the next event")]
    Event(#[from] quick_xml::Error),
    #[error("Could not parse an attribute")]
    Attribute(#[from] AttrError),
    #[error("Could not decode content as UTF-8")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("Element nesting deeper than {} levels", MAX_DEPTH)]
    TooDeep,
    #[error("Closing tag </{0}> has no matching open tag")]
    UnmatchedClose(String),
    #[error("Element <{opened}> closed by </{closed}>")]
    MismatchedClose { opened: String, closed: String },
    #[error("Element <{0}> is never closed")]
    Unclosed(String),
}

/// One element: tag name, attributes in document order, child nodes in
/// document order.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    /// First attribute with the given name, entity-decoded.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.as_str() == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// First direct child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.name == name)
    }

    /// Concatenation of all descendant text, in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(el) => el.collect_text(out),
            }
        }
    }
}

/// Maximum element nesting depth accepted by [`read_tree`]. Deeper
/// documents are rejected with [`XmlError::TooDeep`]; recursion over an
/// accepted tree never exceeds this depth.
pub const MAX_DEPTH: usize = 128;

/// Read a document into a tree. Returns `Ok(None)` for a document with no
/// elements at all (empty input, or declaration/comments only).
pub fn read_tree(input: &str) -> Result<Option<XmlElement>, XmlError> {
    let mut reader = Reader::from_reader(input.as_bytes());
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut pending = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(XmlError::TooDeep);
                }
                flush_text(&mut stack, &mut pending);
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(XmlError::TooDeep);
                }
                flush_text(&mut stack, &mut pending);
                let el = element_from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Element(el)),
                    None => return Ok(Some(el)),
                }
            }
            Event::End(end) => {
                flush_text(&mut stack, &mut pending);
                let closed = std::str::from_utf8(end.local_name().as_ref())?.to_string();
                let el = match stack.pop() {
                    Some(el) => el,
                    None => return Err(XmlError::UnmatchedClose(closed)),
                };
                if el.name != closed {
                    return Err(XmlError::MismatchedClose {
                        opened: el.name,
                        closed,
                    });
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Element(el)),
                    None => return Ok(Some(el)),
                }
            }
            Event::Text(text) => {
                let raw = text.into_inner();
                pending.push_str(&unescape(std::str::from_utf8(raw.as_ref())?));
            }
            Event::CData(cdata) => {
                let raw = cdata.into_inner();
                pending.push_str(std::str::from_utf8(raw.as_ref())?);
            }
            Event::GeneralRef(general_ref) => {
                if let Ok(Some(ch)) = general_ref.resolve_char_ref() {
                    pending.push(ch);
                    continue;
                }
                let raw = general_ref.into_inner();
                match std::str::from_utf8(raw.as_ref())? {
                    "amp" => pending.push('&'),
                    "lt" => pending.push('<'),
                    "gt" => pending.push('>'),
                    "quot" => pending.push('"'),
                    "apos" => pending.push('\''),
                    // Unknown entity: keep it verbatim
                    name => {
                        pending.push('&');
                        pending.push_str(name);
                        pending.push(';');
                    }
                }
            }
            Event::Eof => {
                return match stack.pop() {
                    None => Ok(None),
                    Some(el) => Err(XmlError::Unclosed(el.name)),
                };
            }
            // Declaration, comments, processing instructions, DOCTYPE
            _ => {}
        }
    }
}

fn flush_text(stack: &mut Vec<XmlElement>, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let text = std::mem::take(pending);
    // Text outside any element (before the root) is not part of the tree
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Text(text));
    }
}

fn element_from_start(start: &BytesStart) -> Result<XmlElement, XmlError> {
    let name = std::str::from_utf8(start.local_name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.local_name().into_inner())?.to_string();
        let value = unescape(std::str::from_utf8(attr.value.as_ref())?);
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(input: &str) -> XmlElement {
        read_tree(input).expect("read").expect("root element")
    }

    #[test]
    fn reads_nested_elements_in_order() {
        let root = tree("<a><b/><c><d/></c><b/></a>");
        let names: Vec<&str> = root.elements().map(|el| el.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "b"]);
        let c = root.child("c").expect("c");
        assert_eq!(c.elements().count(), 1);
    }

    #[test]
    fn direct_children_only() {
        let root = tree("<a><wrap><b/></wrap></a>");
        assert!(root.child("b").is_none());
        assert!(root.child("wrap").expect("wrap").child("b").is_some());
    }

    #[test]
    fn attributes_are_entity_decoded() {
        let root = tree(r#"<a name="x &amp; y" other="&bogus;"/>"#);
        assert_eq!(root.attr("name"), Some("x & y"));
        assert_eq!(root.attr("other"), Some("&bogus;"));
        assert_eq!(root.attr("missing"), None);
    }

    #[test]
    fn text_concatenates_descendants() {
        let root = tree("<a>one<b>two</b>three</a>");
        assert_eq!(root.text(), "onetwothree");
    }

    #[test]
    fn text_decodes_entities_and_char_refs() {
        let root = tree("<a>x &amp; y &#38; z</a>");
        assert_eq!(root.text(), "x & y & z");
    }

    #[test]
    fn cdata_is_literal() {
        let root = tree("<a><![CDATA[<not & markup>]]></a>");
        assert_eq!(root.text(), "<not & markup>");
    }

    #[test]
    fn comments_do_not_split_text() {
        let root = tree("<a>one<!-- ignored -->two</a>");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.text(), "onetwo");
    }

    #[test]
    fn declaration_and_trailing_siblings_skipped() {
        let input = "<?xml version=\"1.0\"?>\n<a><b/></a><junk>";
        let root = read_tree(input).expect("read").expect("root");
        assert_eq!(root.name, "a");
    }

    #[test]
    fn empty_document_has_no_root() {
        assert!(read_tree("").expect("read").is_none());
        assert!(read_tree("<?xml version=\"1.0\"?>\n").expect("read").is_none());
    }

    #[test]
    fn unclosed_element_is_an_error() {
        assert!(read_tree("<a><b></a>").is_err());
        assert!(read_tree("<a>").is_err());
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let mut doc = "<a>".repeat(MAX_DEPTH);
        doc.push_str(&"</a>".repeat(MAX_DEPTH));
        assert!(read_tree(&doc).expect("read at limit").is_some());

        let too_deep = "<a>".repeat(MAX_DEPTH + 1);
        assert!(matches!(read_tree(&too_deep), Err(XmlError::TooDeep)));
    }

    #[test]
    fn empty_element_counts_toward_depth() {
        let over = format!("{}<b/>", "<a>".repeat(MAX_DEPTH));
        assert!(matches!(read_tree(&over), Err(XmlError::TooDeep)));

        let mut at_limit = format!("{}<b/>", "<a>".repeat(MAX_DEPTH - 1));
        at_limit.push_str(&"</a>".repeat(MAX_DEPTH - 1));
        assert!(read_tree(&at_limit).expect("read at limit").is_some());
    }
}
