//! Parse protocol descriptor documents into the model.
//!
//! Traversal visits only direct children of each container, so nested or
//! foreign content is never mistaken for protocol structure. The root
//! `protocol` container may sit anywhere in the tree; everything outside it
//! is ignored.

use crate::model::{Argument, Description, Element, Enum, EnumValue, Method, Object, Protocol};
use crate::text::normalize_block;
use crate::xml::{self, XmlElement, XmlError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid protocol: missing <protocol> element")]
    MissingProtocol,
    #[error("Malformed document")]
    Markup(#[from] XmlError),
    #[error("Attribute {attribute} is not a number: {value:?}")]
    InvalidNumber {
        attribute: &'static str,
        value: String,
    },
}

/// How malformed numeric attributes are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericPolicy {
    /// Fall back to 0 and let validation flag the result.
    #[default]
    Lenient,
    /// Reject the document with [`ParseError::InvalidNumber`].
    Strict,
}

/// Parser configuration. Missing and blank numeric attributes take their
/// defaults under both policies; only malformed text is policy-sensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub numeric: NumericPolicy,
}

/// Parse a document with the default (lenient) options.
pub fn parse(input: &str) -> Result<Protocol, ParseError> {
    parse_with(input, ParseOptions::default())
}

/// Parse a document.
pub fn parse_with(input: &str, options: ParseOptions) -> Result<Protocol, ParseError> {
    let tree = xml::read_tree(input)?;
    let root = match tree.as_ref().and_then(|el| find_protocol(el)) {
        Some(root) => root,
        None => return Err(ParseError::MissingProtocol),
    };

    let mut elements = Vec::new();
    for child in root.elements() {
        match child.name.as_str() {
            "enum" => elements.push(Element::Enum(parse_enum(child, options)?)),
            "object" => elements.push(Element::Object(parse_object(child, options)?)),
            _ => {}
        }
    }

    Ok(Protocol {
        name: root.attr("name").unwrap_or("").to_string(),
        version: parse_number(root.attr("version"), "version", 1, options)?,
        copyright: direct_text(root, "copyright"),
        description: direct_text(root, "description"),
        elements,
    })
}

/// First `protocol` element in document order, the element itself included.
fn find_protocol(el: &XmlElement) -> Option<&XmlElement> {
    if el.name == "protocol" {
        return Some(el);
    }
    el.elements().find_map(find_protocol)
}

fn parse_enum(el: &XmlElement, options: ParseOptions) -> Result<Enum, ParseError> {
    let mut values = Vec::new();
    for value in el.elements().filter(|e| e.name == "value") {
        values.push(EnumValue {
            idx: parse_number(value.attr("idx"), "idx", 0, options)?,
            name: value.attr("name").unwrap_or("").to_string(),
            description: value.attr("description").map(str::to_string),
        });
    }
    Ok(Enum {
        name: el.attr("name").unwrap_or("").to_string(),
        values,
    })
}

fn parse_object(el: &XmlElement, options: ParseOptions) -> Result<Object, ParseError> {
    let mut methods = Vec::new();
    for method in el
        .elements()
        .filter(|e| e.name == Method::C2S || e.name == Method::S2C)
    {
        methods.push(parse_method(method));
    }
    Ok(Object {
        name: el.attr("name").unwrap_or("").to_string(),
        version: parse_number(el.attr("version"), "version", 1, options)?,
        description: parse_description(el),
        methods,
    })
}

fn parse_method(el: &XmlElement) -> Method {
    let mut args = Vec::new();
    for arg in el.elements().filter(|e| e.name == "arg") {
        args.push(Argument {
            name: arg.attr("name").unwrap_or("").to_string(),
            ty: arg.attr("type").unwrap_or("").to_string(),
            interface: arg.attr("interface").map(str::to_string),
            summary: arg.attr("summary").map(str::to_string),
        });
    }
    let returns = el
        .child("returns")
        .map(|r| r.attr("iface").unwrap_or("").to_string());
    Method {
        name: el.attr("name").unwrap_or("").to_string(),
        // The tag name is the direction
        direction: el.name.clone(),
        description: parse_description(el),
        args,
        returns,
        destructor: el.attr("destructor") == Some("true"),
    }
}

/// Description from the first direct `description` child: summary attribute
/// (blank counts as absent) and normalized body text. `None` when the
/// element is missing or contributes neither.
fn parse_description(parent: &XmlElement) -> Option<Description> {
    let el = parent.child("description")?;
    let summary = el
        .attr("summary")
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let text = normalize_block(&el.text());
    if summary.is_none() && text.is_none() {
        return None;
    }
    Some(Description { summary, text })
}

fn direct_text(parent: &XmlElement, tag: &str) -> Option<String> {
    parent.child(tag).and_then(|el| normalize_block(&el.text()))
}

/// Numeric-attribute handling shared by `version` and `idx`: missing or
/// blank takes the default; malformed text is 0 under the lenient policy
/// and an error under the strict one.
fn parse_number<T>(
    raw: Option<&str>,
    attribute: &'static str,
    default: T,
    options: ParseOptions,
) -> Result<T, ParseError>
where
    T: std::str::FromStr + From<u8>,
{
    let raw = match raw {
        Some(raw) => raw,
        None => return Ok(default),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    match trimmed.parse::<T>() {
        Ok(value) => Ok(value),
        Err(_) => match options.numeric {
            NumericPolicy::Lenient => Ok(T::from(0)),
            NumericPolicy::Strict => Err(ParseError::InvalidNumber {
                attribute,
                value: raw.to_string(),
            }),
        },
    }
}
