//! Serialize a protocol model to canonical document text.
//!
//! The output shape is fixed: prolog line, root tag, copyright and
//! description blocks at a two-space indent followed by a blank line,
//! elements in stored order each followed by a blank line, trailing
//! whitespace trimmed before the closing root tag. Serialization is total
//! and performs no validation; callers validate separately if they care.
//!
//! All attribute values and text blocks are entity-escaped, and optional
//! attributes are emitted whenever present (even when empty), so parsing
//! the output reproduces the model exactly.

use crate::model::{Description, Element, Enum, Method, Object, Protocol};
use crate::text::{escape, render_block};

/// Render the canonical document for a protocol.
pub fn serialize(protocol: &Protocol) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<protocol name=\"{}\" version=\"{}\">\n",
        escape(&protocol.name),
        protocol.version
    ));

    if let Some(copyright) = &protocol.copyright {
        xml.push_str(&render_block("copyright", &escape(copyright), 2));
        xml.push('\n');
    }
    if let Some(description) = &protocol.description {
        xml.push_str(&render_block("description", &escape(description), 2));
        xml.push('\n');
    }

    for element in &protocol.elements {
        match element {
            Element::Enum(def) => serialize_enum(&mut xml, def, 2),
            Element::Object(obj) => serialize_object(&mut xml, obj, 2),
        }
    }

    let mut out = xml.trim_end().to_string();
    out.push_str("\n</protocol>");
    out
}

fn serialize_enum(xml: &mut String, def: &Enum, indent: usize) {
    let spaces = " ".repeat(indent);
    xml.push_str(&format!(
        "{}<enum name=\"{}\">\n",
        spaces,
        escape(&def.name)
    ));
    for value in &def.values {
        xml.push_str(&format!(
            "{}  <value idx=\"{}\" name=\"{}\"",
            spaces,
            value.idx,
            escape(&value.name)
        ));
        if let Some(description) = &value.description {
            xml.push_str(&format!(" description=\"{}\"", escape(description)));
        }
        xml.push_str("/>\n");
    }
    xml.push_str(&format!("{}</enum>\n\n", spaces));
}

fn serialize_object(xml: &mut String, obj: &Object, indent: usize) {
    let spaces = " ".repeat(indent);
    xml.push_str(&format!(
        "{}<object name=\"{}\" version=\"{}\">\n",
        spaces,
        escape(&obj.name),
        obj.version
    ));
    if let Some(description) = &obj.description {
        xml.push_str(&serialize_description(description, indent + 2));
    }

    let mut methods = String::new();
    for method in &obj.methods {
        serialize_method(&mut methods, method, indent + 2);
    }
    // An object with no methods keeps one blank interior line
    xml.push_str(methods.trim_end());
    xml.push('\n');

    xml.push_str(&format!("{}</object>\n\n", spaces));
}

fn serialize_method(xml: &mut String, method: &Method, indent: usize) {
    let spaces = " ".repeat(indent);
    let destructor = if method.destructor {
        " destructor=\"true\""
    } else {
        ""
    };
    xml.push_str(&format!(
        "{}<{} name=\"{}\"{}>\n",
        spaces,
        method.direction,
        escape(&method.name),
        destructor
    ));

    if let Some(description) = &method.description {
        xml.push_str(&serialize_description(description, indent + 2));
    }

    for arg in &method.args {
        xml.push_str(&format!(
            "{}  <arg name=\"{}\" type=\"{}\"",
            spaces,
            escape(&arg.name),
            escape(&arg.ty)
        ));
        if let Some(interface) = &arg.interface {
            xml.push_str(&format!(" interface=\"{}\"", escape(interface)));
        }
        if let Some(summary) = &arg.summary {
            xml.push_str(&format!(" summary=\"{}\"", escape(summary)));
        }
        xml.push_str("/>\n");
    }

    if let Some(returns) = &method.returns {
        xml.push_str(&format!(
            "{}  <returns iface=\"{}\"/>\n",
            spaces,
            escape(returns)
        ));
    }

    xml.push_str(&format!("{}</{}>\n\n", spaces, method.direction));
}

/// Description block: summary attribute on the open tag, text lines
/// re-indented two deeper, empty pair when there is no text. A blank
/// summary is skipped; the parser reads it back as absent either way.
fn serialize_description(desc: &Description, indent: usize) -> String {
    let spaces = " ".repeat(indent);
    let summary_attr = match desc.summary.as_deref() {
        Some(summary) if !summary.is_empty() => format!(" summary=\"{}\"", escape(summary)),
        _ => String::new(),
    };

    let text = desc.text.as_deref().unwrap_or("");
    if text.trim().is_empty() {
        return format!(
            "{}<description{}>\n{}</description>\n",
            spaces, summary_attr, spaces
        );
    }

    let formatted = text
        .split('\n')
        .map(|line| {
            let line = line.trim();
            if line.is_empty() {
                String::new()
            } else {
                format!("{}  {}", spaces, escape(line))
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}<description{}>\n{}  {}\n{}</description>\n",
        spaces,
        summary_attr,
        spaces,
        formatted.trim(),
        spaces
    )
}
