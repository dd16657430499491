//! Render a protocol model as Markdown reference documentation.

use crate::model::{Description, Method, Protocol};

/// Render the whole protocol: title, enum tables, then objects with their
/// methods grouped by direction.
pub fn to_markdown(protocol: &Protocol) -> String {
    let mut md = format!("# {} (v{})\n\n", protocol.name, protocol.version);

    if let Some(desc) = protocol.description.as_deref().filter(|s| !s.is_empty()) {
        md.push_str(desc);
        md.push_str("\n\n");
    }

    let enums: Vec<_> = protocol.enums().collect();
    if !enums.is_empty() {
        md.push_str("## Enumerations\n\n");
        for def in enums {
            md.push_str(&format!("### {}\n\n", def.name));
            md.push_str("| Value | Name | Description |\n");
            md.push_str("|-------|------|-------------|\n");
            for value in &def.values {
                md.push_str(&format!(
                    "| {} | `{}` | {} |\n",
                    value.idx,
                    value.name,
                    value.description.as_deref().unwrap_or("")
                ));
            }
            md.push('\n');
        }
    }

    let objects: Vec<_> = protocol.objects().collect();
    if !objects.is_empty() {
        md.push_str("## Objects\n\n");
        for obj in objects {
            md.push_str(&format!("### {} (v{})\n\n", obj.name, obj.version));
            if let Some(desc) = &obj.description {
                md.push_str(description_text(desc));
                md.push_str("\n\n");
            }

            let c2s: Vec<_> = obj.methods_by_direction(Method::C2S).collect();
            let s2c: Vec<_> = obj.methods_by_direction(Method::S2C).collect();
            if !c2s.is_empty() {
                md.push_str("#### Client → Server Methods\n\n");
                for method in c2s {
                    md.push_str(&method_markdown(method));
                }
            }
            if !s2c.is_empty() {
                md.push_str("#### Server → Client Events\n\n");
                for method in s2c {
                    md.push_str(&method_markdown(method));
                }
            }
        }
    }

    md
}

/// Long text when present, else the summary.
fn description_text(desc: &Description) -> &str {
    desc.text
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(desc.summary.as_deref())
        .unwrap_or("")
}

fn method_markdown(method: &Method) -> String {
    let mut md = format!(
        "**{}**{}\n\n",
        method.name,
        if method.destructor { " _(destructor)_" } else { "" }
    );

    if let Some(desc) = &method.description {
        md.push_str(description_text(desc));
        md.push_str("\n\n");
    }

    if !method.args.is_empty() {
        md.push_str("Arguments:\n");
        for arg in &method.args {
            md.push_str(&format!("- `{}` ({})", arg.name, arg.ty));
            if let Some(interface) = arg.interface.as_deref().filter(|s| !s.is_empty()) {
                md.push_str(&format!(" → {}", interface));
            }
            if let Some(summary) = arg.summary.as_deref().filter(|s| !s.is_empty()) {
                md.push_str(&format!(": {}", summary));
            }
            md.push('\n');
        }
        md.push('\n');
    }

    if let Some(returns) = method.returns.as_deref().filter(|s| !s.is_empty()) {
        md.push_str(&format!("Returns: `{}`\n\n", returns));
    }

    md
}
