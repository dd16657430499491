//! In-memory protocol model.
//!
//! A [`Protocol`] owns an ordered sequence of [`Element`]s (enums and
//! objects interleaved in document order). Order is load-bearing: it
//! round-trips into identical serialized output. Deep structural equality is
//! `PartialEq`; [`compare`] is the shallow name/version/count check.

use serde::{Deserialize, Serialize};

/// Root of a protocol descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    pub name: String,
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    pub elements: Vec<Element>,
}

/// One top-level element, tagged by kind in the interchange form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Enum(Enum),
    Object(Object),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub idx: i64,
    pub name: String,
    /// Attribute-sourced, verbatim: never normalized.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub name: String,
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<Description>,
    pub methods: Vec<Method>,
}

/// A method on an object. `direction` is an open string so that models built
/// outside the parser can hold an invalid direction and validation can
/// report it; the two meaningful values are [`Method::C2S`] and
/// [`Method::S2C`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub direction: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<Description>,
    pub args: Vec<Argument>,
    /// Interface name returned by the call; meaningful for `c2s` methods.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub returns: Option<String>,
    #[serde(default)]
    pub destructor: bool,
}

impl Method {
    /// Client-to-server direction.
    pub const C2S: &'static str = "c2s";
    /// Server-to-client direction.
    pub const S2C: &'static str = "s2c";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Names another object, for reference/enum-typed arguments.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub summary: Option<String>,
}

/// Description of an object or method: a short summary attribute, a
/// normalized text block, or both. Never constructed with neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<String>,
}

impl Protocol {
    /// Enums in document order.
    pub fn enums(&self) -> impl Iterator<Item = &Enum> {
        self.elements.iter().filter_map(|el| match el {
            Element::Enum(e) => Some(e),
            Element::Object(_) => None,
        })
    }

    /// Objects in document order.
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.elements.iter().filter_map(|el| match el {
            Element::Object(o) => Some(o),
            Element::Enum(_) => None,
        })
    }

    /// First enum with the given name.
    pub fn find_enum(&self, name: &str) -> Option<&Enum> {
        self.enums().find(|e| e.name == name)
    }

    /// First object with the given name.
    pub fn find_object(&self, name: &str) -> Option<&Object> {
        self.objects().find(|o| o.name == name)
    }

    /// Lossless interchange form, pretty-printed with two-space indent.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Rebuild a protocol from its interchange form.
    pub fn from_json(json: &str) -> Result<Protocol, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Object {
    /// First method with the given name.
    pub fn find_method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Methods with the given direction, relative order preserved.
    pub fn methods_by_direction<'a>(
        &'a self,
        direction: &'a str,
    ) -> impl Iterator<Item = &'a Method> + 'a {
        self.methods.iter().filter(move |m| m.direction == direction)
    }
}

/// Result of the shallow protocol comparison.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    pub differences: Vec<String>,
}

impl Comparison {
    pub fn is_equal(&self) -> bool {
        self.differences.is_empty()
    }
}

/// Shallow comparison: name, version, enum count, object count. Nested
/// content is not diffed; use `PartialEq` for deep equality.
pub fn compare(a: &Protocol, b: &Protocol) -> Comparison {
    let mut differences = Vec::new();
    if a.name != b.name {
        differences.push(format!(
            "Protocol name differs: \"{}\" vs \"{}\"",
            a.name, b.name
        ));
    }
    if a.version != b.version {
        differences.push(format!(
            "Protocol version differs: {} vs {}",
            a.version, b.version
        ));
    }
    let (a_enums, b_enums) = (a.enums().count(), b.enums().count());
    if a_enums != b_enums {
        differences.push(format!("Enum count differs: {} vs {}", a_enums, b_enums));
    }
    let (a_objects, b_objects) = (a.objects().count(), b.objects().count());
    if a_objects != b_objects {
        differences.push(format!(
            "Object count differs: {} vs {}",
            a_objects, b_objects
        ));
    }
    Comparison { differences }
}
