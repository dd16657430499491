//! # wireidl — Wire Protocol IDL Parser and Serializer
//!
//! A parser, serializer, validator and documentation generator for XML wire
//! protocol definitions: a protocol is a versioned set of enums and objects,
//! and each object carries versioned methods flowing client-to-server (`c2s`)
//! or server-to-client (`s2c`).
//!
//! ## Document structure
//!
//! - **Protocol**: root element with `name` and `version`, optional
//!   `<copyright>` and `<description>` text blocks
//! - **Enums**: named integer constants, each `<value>` with `idx`, `name`
//!   and an optional `description` attribute
//! - **Objects**: versioned interfaces holding `<c2s>` and `<s2c>` methods
//! - **Methods**: arguments (`name`, `type`, optional `interface` and
//!   `summary`), an optional `<returns iface="..."/>`, and a `destructor`
//!   marker
//!
//! ## Example document
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <protocol name="core" version="2">
//!   <description>
//!     Object lifecycle and event plumbing.
//!   </description>
//!
//!   <enum name="error">
//!     <value idx="0" name="invalid_method" description="no such method"/>
//!     <value idx="1" name="invalid_object"/>
//!   </enum>
//!
//!   <object name="registry" version="1">
//!     <c2s name="bind">
//!       <arg name="id" type="uint" summary="object id to bind"/>
//!       <returns iface="proxy"/>
//!     </c2s>
//!     <s2c name="removed" destructor="true">
//!       <arg name="id" type="uint"/>
//!     </s2c>
//!   </object>
//! </protocol>
//! ```
//!
//! ## Usage
//!
//! See the [README](https://github.com/yourusername/wireidl) and the `tests/integration.rs` for full examples.

pub mod markdown;
pub mod model;
pub mod parser;
pub mod serializer;
pub mod text;
pub mod validate;
pub mod xml;

pub use markdown::to_markdown;
pub use model::{
    compare, Argument, Comparison, Description, Element, Enum, EnumValue, Method, Object, Protocol,
};
pub use parser::{parse, parse_with, NumericPolicy, ParseError, ParseOptions};
pub use serializer::serialize;
pub use text::{escape, normalize_block, unescape};
pub use validate::{
    validate_enum, validate_object, validate_protocol, ValidationError, ValidationReport,
    ValidationRule,
};
pub use xml::{read_tree, XmlElement, XmlError, XmlNode};
