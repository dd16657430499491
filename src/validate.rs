//! Structural validation of protocol models.
//!
//! ## Rules
//!
//! - **Names**: the protocol, every enum, every enum value, every object,
//!   and every method must have a non-empty name.
//! - **Versions**: protocol and object versions must be positive.
//! - **Enum value indices**: pairwise distinct within one enum; every
//!   duplicate occurrence is reported, not just the first.
//! - **Directions**: a method direction must be `c2s` or `s2c`; anything
//!   else is an error, never silently coerced.
//!
//! Validation is exhaustive and never fails early: one pass returns every
//! problem found, in model order. Nothing here is raised as an error type;
//! callers read the returned report.

use crate::model::{Element, Enum, Method, Object, Protocol};
use std::collections::HashSet;
use std::fmt;

/// Identifies which rule produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// A required name is empty.
    MissingName,
    /// A version is zero (or was defaulted from malformed input).
    InvalidVersion,
    /// Two enum values share an index.
    DuplicateValueIndex,
    /// A method direction is neither `c2s` nor `s2c`.
    InvalidDirection,
}

/// A single validation finding.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub rule: ValidationRule,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Aggregate result of validating a whole protocol.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error messages in report order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

/// Validate one enum. `idx` is the element's position in the protocol's
/// element sequence, used in messages.
pub fn validate_enum(def: &Enum, idx: usize) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if def.name.is_empty() {
        errors.push(ValidationError {
            rule: ValidationRule::MissingName,
            message: format!("Enum at index {} missing name", idx),
        });
    }
    let mut seen = HashSet::new();
    for (val_idx, value) in def.values.iter().enumerate() {
        if !seen.insert(value.idx) {
            errors.push(ValidationError {
                rule: ValidationRule::DuplicateValueIndex,
                message: format!("Duplicate enum value index {} in {}", value.idx, def.name),
            });
        }
        if value.name.is_empty() {
            errors.push(ValidationError {
                rule: ValidationRule::MissingName,
                message: format!(
                    "Enum value at index {} in {} missing name",
                    val_idx, def.name
                ),
            });
        }
    }
    errors
}

/// Validate one object. `idx` is the element's position in the protocol's
/// element sequence, used in messages.
pub fn validate_object(obj: &Object, idx: usize) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if obj.name.is_empty() {
        errors.push(ValidationError {
            rule: ValidationRule::MissingName,
            message: format!("Object at index {} missing name", idx),
        });
    }
    if obj.version < 1 {
        errors.push(ValidationError {
            rule: ValidationRule::InvalidVersion,
            message: format!("Object {} has invalid version", obj.name),
        });
    }
    for (method_idx, method) in obj.methods.iter().enumerate() {
        if method.name.is_empty() {
            errors.push(ValidationError {
                rule: ValidationRule::MissingName,
                message: format!("Method at index {} in {} missing name", method_idx, obj.name),
            });
        }
        if method.direction != Method::C2S && method.direction != Method::S2C {
            errors.push(ValidationError {
                rule: ValidationRule::InvalidDirection,
                message: format!(
                    "Method {} has invalid direction: {}",
                    method.name, method.direction
                ),
            });
        }
    }
    errors
}

/// Validate a whole protocol: protocol-level rules, then every element in
/// order.
pub fn validate_protocol(protocol: &Protocol) -> ValidationReport {
    let mut errors = Vec::new();
    if protocol.name.is_empty() {
        errors.push(ValidationError {
            rule: ValidationRule::MissingName,
            message: "Protocol must have a name".to_string(),
        });
    }
    if protocol.version < 1 {
        errors.push(ValidationError {
            rule: ValidationRule::InvalidVersion,
            message: "Protocol must have a valid version".to_string(),
        });
    }
    for (idx, element) in protocol.elements.iter().enumerate() {
        match element {
            Element::Enum(def) => errors.extend(validate_enum(def, idx)),
            Element::Object(obj) => errors.extend(validate_object(obj, idx)),
        }
    }
    ValidationReport { errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnumValue;

    fn value(idx: i64, name: &str) -> EnumValue {
        EnumValue {
            idx,
            name: name.to_string(),
            description: None,
        }
    }

    #[test]
    fn duplicate_index_reported_once_per_duplicate() {
        let def = Enum {
            name: "status".to_string(),
            values: vec![value(0, "A"), value(0, "B")],
        };
        let errors = validate_enum(&def, 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, ValidationRule::DuplicateValueIndex);
        assert_eq!(errors[0].message, "Duplicate enum value index 0 in status");
    }

    #[test]
    fn every_duplicate_occurrence_reported() {
        let def = Enum {
            name: "status".to_string(),
            values: vec![value(1, "A"), value(1, "B"), value(1, "C"), value(2, "D")],
        };
        let errors = validate_enum(&def, 0);
        assert_eq!(errors.len(), 2, "second and third occurrence each flagged");
    }

    #[test]
    fn enum_missing_names() {
        let def = Enum {
            name: String::new(),
            values: vec![value(0, "")],
        };
        let errors = validate_enum(&def, 3);
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Enum at index 3 missing name",
                "Enum value at index 0 in  missing name"
            ]
        );
    }

    #[test]
    fn invalid_direction_single_error() {
        let obj = Object {
            name: "session".to_string(),
            version: 1,
            description: None,
            methods: vec![Method {
                name: "ping".to_string(),
                direction: "x2y".to_string(),
                description: None,
                args: vec![],
                returns: None,
                destructor: false,
            }],
        };
        let errors = validate_object(&obj, 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, ValidationRule::InvalidDirection);
        assert_eq!(errors[0].message, "Method ping has invalid direction: x2y");
    }

    #[test]
    fn object_version_zero_invalid() {
        let obj = Object {
            name: "session".to_string(),
            version: 0,
            description: None,
            methods: vec![],
        };
        let errors = validate_object(&obj, 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, ValidationRule::InvalidVersion);
        assert_eq!(errors[0].message, "Object session has invalid version");
    }

    #[test]
    fn valid_protocol_passes() {
        let protocol = Protocol {
            name: "wire".to_string(),
            version: 1,
            copyright: None,
            description: None,
            elements: vec![Element::Enum(Enum {
                name: "kind".to_string(),
                values: vec![value(0, "none"), value(1, "some")],
            })],
        };
        let report = validate_protocol(&protocol);
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn protocol_level_errors_come_first() {
        let protocol = Protocol {
            name: String::new(),
            version: 0,
            copyright: None,
            description: None,
            elements: vec![Element::Enum(Enum {
                name: String::new(),
                values: vec![],
            })],
        };
        let report = validate_protocol(&protocol);
        assert!(!report.is_valid());
        assert_eq!(
            report.messages(),
            [
                "Protocol must have a name",
                "Protocol must have a valid version",
                "Enum at index 0 missing name"
            ]
        );
    }
}
