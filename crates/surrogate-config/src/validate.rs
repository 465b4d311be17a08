//! Manifest validation.
//!
//! Checks the shape of a manifest before any protocol is built. Conflicts
//! with adopted protocols are caught later by the protocol builder.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::types::{PolicyConfig, ProxyManifest};

/// Validate a parsed manifest.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(manifest: &ProxyManifest) -> ConfigResult<()> {
    validate_name(manifest)?;
    validate_adopts(manifest)?;
    validate_methods(manifest)?;
    validate_default(manifest)?;
    Ok(())
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

fn validate_name(manifest: &ProxyManifest) -> ConfigResult<()> {
    let name = &manifest.protocol.name;
    if name.trim().is_empty() {
        return Err(invalid("protocol.name", "must not be empty"));
    }
    if name.trim() != name {
        return Err(invalid(
            "protocol.name",
            format!("'{name}' has leading or trailing whitespace"),
        ));
    }
    Ok(())
}

fn validate_adopts(manifest: &ProxyManifest) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for parent in &manifest.protocol.adopts {
        if *parent == manifest.protocol.name {
            return Err(invalid(
                "protocol.adopts",
                format!("'{parent}' cannot adopt itself"),
            ));
        }
        if !seen.insert(parent.as_str()) {
            return Err(invalid(
                "protocol.adopts",
                format!("'{parent}' is listed more than once"),
            ));
        }
    }
    Ok(())
}

fn validate_methods(manifest: &ProxyManifest) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for (index, method) in manifest.protocol.methods.iter().enumerate() {
        let field = format!("protocol.methods[{index}].selector");
        if method.selector.trim().is_empty() {
            return Err(invalid(field, "must not be empty"));
        }
        if method.selector.trim() != method.selector {
            return Err(invalid(
                field,
                format!("'{}' has leading or trailing whitespace", method.selector),
            ));
        }
        if !seen.insert(method.selector.as_str()) {
            return Err(invalid(
                field,
                format!("'{}' is declared more than once", method.selector),
            ));
        }
    }
    Ok(())
}

fn validate_default(manifest: &ProxyManifest) -> ConfigResult<()> {
    if let PolicyConfig::Value { value } = &manifest.default
        && value.is_null()
    {
        return Err(invalid("default.value", "must not be null"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MethodSection, ProtocolSection};
    use surrogate_proxy::ReturnKind;

    fn manifest(name: &str) -> ProxyManifest {
        ProxyManifest {
            protocol: ProtocolSection {
                name: name.to_string(),
                adopts: Vec::new(),
                methods: vec![MethodSection {
                    selector: "greet".to_string(),
                    returns: ReturnKind::Value,
                }],
            },
            default: PolicyConfig::None,
        }
    }

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_valid_manifest() {
        assert!(validate(&manifest("GreeterDelegate")).is_ok());
    }

    #[test]
    fn test_empty_name() {
        let err = validate(&manifest(" ")).unwrap_err();
        assert_eq!(field_of(err), "protocol.name");
    }

    #[test]
    fn test_padded_name() {
        let err = validate(&manifest(" GreeterDelegate")).unwrap_err();
        assert_eq!(field_of(err), "protocol.name");
    }

    #[test]
    fn test_self_adoption() {
        let mut m = manifest("GreeterDelegate");
        m.protocol.adopts.push("GreeterDelegate".to_string());
        assert_eq!(field_of(validate(&m).unwrap_err()), "protocol.adopts");
    }

    #[test]
    fn test_duplicate_selector() {
        let mut m = manifest("GreeterDelegate");
        m.protocol.methods.push(MethodSection {
            selector: "greet".to_string(),
            returns: ReturnKind::Bool,
        });
        assert_eq!(
            field_of(validate(&m).unwrap_err()),
            "protocol.methods[1].selector"
        );
    }

    #[test]
    fn test_padded_selector() {
        let mut m = manifest("GreeterDelegate");
        m.protocol.methods[0].selector = "greet ".to_string();
        let err = validate(&m).unwrap_err();
        assert!(err.to_string().contains("leading or trailing whitespace"));
        assert_eq!(field_of(err), "protocol.methods[0].selector");
    }

    #[test]
    fn test_null_default_value() {
        let mut m = manifest("GreeterDelegate");
        m.default = PolicyConfig::Value {
            value: serde_json::Value::Null,
        };
        assert_eq!(field_of(validate(&m).unwrap_err()), "default.value");
    }
}
