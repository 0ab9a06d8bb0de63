// src/schema.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ENABLED: &str = "enabled";
pub const API_KEY: &str = "apiKey";
pub const API_SECRET: &str = "apiSecret";
pub const ENDPOINT: &str = "endpoint";
pub const REGION: &str = "region";
pub const SCOPE: &str = "scope";
pub const CALLBACK_URL: &str = "callbackUrl";
pub const LOGOUT_ENDPOINT: &str = "logoutEndpoint";
pub const LOGOUT_CALLBACK_URL: &str = "logoutCallbackUrl";
pub const WITH_CUSTOM_LOGIN: &str = "withCustomLogin";
pub const SECRET_KEY: &str = "secretKey";
pub const LOGIN_URL: &str = "loginUrl";

/// Substituted for an empty `apiKey` on save.
pub const DEFAULT_API_KEY: &str = "AWS_COGNITO_API_KEY";
/// Substituted for an empty `apiSecret` on save.
pub const DEFAULT_API_SECRET: &str = "AWS_COGNITO_API_SECRET";

const SCOPE_CALLBACK_PROPERTIES: &[&str] = &[
    ENABLED,
    API_KEY,
    API_SECRET,
    ENDPOINT,
    SCOPE,
    CALLBACK_URL,
    LOGOUT_ENDPOINT,
    LOGOUT_CALLBACK_URL,
];
const SCOPE_CALLBACK_MANDATORY: &[&str] = &[API_KEY, API_SECRET, ENDPOINT, SCOPE, CALLBACK_URL];

const REGION_PROPERTIES: &[&str] = &[ENABLED, API_KEY, API_SECRET, ENDPOINT, REGION];
const REGION_MANDATORY: &[&str] = &[API_KEY, API_SECRET, ENDPOINT, REGION];

const CUSTOM_LOGIN_PROPERTIES: &[&str] = &[
    ENABLED,
    API_KEY,
    API_SECRET,
    ENDPOINT,
    REGION,
    WITH_CUSTOM_LOGIN,
    SECRET_KEY,
    LOGIN_URL,
];
const CUSTOM_LOGIN_MANDATORY: &[&str] = &[SECRET_KEY, LOGIN_URL];

/// Properties holding credentials; masked on display.
const SECRET_PROPERTIES: &[&str] = &[API_SECRET, SECRET_KEY];

/// Successive layouts of the connector settings.
///
/// Each revision owns the property list it reads and writes. Lists are not
/// reconciled across revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaRevision {
    /// OAuth client with scope and callback, plus optional logout redirect.
    ScopeCallback,
    /// OAuth client scoped to an AWS region.
    Region,
    /// Region client or a custom login page, selected by `withCustomLogin`.
    #[default]
    CustomLogin,
}

impl SchemaRevision {
    pub const ALL: [SchemaRevision; 3] = [
        SchemaRevision::ScopeCallback,
        SchemaRevision::Region,
        SchemaRevision::CustomLogin,
    ];

    /// Ordered property list requested on load and written on save.
    pub fn properties(self) -> &'static [&'static str] {
        match self {
            SchemaRevision::ScopeCallback => SCOPE_CALLBACK_PROPERTIES,
            SchemaRevision::Region => REGION_PROPERTIES,
            SchemaRevision::CustomLogin => CUSTOM_LOGIN_PROPERTIES,
        }
    }

    /// Properties that must be non-empty for a save to reach the store.
    pub fn mandatory(self, with_custom_login: bool) -> &'static [&'static str] {
        match self {
            SchemaRevision::ScopeCallback => SCOPE_CALLBACK_MANDATORY,
            SchemaRevision::Region => REGION_MANDATORY,
            SchemaRevision::CustomLogin if with_custom_login => CUSTOM_LOGIN_MANDATORY,
            SchemaRevision::CustomLogin => REGION_MANDATORY,
        }
    }

    pub fn supports_mappers(self) -> bool {
        !matches!(self, SchemaRevision::ScopeCallback)
    }

    pub fn has_custom_login(self) -> bool {
        matches!(self, SchemaRevision::CustomLogin)
    }

    /// Text properties, i.e. everything but the two flags.
    pub fn text_properties(self) -> impl Iterator<Item = &'static str> {
        self.properties()
            .iter()
            .copied()
            .filter(|p| *p != ENABLED && *p != WITH_CUSTOM_LOGIN)
    }

    pub fn recognizes(self, property: &str) -> bool {
        self.properties().contains(&property)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaRevision::ScopeCallback => "scope-callback",
            SchemaRevision::Region => "region",
            SchemaRevision::CustomLogin => "custom-login",
        }
    }

    pub fn schema(self) -> ConnectorConfigSchema {
        let always_required = self.mandatory(false);
        let custom_required: &[&str] = if self.has_custom_login() {
            self.mandatory(true)
        } else {
            &[]
        };
        let fields = self
            .properties()
            .iter()
            .map(|name| {
                let field_type = if *name == ENABLED || *name == WITH_CUSTOM_LOGIN {
                    FieldType::Boolean
                } else if is_secret(name) {
                    FieldType::Secret
                } else {
                    FieldType::Text
                };
                let description = if custom_required.contains(name) {
                    Some("Required when custom login is enabled".to_string())
                } else if self.has_custom_login() && always_required.contains(name) {
                    Some("Required unless custom login is enabled".to_string())
                } else {
                    None
                };
                Field {
                    name: name.to_string(),
                    label: label_for(name).to_string(),
                    field_type,
                    required: always_required.contains(name) && !self.has_custom_login(),
                    description,
                }
            })
            .collect();
        ConnectorConfigSchema {
            revision: self,
            fields,
        }
    }
}

impl fmt::Display for SchemaRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaRevision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scope-callback" => Ok(SchemaRevision::ScopeCallback),
            "region" => Ok(SchemaRevision::Region),
            "custom-login" => Ok(SchemaRevision::CustomLogin),
            other => Err(format!(
                "unknown schema revision '{}', expected one of: scope-callback, region, custom-login",
                other
            )),
        }
    }
}

pub fn is_secret(property: &str) -> bool {
    SECRET_PROPERTIES.contains(&property)
}

fn label_for(property: &str) -> &'static str {
    match property {
        ENABLED => "Enabled",
        API_KEY => "Client ID",
        API_SECRET => "Client secret",
        ENDPOINT => "Endpoint",
        REGION => "Region",
        SCOPE => "Scope",
        CALLBACK_URL => "Callback URL",
        LOGOUT_ENDPOINT => "Logout endpoint",
        LOGOUT_CALLBACK_URL => "Logout callback URL",
        WITH_CUSTOM_LOGIN => "Use custom login",
        SECRET_KEY => "Secret key",
        LOGIN_URL => "Login URL",
        _ => "",
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ConnectorConfigSchema {
    pub revision: SchemaRevision,
    pub fields: Vec<Field>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub enum FieldType {
    Text,
    Secret,
    Boolean,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_login_branches() {
        let rev = SchemaRevision::CustomLogin;
        assert_eq!(rev.mandatory(true), &["secretKey", "loginUrl"]);
        assert_eq!(
            rev.mandatory(false),
            &["apiKey", "apiSecret", "endpoint", "region"]
        );
        assert!(rev.supports_mappers());
    }

    #[test]
    fn test_scope_callback_revision() {
        let rev = SchemaRevision::ScopeCallback;
        assert_eq!(rev.mandatory(true), rev.mandatory(false));
        assert!(!rev.supports_mappers());
        assert!(rev.recognizes("logoutCallbackUrl"));
        assert!(!rev.recognizes("region"));
    }

    #[test]
    fn test_text_properties_skip_flags() {
        let text: Vec<_> = SchemaRevision::CustomLogin.text_properties().collect();
        assert!(!text.contains(&"enabled"));
        assert!(!text.contains(&"withCustomLogin"));
        assert_eq!(text.len(), 6);
    }

    #[test]
    fn test_schema_fields() {
        let schema = SchemaRevision::Region.schema();
        assert_eq!(schema.fields.len(), 5);
        let secret = schema.fields.iter().find(|f| f.name == "apiSecret").unwrap();
        assert_eq!(secret.field_type, FieldType::Secret);
        assert!(secret.required);
        let enabled = schema.fields.iter().find(|f| f.name == "enabled").unwrap();
        assert_eq!(enabled.field_type, FieldType::Boolean);
        assert!(!enabled.required);

        let schema = SchemaRevision::CustomLogin.schema();
        let login = schema.fields.iter().find(|f| f.name == "loginUrl").unwrap();
        assert!(!login.required);
        assert!(login.description.is_some());
    }

    #[test]
    fn test_parse_revision() {
        for rev in SchemaRevision::ALL {
            assert_eq!(rev.as_str().parse::<SchemaRevision>().unwrap(), rev);
        }
        assert!("v4".parse::<SchemaRevision>().is_err());
    }
}
