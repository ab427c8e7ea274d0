//! Attribute value states.
//!
//! A configuration attribute handed to the provider is in one of three
//! states: it carries a concrete value, it was left null in the
//! configuration, or it depends on something not yet resolved at plan time
//! (unknown). The distinction matters during `configure`: a null value can
//! fall back to an environment variable, while an unknown value means the
//! provider must not build a client yet.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The state of a single configuration attribute.
///
/// JSON deserialization maps `null` (or an absent field combined with
/// `#[serde(default)]`) to [`AttrValue::Null`] and any concrete value to
/// [`AttrValue::Known`]. [`AttrValue::Unknown`] never arises from plain
/// JSON; the plugin host constructs it for values that are unresolved at
/// plan time, and tests construct it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AttrValue<T> {
    /// A concrete value from the configuration.
    Known(T),
    /// The attribute was left null or absent.
    #[default]
    Null,
    /// The attribute depends on a value not yet resolved at plan time.
    Unknown,
}

impl<T> AttrValue<T> {
    /// Return the concrete value, if there is one.
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// True when the value is unresolved at plan time.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// True when the attribute was left null or absent.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl AttrValue<String> {
    /// Resolve the attribute, falling back to an environment variable when
    /// the configuration left it null. Unknown values resolve to `None`.
    pub fn or_env(&self, var: &str) -> Option<String> {
        match self {
            Self::Known(v) => Some(v.clone()),
            Self::Null => std::env::var(var).ok().filter(|v| !v.is_empty()),
            Self::Unknown => None,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for AttrValue<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Self::Known(v),
            None => Self::Null,
        })
    }
}

impl<T: Serialize> Serialize for AttrValue<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Known(v) => v.serialize(serializer),
            // Unknown values are never echoed back; they serialize as null.
            Self::Null | Self::Unknown => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Config {
        #[serde(default)]
        organization: AttrValue<String>,
        #[serde(default)]
        token: AttrValue<String>,
    }

    #[test]
    fn test_deserialize_known_and_null() {
        let config: Config =
            serde_json::from_value(json!({"organization": "my-org", "token": null})).unwrap();
        assert_eq!(config.organization, AttrValue::Known("my-org".to_string()));
        assert_eq!(config.token, AttrValue::Null);
    }

    #[test]
    fn test_deserialize_absent_field() {
        let config: Config = serde_json::from_value(json!({})).unwrap();
        assert!(config.organization.is_null());
        assert!(config.token.is_null());
    }

    #[test]
    fn test_serialize() {
        assert_eq!(
            serde_json::to_value(AttrValue::Known("x".to_string())).unwrap(),
            json!("x")
        );
        assert_eq!(
            serde_json::to_value(AttrValue::<String>::Null).unwrap(),
            json!(null)
        );
        assert_eq!(
            serde_json::to_value(AttrValue::<String>::Unknown).unwrap(),
            json!(null)
        );
    }

    #[test]
    fn test_or_env_prefers_explicit_value() {
        temp_env::with_var("SONARCLOUD_TEST_ORG", Some("env-org"), || {
            let value = AttrValue::Known("explicit-org".to_string());
            assert_eq!(
                value.or_env("SONARCLOUD_TEST_ORG"),
                Some("explicit-org".to_string())
            );
        });
    }

    #[test]
    fn test_or_env_falls_back_for_null() {
        temp_env::with_var("SONARCLOUD_TEST_FALLBACK", Some("env-org"), || {
            let value = AttrValue::<String>::Null;
            assert_eq!(
                value.or_env("SONARCLOUD_TEST_FALLBACK"),
                Some("env-org".to_string())
            );
        });
    }

    #[test]
    fn test_or_env_unknown_never_resolves() {
        temp_env::with_var("SONARCLOUD_TEST_UNKNOWN", Some("env-org"), || {
            let value = AttrValue::<String>::Unknown;
            assert_eq!(value.or_env("SONARCLOUD_TEST_UNKNOWN"), None);
        });
    }
}
