use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
/// A single option value as accepted by the Endicia Label Server.
///
/// `Null` is meaningful on merge: a caller-supplied `Null` suppresses a
/// configured default instead of inheriting it, and null-valued options are
/// never serialized into a request document.
pub enum OptionValue {
    /// Explicitly absent; wins over a default on merge, never serialized.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl OptionValue {
    /// Only `Null` and `false` are falsey; any other value counts as set.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Null | Self::Bool(false))
    }

    /// Returns `true` for [`OptionValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
/// Caller options and configured defaults share this shape: a map from the
/// service's case-sensitive field names (`AccountID`, `PassPhrase`,
/// `ToPostalCode`, ...) to values. There is no fixed schema; each request
/// builder reads the keys it recognizes and passes the rest through.
pub struct Options(BTreeMap<String, OptionValue>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Insert an option, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Chaining form of [`Options::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Rendered text for a key, or `None` when the key is absent or `Null`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key) {
            None | Some(OptionValue::Null) => None,
            Some(value) => Some(value.to_string()),
        }
    }

    /// Truthiness of a key; absent keys are falsey.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(OptionValue::is_truthy)
    }

    /// Merge these (caller) options over `defaults`.
    ///
    /// Every key present in `defaults` but absent here is copied; caller keys
    /// always win, including an explicit `Null` meant to suppress a field.
    /// Pure: neither input is modified.
    pub fn merged_over(&self, defaults: &Options) -> Options {
        let mut merged = defaults.clone();
        for (key, value) in &self.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, OptionValue)> for Options {
    fn from_iter<T: IntoIterator<Item = (String, OptionValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_copies_defaults_and_prefers_caller_values() {
        let defaults = Options::new()
            .with("AccountID", "123456")
            .with("PassPhrase", "secret")
            .with("Test", "NO");
        let caller = Options::new().with("Test", "YES").with("LabelSize", "4x6");

        let merged = caller.merged_over(&defaults);
        assert_eq!(merged.text("AccountID").as_deref(), Some("123456"));
        assert_eq!(merged.text("PassPhrase").as_deref(), Some("secret"));
        assert_eq!(merged.text("Test").as_deref(), Some("YES"));
        assert_eq!(merged.text("LabelSize").as_deref(), Some("4x6"));
    }

    #[test]
    fn merge_is_pure() {
        let defaults = Options::new().with("AccountID", "123456");
        let caller = Options::new().with("AccountID", "654321");

        let _ = caller.merged_over(&defaults);
        assert_eq!(defaults.text("AccountID").as_deref(), Some("123456"));
        assert_eq!(caller.text("AccountID").as_deref(), Some("654321"));
    }

    #[test]
    fn explicit_null_suppresses_a_default() {
        let defaults = Options::new().with("InsuredMail", "Endicia");
        let caller = Options::new().with("InsuredMail", OptionValue::Null);

        let merged = caller.merged_over(&defaults);
        assert_eq!(merged.get("InsuredMail"), Some(&OptionValue::Null));
        assert_eq!(merged.text("InsuredMail"), None);
    }

    #[test]
    fn values_render_as_service_text() {
        assert_eq!(OptionValue::from("4x6").to_string(), "4x6");
        assert_eq!(OptionValue::from(123i64).to_string(), "123");
        assert_eq!(OptionValue::from(1.2f64).to_string(), "1.2");
        assert_eq!(OptionValue::from(true).to_string(), "true");
        assert_eq!(OptionValue::Null.to_string(), "");
    }

    #[test]
    fn truthiness_follows_the_validation_rule() {
        assert!(OptionValue::from(true).is_truthy());
        assert!(OptionValue::from("anything").is_truthy());
        assert!(OptionValue::from(0i64).is_truthy());
        assert!(!OptionValue::from(false).is_truthy());
        assert!(!OptionValue::Null.is_truthy());

        let options = Options::new().with("Jewelry", true);
        assert!(options.is_truthy("Jewelry"));
        assert!(!options.is_truthy("Missing"));
    }

    #[test]
    fn options_deserialize_from_config_json() {
        let options: Options = serde_json::from_str(
            r#"{"AccountID": 123, "RequesterID": "abc", "Test": "YES", "Jewelry": true}"#,
        )
        .unwrap();
        assert_eq!(options.get("AccountID"), Some(&OptionValue::Int(123)));
        assert_eq!(options.text("RequesterID").as_deref(), Some("abc"));
        assert_eq!(options.text("Test").as_deref(), Some("YES"));
        assert!(options.is_truthy("Jewelry"));
    }
}
