use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::{Validator, FieldErrors};

pub const REGISTRATION_ENABLED: &str = "registration_enabled";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(
    #[serde(deserialize_with = "crate::serde::lenient_string_map")]
    BTreeMap<String, String>
);

impl Settings {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.as_str())
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// missing or unparsable values are treated as disabled
    pub fn registration_enabled(&self) -> bool {
        self.get(REGISTRATION_ENABLED)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

impl From<BTreeMap<String, String>> for Settings {
    fn from(map: BTreeMap<String, String>) -> Self {
        Settings(map)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSetting {
    pub key: String,
    pub value: String,
}

impl UpdateSetting {
    pub fn registration(enabled: bool) -> Self {
        UpdateSetting {
            key: REGISTRATION_ENABLED.into(),
            value: enabled.to_string(),
        }
    }
}

impl Validator for UpdateSetting {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut invalid = FieldErrors::new();

        if self.key.is_empty() {
            invalid.missing("key");
        } else if !savesync_lib::validation::name_valid(&self.key) {
            invalid.invalid("key");
        }

        if !savesync_lib::validation::printable(&self.value, None) {
            invalid.invalid("value");
        }

        invalid.into_result()
    }
}
