use std::collections::BTreeMap;
use std::fmt;

use serde::de;
use serde::Deserialize;

/// nil slices and maps arrive as `null`, read them as the default value
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: de::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// target config values arrive as a string map, but older backends have
/// been seen sending plain booleans and numbers. every scalar is read back
/// as its string form and nulls are dropped. a null config is an empty map.
pub fn lenient_string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: de::Deserializer<'de>,
{
    Ok(Option::<LenientMap>::deserialize(deserializer)?
        .map(|map| map.0)
        .unwrap_or_default())
}

struct LenientMap(BTreeMap<String, String>);

impl<'de> Deserialize<'de> for LenientMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(LenientMapVisitor).map(LenientMap)
    }
}

struct LenientMapVisitor;

impl<'de> de::Visitor<'de> for LenientMapVisitor {
    type Value = BTreeMap<String, String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a map of scalar values")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let mut map = BTreeMap::new();

        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            let value = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s,
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => {
                    return Err(de::Error::invalid_value(
                        de::Unexpected::Map,
                        &"a scalar config value"
                    ));
                }
            };

            map.insert(key, value);
        }

        Ok(map)
    }
}
