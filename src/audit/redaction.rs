//! Redaction of sensitive JSON fields before a body is logged.
//!
//! Only top-level keys of a JSON object are inspected. A key is sensitive
//! when its name contains one of the configured fragments (case-sensitive).
//! Payloads that are not a JSON object, or that repeat a key anywhere, are
//! returned verbatim. Numbers keep their original text.

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};

/// Rewrites sensitive top-level values of JSON object payloads.
#[derive(Debug, Clone)]
pub struct Redactor {
    keys: Vec<String>,
    marker: String,
}

impl Redactor {
    pub fn new(keys: impl IntoIterator<Item = impl Into<String>>, marker: impl Into<String>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            marker: marker.into(),
        }
    }

    /// Returns the payload with sensitive values replaced by the marker.
    ///
    /// Non-JSON (or non-object) payloads pass through unchanged.
    pub fn redact(&self, payload: &str) -> String {
        // A map keeps one value per key, so re-serializing would drop fields.
        if serde_json::from_str::<UniqueKeys>(payload).is_err() {
            return payload.to_string();
        }
        match serde_json::from_str::<Map<String, Value>>(payload) {
            Ok(mut object) => {
                self.redact_object(&mut object);
                serde_json::to_string(&object).unwrap_or_else(|_| payload.to_string())
            }
            Err(_) => payload.to_string(),
        }
    }

    fn redact_object(&self, object: &mut Map<String, Value>) {
        for (key, value) in object.iter_mut() {
            if self.is_sensitive(key) {
                *value = Value::String(self.marker.clone());
            }
        }
    }

    fn is_sensitive(&self, key: &str) -> bool {
        self.keys.iter().any(|k| key.contains(k.as_str()))
    }
}

/// Any JSON value in which no object repeats a key.
struct UniqueKeys;

impl<'de> Deserialize<'de> for UniqueKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UniqueKeysVisitor)
    }
}

struct UniqueKeysVisitor;

impl<'de> Visitor<'de> for UniqueKeysVisitor {
    type Value = UniqueKeys;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON value without repeated object keys")
    }

    fn visit_bool<E>(self, _: bool) -> Result<UniqueKeys, E> {
        Ok(UniqueKeys)
    }

    fn visit_i64<E>(self, _: i64) -> Result<UniqueKeys, E> {
        Ok(UniqueKeys)
    }

    fn visit_u64<E>(self, _: u64) -> Result<UniqueKeys, E> {
        Ok(UniqueKeys)
    }

    fn visit_f64<E>(self, _: f64) -> Result<UniqueKeys, E> {
        Ok(UniqueKeys)
    }

    fn visit_str<E>(self, _: &str) -> Result<UniqueKeys, E> {
        Ok(UniqueKeys)
    }

    fn visit_unit<E>(self) -> Result<UniqueKeys, E> {
        Ok(UniqueKeys)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<UniqueKeys, A::Error> {
        while seq.next_element::<UniqueKeys>()?.is_some() {}
        Ok(UniqueKeys)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<UniqueKeys, A::Error> {
        let mut seen = HashSet::new();
        while let Some(key) = map.next_key::<String>()? {
            if !seen.insert(key) {
                return Err(de::Error::custom("duplicate object key"));
            }
            map.next_value::<UniqueKeys>()?;
        }
        Ok(UniqueKeys)
    }
}
