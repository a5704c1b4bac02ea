use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a search-results page. `link` is always present and
/// absolute; items without a resolvable link are never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub title: Option<String>,
    pub price: Option<String>,
    pub link: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub title: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub specifications: Specifications,
    pub main_image_url: Option<String>,
    pub sku: Option<String>,
}

/// Key/value rows of a specification table.
///
/// Keys are unique and keep the position of their first appearance; a later
/// insert for an existing key replaces the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specifications {
    entries: Vec<(String, String)>,
}

impl Specifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the replaced value if the key was already present.
    ///
    /// Linear scan, so filling a table is quadratic in its row count;
    /// specification tables hold a few dozen rows at most.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for Specifications {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for ProductSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) -> {}",
            self.title.as_deref().unwrap_or("?"),
            self.price.as_deref().unwrap_or("?"),
            self.link
        )
    }
}
