//! attribute exclusion sets
//!
//! An [ExclusionSet] names the attributes of a document that are "accounted for". Each name
//! either excludes the attribute as a whole ([Exclusion::Excluded]) or describes the
//! attributes expected inside it ([Exclusion::Nested]).
//!
//! In serialized form `null`/`true`/`false` mean [Exclusion::Excluded] and a mapping means
//! [Exclusion::Nested]:
//!
//! ```
//! # use cimi_utils::exclusion::{Exclusion, ExclusionSet};
//! let set: ExclusionSet = serde_json::from_str(r#"{"name": null, "meta": {"href": null}}"#).unwrap();
//!
//! assert_eq!(set.get("name"), Some(&Exclusion::Excluded));
//! assert!(matches!(set.get("meta"), Some(Exclusion::Nested(_))));
//! assert!(set.get("other").is_none());
//! ```
use crate::document::{kind_name, Document};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct ExclusionSet {
    entries: IndexMap<String, Exclusion>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Exclusion {
    /// The attribute and everything below it is accounted for
    Excluded,
    /// Only the listed sub-attributes are accounted for
    Nested(ExclusionSet),
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flat set that excludes each of `names` as a whole
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: names
                .into_iter()
                .map(|name| (name.into(), Exclusion::Excluded))
                .collect(),
        }
    }

    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.entries.insert(name.into(), Exclusion::Excluded);
        self
    }

    pub fn nest(mut self, name: impl Into<String>, nested: ExclusionSet) -> Self {
        self.entries.insert(name.into(), Exclusion::Nested(nested));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Exclusion> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Exclusion)> {
        self.entries.iter().map(|(name, exclusion)| (name.as_str(), exclusion))
    }

    pub fn from_document(document: &Document) -> Result<Self, ExclusionError> {
        Self::from_document_at(document, "")
    }

    fn from_document_at(document: &Document, at: &str) -> Result<Self, ExclusionError> {
        let Document::Object(object) = document else {
            return Err(ExclusionError::NotAMapping {
                path: display_path(at),
                found: kind_name(document),
            });
        };

        let mut entries = IndexMap::with_capacity(object.len());
        for (name, value) in object {
            let path = format!("{at}/{name}");
            let exclusion = match value {
                Document::Null | Document::Bool(_) => Exclusion::Excluded,
                Document::Object(_) => Exclusion::Nested(Self::from_document_at(value, &path)?),
                other => {
                    return Err(ExclusionError::InvalidEntry {
                        path,
                        found: kind_name(other),
                    })
                }
            };
            entries.insert(name.clone(), exclusion);
        }

        Ok(Self { entries })
    }
}

fn display_path(at: &str) -> String {
    if at.is_empty() {
        "/".to_string()
    } else {
        at.to_string()
    }
}

impl TryFrom<Document> for ExclusionSet {
    type Error = ExclusionError;

    fn try_from(value: Document) -> Result<Self, Self::Error> {
        Self::from_document(&value)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ExclusionError {
    #[error("Exclusion set at {path} must be a mapping, found {found}")]
    NotAMapping { path: String, found: &'static str },
    #[error("Exclusion entry {path} must be null, a boolean or a mapping, found {found}")]
    InvalidEntry { path: String, found: &'static str },
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn from_document() {
        let set = ExclusionSet::from_document(&json!({
            "id": null,
            "state": false,
            "meta": {"href": null, "rel": true},
        }))
        .unwrap();

        let expected = ExclusionSet::new().exclude("id").exclude("state").nest(
            "meta",
            ExclusionSet::from_names(["href", "rel"]),
        );

        assert_eq!(set, expected);
    }

    #[test]
    fn rejects_non_mapping_root() {
        assert_eq!(
            ExclusionSet::from_document(&json!(["id"])),
            Err(ExclusionError::NotAMapping {
                path: "/".into(),
                found: "sequence"
            })
        );
    }

    #[test]
    fn rejects_scalar_entries_with_their_path() {
        assert_eq!(
            ExclusionSet::from_document(&json!({"meta": {"href": "yes"}})),
            Err(ExclusionError::InvalidEntry {
                path: "/meta/href".into(),
                found: "string"
            })
        );
    }

    #[test]
    fn deserialize() {
        let set: ExclusionSet = serde_json::from_str(r#"{"b": null, "a": {}}"#).unwrap();

        let names: Vec<_> = set.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(set.get("a"), Some(&Exclusion::Nested(ExclusionSet::new())));

        assert!(serde_json::from_str::<ExclusionSet>("42").is_err());
    }
}
