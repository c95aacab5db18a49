//! `/`-separated paths into [Document]s
//!
//! `/meta/href` addresses `document["meta"]["href"]` by repeated key lookup. Leading and
//! trailing `/` are ignored. Resolution never creates nodes: a missing segment, or a segment
//! that lands on anything but a mapping, means the path does not resolve.
use crate::document::{Document, Object};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPath<'a> {
    segments: Vec<&'a str>,
}

impl<'a> DocPath<'a> {
    /// Returns `None` for the empty path, which addresses nothing
    pub fn parse(path: &'a str) -> Option<Self> {
        if path.is_empty() {
            return None;
        }

        Some(Self {
            segments: path.trim_matches('/').split('/').collect(),
        })
    }

    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Node addressed by the full path
    pub fn resolve<'d>(&self, document: &'d Document) -> Option<&'d Document> {
        self.segments.iter().try_fold(document, |node, segment| {
            let next = node.as_object()?.get(*segment);
            if next.is_none() {
                tracing::trace!(segment, "path segment does not resolve");
            }
            next
        })
    }

    /// Mapping holding the last segment, together with that last segment
    ///
    /// The last segment must not be empty and every segment before it must resolve to a mapping.
    pub fn resolve_parent_mut<'d>(
        &self,
        document: &'d mut Document,
    ) -> Option<(&'d mut Object, &'a str)> {
        let (key, parents) = self.segments.split_last()?;
        if key.is_empty() {
            return None;
        }

        let mut node = document;
        for segment in parents {
            node = node.as_object_mut()?.get_mut(*segment)?;
        }

        Some((node.as_object_mut()?, *key))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parse_strips_outer_slashes() {
        assert_eq!(DocPath::parse("/a/b/").unwrap().segments(), ["a", "b"]);
        assert_eq!(DocPath::parse("a").unwrap().segments(), ["a"]);
        assert_eq!(DocPath::parse("/").unwrap().segments(), [""]);
        assert!(DocPath::parse("").is_none());
    }

    #[test]
    fn resolve() {
        let document = json!({"meta": {"href": "/x/1", "tags": ["a"]}});

        let href = DocPath::parse("/meta/href").unwrap();
        assert_eq!(href.resolve(&document), Some(&json!("/x/1")));

        let missing = DocPath::parse("/meta/nope/deeper").unwrap();
        assert_eq!(missing.resolve(&document), None);

        // sequences are not indexed
        let into_sequence = DocPath::parse("/meta/tags/0").unwrap();
        assert_eq!(into_sequence.resolve(&document), None);
    }

    #[test]
    fn resolve_parent_mut() {
        let mut document = json!({"a": {"b": {}}, "s": "scalar"});

        let path = DocPath::parse("/a/b/c").unwrap();
        let (parent, key) = path.resolve_parent_mut(&mut document).unwrap();
        assert_eq!(key, "c");
        parent.insert(key.to_owned(), json!(1));
        assert_eq!(document, json!({"a": {"b": {"c": 1}}, "s": "scalar"}));

        let root_child = DocPath::parse("/link").unwrap();
        let (parent, key) = root_child.resolve_parent_mut(&mut document).unwrap();
        assert_eq!(key, "link");
        assert_eq!(parent.len(), 2);

        for unresolved in ["/x/c", "/s/c", "/a//c", "/"] {
            let path = DocPath::parse(unresolved).unwrap();
            assert!(
                path.resolve_parent_mut(&mut document).is_none(),
                "{unresolved} should not resolve"
            );
        }
    }
}
