//! hierarchical attribute reconciliation
//!
//! Copy, merge and strip attributes between [Document]s. None of these operations fail:
//! paths that do not resolve, missing keys and nodes of the wrong kind degrade to a no-op
//! (or to writing `null`, see [copy_field]). Nodes are only ever written into mappings that
//! already exist.
use crate::document::{Document, Object};
use crate::exclusion::{Exclusion, ExclusionSet};
use crate::path::DocPath;
use crate::visit::VisitObjectsMut;

/// Copy the node at `source_path` in `source` to `target_path` in `target`
///
/// Every segment of `target_path` but the last must resolve to an existing mapping, otherwise
/// `target` is left unchanged. When `source_path` does not resolve, `null` is written.
///
/// ```
/// # use serde_json::json;
/// let mut target = json!({"machine": {}});
/// let source = json!({"meta": {"href": "/machines/1"}});
///
/// cimi_utils::reconcile::copy_field(&mut target, &source, "/machine/id", "/meta/href");
/// cimi_utils::reconcile::copy_field(&mut target, &source, "/machine/name", "/meta/name");
/// assert_eq!(target, json!({"machine": {"id": "/machines/1", "name": null}}));
/// ```
pub fn copy_field(target: &mut Document, source: &Document, target_path: &str, source_path: &str) {
    let Some(target_path_parsed) = DocPath::parse(target_path) else {
        return;
    };
    let Some((parent, key)) = target_path_parsed.resolve_parent_mut(target) else {
        tracing::trace!(target_path, "target parent does not resolve, skipping");
        return;
    };

    let value = DocPath::parse(source_path)
        .and_then(|path| path.resolve(source))
        .cloned()
        .unwrap_or(Document::Null);

    tracing::trace!(target_path, source_path, is_null = value.is_null(), "copy field");
    parent.insert(key.to_owned(), value);
}

/// Copy every top level attribute of `source` that is not named in `excluded` into `target`
///
/// Existing attributes of `target` are overwritten. Only the top level names of `excluded`
/// are consulted.
pub fn copy_extra(target: &mut Document, source: &Document, excluded: &ExclusionSet) {
    let (Document::Object(target), Document::Object(source)) = (target, source) else {
        tracing::trace!("copy_extra needs two mappings, skipping");
        return;
    };

    for (name, value) in source {
        if excluded.contains(name) {
            continue;
        }

        tracing::trace!(attribute = %name, "copy extra attribute");
        target.insert(name.clone(), value.clone());
    }
}

/// Whether `source` has any attribute that `exclusions` does not account for
///
/// Attributes are checked in document order and the first unaccounted one ends the search.
/// A [Exclusion::Nested] entry is checked by recursing into the attribute's value; when that
/// finds nothing the search carries on with the next sibling.
pub fn has_extra(source: &Document, exclusions: &ExclusionSet) -> bool {
    let Document::Object(attributes) = source else {
        return false;
    };

    for (name, value) in attributes {
        match exclusions.get(name) {
            None => {
                tracing::debug!(attribute = %name, "found extra attribute");
                return true;
            }
            // an empty nested set has nothing to check against
            Some(Exclusion::Nested(nested)) if !nested.is_empty() => {
                if has_extra(value, nested) {
                    return true;
                }
            }
            Some(_) => {}
        }
    }

    false
}

/// Remove every attribute named `member`, at any depth
pub fn strip_field(document: &mut Document, member: &str) {
    let mut removed = 0usize;
    document.visit_objects_mut(&mut |object: &mut Object| {
        if object.shift_remove(member).is_some() {
            removed += 1;
        }
    });

    tracing::debug!(member, removed, "strip field");
}
