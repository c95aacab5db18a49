//! # cimi-utils - helpers for a CIMI API adapter
//!
//! The adapter exposes a document based (CIMI) API on top of a cloud orchestration backend.
//! This crate holds the pieces that do not depend on any particular resource handler.
//!
//! ## Reconciliation
//!
//! [reconcile] moves attributes between an external [document::Document] and the internal
//! record the backend understands:
//!
//! - [reconcile::copy_field] copies one node addressed by a `/`-separated [path::DocPath]
//! - [reconcile::copy_extra] copies every top level attribute not named in an
//!   [exclusion::ExclusionSet]
//! - [reconcile::has_extra] checks whether a document has attributes an exclusion set does
//!   not account for
//! - [reconcile::strip_field] removes an attribute wherever it appears
//!
//! All of them are best effort. A path that does not resolve or a node of the wrong kind is
//! skipped silently and never reported as an error.
//!
//! **Example**
//!
//! ```
//! use cimi_utils::exclusion::ExclusionSet;
//! use cimi_utils::reconcile;
//! use serde_json::json;
//!
//! let external = json!({"name": "vm", "machineTemplate": {"href": "/templates/1"}, "x": 1});
//! let mut internal = json!({"server": {}});
//!
//! reconcile::copy_field(&mut internal, &external, "/server/name", "/name");
//! reconcile::copy_field(&mut internal, &external, "/server/imageRef", "/machineTemplate/href");
//! assert_eq!(internal, json!({"server": {"name": "vm", "imageRef": "/templates/1"}}));
//!
//! let known = ExclusionSet::new()
//!     .exclude("name")
//!     .nest("machineTemplate", ExclusionSet::from_names(["href"]));
//! assert!(reconcile::has_extra(&external, &known));
//! ```
//!
//! ## Probing
//!
//! [probe::probe] forwards an inbound request to the backend and reports whether the resource
//! exists, along with its headers and (optionally) its body. One connection per call, no retry.
//!
//! ## Everything else
//!
//! - [negotiate]: pick `application/json` or `application/xml` for an `Accept` header
//! - [state]: normalize backend lifecycle states
//! - [error_table]: status and body for each API error kind
//! - [util]: href and path helpers
//!
pub mod document;
pub mod error_table;
pub mod exclusion;
pub mod negotiate;
pub mod path;
pub mod probe;
pub mod reconcile;
pub mod state;
pub mod util;
mod visit;
