//! Snapshot tests
//!
//! Runs each reconcile/*.json case and compares the resulting target document.
//!
//! A case holds `target` and `source` documents plus the operations to apply, in this order:
//! `copy_fields` (pairs of target and source path), `copy_extra` with `exclude`, then `strip`.
//! `has_extra` is reported for `source` against `exclude`.
use cimi_utils::exclusion::ExclusionSet;
use cimi_utils::reconcile;
use serde_json::{json, Value};

#[test]
fn snapshots() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("CIMI_LOG"))
        .with_writer(std::io::stderr)
        .init();

    insta::glob!("reconcile/*.json", |path| {
        let contents = std::fs::read_to_string(path).unwrap();
        let case: Value = serde_json::from_str(&contents).expect("case must be valid json");

        let mut target = case["target"].clone();
        let source = &case["source"];
        let exclude = ExclusionSet::from_document(&case["exclude"]).expect("valid exclusion set");

        for pair in case["copy_fields"].as_array().into_iter().flatten() {
            let (target_path, source_path) = (pair[0].as_str().unwrap(), pair[1].as_str().unwrap());
            reconcile::copy_field(&mut target, source, target_path, source_path);
        }

        reconcile::copy_extra(&mut target, source, &exclude);

        for member in case["strip"].as_array().into_iter().flatten() {
            reconcile::strip_field(&mut target, member.as_str().unwrap());
        }

        let result = json!({
            "target": target,
            "has_extra": reconcile::has_extra(source, &exclude),
        });

        insta::assert_json_snapshot!(result);
    });
}
