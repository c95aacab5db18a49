//! backend lifecycle state normalization
//!
//! Compute, volume and image backends each name their lifecycle states differently. These
//! tables map them onto the normalized vocabulary of the API. Unknown states map to [UNKNOWN].
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const UNKNOWN: &str = "UNKNOWN";

static MACHINE_STATES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ACTIVE", "STARTED"),
        ("REBOOT", "STARTING"),
        ("HARD_REBOOT", "STARTING"),
        ("PASSWORD", "UNKNOWN"),
        ("REBUILD", "STARTING"),
        ("MIGRATING", "STARTING"),
        ("RESIZE", "STARTING"),
        ("BUILD", "STARTING"),
        ("SHUTOFF", "STOPPED"),
        ("VERIFY_RESIZE", "STARTING"),
        ("REVERT_RESIZE", "STARTING"),
        ("PAUSED", "PAUSED"),
        ("SUSPENDED", "SUSPENDED"),
        ("RESCUE", "STARTING"),
        ("ERROR", "ERROR"),
        ("DELETED", "DELETING"),
    ])
});

static VOLUME_STATES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("creating", "CREATING"),
        ("available", "AVAILABLE"),
        ("deleting", "DELETING"),
        ("attaching", "ATTACHING"),
        ("detaching", "DETACHING"),
        ("in-use", "INUSE"),
        ("error", "ERROR"),
        ("error_deleting", "ERROR"),
    ])
});

static IMAGE_STATES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("queued", "CREATING"),
        ("saving", "CREATING"),
        ("active", "AVAILABLE"),
        ("killed", "DELETED"),
        ("deleted", "DELETED"),
        ("pending_delete", "DELETING"),
    ])
});

/// Kind of backend resource a state belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Machine,
    Volume,
    Image,
}

impl ResourceKind {
    pub fn map_state(self, state: &str) -> &'static str {
        match self {
            ResourceKind::Machine => map_machine_state(state),
            ResourceKind::Volume => map_volume_state(state),
            ResourceKind::Image => map_image_state(state),
        }
    }
}

pub fn map_machine_state(state: &str) -> &'static str {
    MACHINE_STATES.get(state).copied().unwrap_or(UNKNOWN)
}

pub fn map_volume_state(state: &str) -> &'static str {
    VOLUME_STATES.get(state).copied().unwrap_or(UNKNOWN)
}

/// Case insensitive, unlike the machine and volume lookups
pub fn map_image_state(state: &str) -> &'static str {
    IMAGE_STATES
        .get(state.to_lowercase().as_str())
        .copied()
        .unwrap_or(UNKNOWN)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn machine_states() {
        assert_eq!(map_machine_state("ACTIVE"), "STARTED");
        assert_eq!(map_machine_state("SHUTOFF"), "STOPPED");
        assert_eq!(map_machine_state("DELETED"), "DELETING");
        assert_eq!(map_machine_state("active"), UNKNOWN);
        assert_eq!(map_machine_state("SOMETHING_NEW"), UNKNOWN);
    }

    #[test]
    fn volume_states() {
        assert_eq!(map_volume_state("in-use"), "INUSE");
        assert_eq!(map_volume_state("error_deleting"), "ERROR");
        assert_eq!(map_volume_state("AVAILABLE"), UNKNOWN);
    }

    #[test]
    fn image_states_ignore_case() {
        assert_eq!(map_image_state("active"), "AVAILABLE");
        assert_eq!(map_image_state("ACTIVE"), "AVAILABLE");
        assert_eq!(map_image_state("Pending_Delete"), "DELETING");
        assert_eq!(map_image_state(""), UNKNOWN);
    }

    #[test]
    fn resource_kind_dispatch() {
        assert_eq!(ResourceKind::Machine.map_state("BUILD"), "STARTING");
        assert_eq!(ResourceKind::Volume.map_state("creating"), "CREATING");
        assert_eq!(ResourceKind::Image.map_state("Killed"), "DELETED");
    }
}
