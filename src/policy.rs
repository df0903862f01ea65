//! Policy switches governing field presence and map handling.

use serde::{Deserialize, Serialize};

/// Behavior switches for one merge call. Read-only for the duration of the
/// call; all switches default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePolicy {
    /// Treat a `false` origin boolean as present and copy it. Off, `false`
    /// means absent, mirroring the zero-value rule of the other scalars.
    #[serde(default)]
    pub allow_false_booleans: bool,

    /// Copy a field only while the destination field is still zero. Off,
    /// a non-zero origin overwrites whatever the destination holds.
    #[serde(default)]
    pub skip_if_destination_nonzero: bool,

    /// Replace map fields wholesale with the origin's map instead of merging
    /// key-by-key.
    #[serde(default)]
    pub replace_maps_wholesale: bool,
}

impl MergePolicy {
    /// Policy with every switch off.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_false_booleans(mut self, on: bool) -> Self {
        self.allow_false_booleans = on;
        self
    }

    pub fn with_skip_if_destination_nonzero(mut self, on: bool) -> Self {
        self.skip_if_destination_nonzero = on;
        self
    }

    pub fn with_replace_maps_wholesale(mut self, on: bool) -> Self {
        self.replace_maps_wholesale = on;
        self
    }
}
