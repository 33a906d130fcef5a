//! Control attribute names that user fields may never shadow

use std::collections::BTreeSet;
use std::fmt;

/// Control attributes owned by the checkpoint manager itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlField {
    SavePath,
    AutosaveEnabled,
    AutosavePeriod,
    /// Write-in-progress indicator
    Writing,
    /// Handle of the background autosave task
    TaskHandle,
}

impl ControlField {
    pub const ALL: [ControlField; 5] = [
        ControlField::SavePath,
        ControlField::AutosaveEnabled,
        ControlField::AutosavePeriod,
        ControlField::Writing,
        ControlField::TaskHandle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ControlField::SavePath => "save_path",
            ControlField::AutosaveEnabled => "autosave_enabled",
            ControlField::AutosavePeriod => "autosave_period",
            ControlField::Writing => "writing",
            ControlField::TaskHandle => "task_handle",
        }
    }
}

impl fmt::Display for ControlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Frozen set of reserved field names.
///
/// Built once from [`ControlField::ALL`]; there is no way to add or remove
/// names after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedNames {
    names: BTreeSet<&'static str>,
}

impl ReservedNames {
    pub fn from_control_fields() -> Self {
        Self {
            names: ControlField::ALL.iter().map(|field| field.name()).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ReservedNames {
    fn default() -> Self {
        Self::from_control_fields()
    }
}
