//! The version cascade table.
//!
//! Every OpenGL version contributes one module of entry points, plus a
//! "removed" module for versions whose entry points were later dropped from
//! the core profile. A cascade for a [`VersionTag`] is the prefix of
//! [`MODULES`] up to and including that version, skipping removed modules
//! for core profiles.

use std::fmt;

use crate::version::{Version, VersionTag};

/// One group of entry points: those introduced by `version`, split into the
/// part still in core and the part later removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId {
    pub version: Version,
    pub removed: bool,
}

impl ModuleId {
    pub const fn core(version: Version) -> Self {
        Self {
            version,
            removed: false,
        }
    }

    pub const fn removed(version: Version) -> Self {
        Self {
            version,
            removed: true,
        }
    }

    /// Module symbol name, e.g. `mod_gl_1_3` or `mod_gl_1_3_rem`.
    pub fn name(&self) -> String {
        let base = format!("mod_gl_{}_{}", self.version.major, self.version.minor);
        if self.removed {
            format!("{base}_rem")
        } else {
            base
        }
    }

    /// Whether this module appears in [`MODULES`].
    pub fn is_known(&self) -> bool {
        MODULES.contains(self)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// All modules in load order.
pub const MODULES: [ModuleId; 23] = [
    ModuleId::core(Version::V1_0),
    ModuleId::removed(Version::V1_0),
    ModuleId::core(Version::V1_1),
    ModuleId::removed(Version::V1_1),
    ModuleId::core(Version::V1_2),
    ModuleId::core(Version::V1_3),
    ModuleId::removed(Version::V1_3),
    ModuleId::core(Version::V1_4),
    ModuleId::removed(Version::V1_4),
    ModuleId::core(Version::V1_5),
    ModuleId::core(Version::V2_0),
    ModuleId::core(Version::V2_1),
    ModuleId::core(Version::V3_0),
    ModuleId::core(Version::V3_1),
    ModuleId::core(Version::V3_2),
    ModuleId::core(Version::V3_3),
    ModuleId::core(Version::V4_0),
    ModuleId::core(Version::V4_1),
    ModuleId::core(Version::V4_2),
    ModuleId::core(Version::V4_3),
    ModuleId::core(Version::V4_4),
    ModuleId::core(Version::V4_5),
    ModuleId::core(Version::V4_6),
];

/// Modules invoked for `tag`, in load order.
pub fn cascade(tag: VersionTag) -> impl Iterator<Item = ModuleId> + Clone {
    let max = tag.version();
    let with_removed = tag.includes_removed();
    MODULES
        .into_iter()
        .take_while(move |m| m.version <= max)
        .filter(move |m| with_removed || !m.removed)
}

/// Number of modules in the cascade for `tag`.
pub fn cascade_len(tag: VersionTag) -> usize {
    cascade(tag).count()
}
