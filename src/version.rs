//! OpenGL version and profile identifiers.
//!
//! A [`VersionTag`] names one cascade: a [`Version`] from the fixed 1.0..=4.6
//! set plus a [`Profile`]. The core/compatibility split only exists from 3.1
//! onward; older versions have a single tag that always carries the removed
//! (legacy) entry points.

use std::fmt;
use std::str::FromStr;

use crate::error::LoaderError;

/// An OpenGL API version, ordered by `(major, minor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const V1_0: Version = Version::new(1, 0);
    pub const V1_1: Version = Version::new(1, 1);
    pub const V1_2: Version = Version::new(1, 2);
    pub const V1_3: Version = Version::new(1, 3);
    pub const V1_4: Version = Version::new(1, 4);
    pub const V1_5: Version = Version::new(1, 5);
    pub const V2_0: Version = Version::new(2, 0);
    pub const V2_1: Version = Version::new(2, 1);
    pub const V3_0: Version = Version::new(3, 0);
    pub const V3_1: Version = Version::new(3, 1);
    pub const V3_2: Version = Version::new(3, 2);
    pub const V3_3: Version = Version::new(3, 3);
    pub const V4_0: Version = Version::new(4, 0);
    pub const V4_1: Version = Version::new(4, 1);
    pub const V4_2: Version = Version::new(4, 2);
    pub const V4_3: Version = Version::new(4, 3);
    pub const V4_4: Version = Version::new(4, 4);
    pub const V4_5: Version = Version::new(4, 5);
    pub const V4_6: Version = Version::new(4, 6);

    /// Every supported version, ascending.
    pub const ALL: [Version; 19] = [
        Self::V1_0,
        Self::V1_1,
        Self::V1_2,
        Self::V1_3,
        Self::V1_4,
        Self::V1_5,
        Self::V2_0,
        Self::V2_1,
        Self::V3_0,
        Self::V3_1,
        Self::V3_2,
        Self::V3_3,
        Self::V4_0,
        Self::V4_1,
        Self::V4_2,
        Self::V4_3,
        Self::V4_4,
        Self::V4_5,
        Self::V4_6,
    ];

    /// The highest supported version.
    pub const LATEST: Version = Self::V4_6;

    /// First version with separate core and compatibility profiles.
    pub const PROFILES_SINCE: Version = Self::V3_1;

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether this version is part of the supported set.
    pub fn is_supported(&self) -> bool {
        Self::ALL.contains(self)
    }

    /// Whether this version distinguishes core from compatibility.
    pub fn has_profiles(&self) -> bool {
        *self >= Self::PROFILES_SINCE
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = LoaderError;

    /// Parses `"major.minor"`; the version must be in [`Version::ALL`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || LoaderError::InvalidVersion(s.to_string());

        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        let major = major.parse::<u32>().map_err(|_| invalid())?;
        let minor = minor.parse::<u32>().map_err(|_| invalid())?;

        let version = Version::new(major, minor);
        if !version.is_supported() {
            return Err(LoaderError::UnknownVersion(version.to_string()));
        }
        Ok(version)
    }
}

/// Whether removed legacy entry points are part of a cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Profile {
    /// Only entry points still present in the core profile.
    Core,
    /// Core plus every removed legacy entry point.
    #[default]
    Compatibility,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Core => f.write_str("core"),
            Profile::Compatibility => f.write_str("compatibility"),
        }
    }
}

impl FromStr for Profile {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "core" => Ok(Profile::Core),
            "compat" | "comp" | "compatibility" => Ok(Profile::Compatibility),
            other => Err(LoaderError::InvalidProfile(other.to_string())),
        }
    }
}

/// A cascade selector: a version and the profile to load it with.
///
/// Tags are normalized on construction. Below 3.1 the profile is always
/// [`Profile::Compatibility`], because those contexts predate the removal of
/// any entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTag {
    version: Version,
    profile: Profile,
}

impl VersionTag {
    /// The tag used by the top-level load: 4.6 compatibility.
    pub const MAX: VersionTag = VersionTag {
        version: Version::LATEST,
        profile: Profile::Compatibility,
    };

    /// Build a tag, normalizing the profile for pre-3.1 versions.
    pub fn new(version: Version, profile: Profile) -> Result<Self, LoaderError> {
        if !version.is_supported() {
            return Err(LoaderError::UnknownVersion(version.to_string()));
        }
        Ok(Self::normalized(version, profile))
    }

    /// Core profile tag (compatibility below 3.1).
    pub fn core(version: Version) -> Result<Self, LoaderError> {
        Self::new(version, Profile::Core)
    }

    /// Compatibility profile tag.
    pub fn compatibility(version: Version) -> Result<Self, LoaderError> {
        Self::new(version, Profile::Compatibility)
    }

    fn normalized(version: Version, profile: Profile) -> Self {
        let profile = if version.has_profiles() {
            profile
        } else {
            Profile::Compatibility
        };
        Self { version, profile }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Whether removed modules take part in this cascade.
    pub fn includes_removed(&self) -> bool {
        self.profile == Profile::Compatibility
    }

    /// Entry point style name, e.g. `gl_3_3`, `gl_4_6_comp`, `gl_2_1`.
    pub fn entry_name(&self) -> String {
        let base = format!("gl_{}_{}", self.version.major, self.version.minor);
        if self.version.has_profiles() && self.profile == Profile::Compatibility {
            format!("{base}_comp")
        } else {
            base
        }
    }

    /// Every distinct tag in cascade order: one per version below 3.1, then
    /// core followed by compatibility for each later version.
    pub fn all() -> Vec<VersionTag> {
        let mut tags = Vec::with_capacity(29);
        for version in Version::ALL {
            if version.has_profiles() {
                tags.push(Self::normalized(version, Profile::Core));
            }
            tags.push(Self::normalized(version, Profile::Compatibility));
        }
        tags
    }
}

impl Default for VersionTag {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.has_profiles() {
            write!(f, "{} {}", self.version, self.profile)
        } else {
            write!(f, "{}", self.version)
        }
    }
}

impl FromStr for VersionTag {
    type Err = LoaderError;

    /// Accepts `"4.6"`, `"4.6-compat"`, `"4.6 compatibility"`, `"3.3-core"`.
    /// A bare version means core where profiles exist.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (version, profile) = match s.split_once(|c: char| c == '-' || c.is_whitespace()) {
            Some((version, profile)) => (version, profile.parse::<Profile>()?),
            None => (s, Profile::Core),
        };
        VersionTag::new(version.parse()?, profile)
    }
}
