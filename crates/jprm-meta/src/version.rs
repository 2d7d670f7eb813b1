//! Dotted plugin versions.
//!
//! Plugin versions have one to four numeric components
//! (`major.minor.build.revision`). Components that were never set render
//! nowhere in the short form but count as `0` for ordering and for the
//! canonical four-part form used throughout the repository manifest.
//!
//! ```
//! use jprm_meta::version::Version;
//!
//! let v: Version = "1.2".parse().unwrap();
//! assert_eq!(v.to_string(), "1.2");
//! assert_eq!(v.full(), "1.2.0.0");
//! assert_eq!(v, "1.2.0.0".parse().unwrap());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// One of the four version components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    Major,
    Minor,
    Build,
    Revision,
}

impl Component {
    pub const ALL: [Component; 4] = [Self::Major, Self::Minor, Self::Build, Self::Revision];

    /// Position of the component, `0` for major through `3` for revision.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Component at `index`.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::ComponentOutOfRange { index })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Build => "build",
            Self::Revision => "revision",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 1-to-4 part dotted numeric version.
///
/// Equality, hashing and ordering treat unset components as `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Version {
    parts: [Option<u64>; 4],
}

impl Version {
    /// Create a fully specified four-part version.
    pub fn new(major: u64, minor: u64, build: u64, revision: u64) -> Self {
        Self {
            parts: [Some(major), Some(minor), Some(build), Some(revision)],
        }
    }

    /// Parse a dotted version string.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidVersionFormat {
            version: s.to_string(),
        };

        let pieces: Vec<&str> = s.split('.').collect();
        if pieces.len() > 4 {
            return Err(invalid());
        }

        let mut parts = [None; 4];
        for (slot, piece) in parts.iter_mut().zip(&pieces) {
            if piece.is_empty() || !piece.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = Some(piece.parse::<u64>().map_err(|_| invalid())?);
        }

        Ok(Self { parts })
    }

    pub fn major(&self) -> Option<u64> {
        self.parts[0]
    }

    pub fn minor(&self) -> Option<u64> {
        self.parts[1]
    }

    pub fn build(&self) -> Option<u64> {
        self.parts[2]
    }

    pub fn revision(&self) -> Option<u64> {
        self.parts[3]
    }

    pub fn get(&self, component: Component) -> Option<u64> {
        self.parts[component.index()]
    }

    /// Set a component.
    ///
    /// Clearing a component also clears every lower-order component; setting
    /// a value leaves the others alone.
    pub fn set(&mut self, component: Component, value: Option<u64>) {
        let index = component.index();
        self.parts[index] = value;
        if value.is_none() {
            for part in &mut self.parts[index..] {
                *part = None;
            }
        }
    }

    /// Clear a component and everything below it.
    pub fn clear(&mut self, component: Component) {
        self.set(component, None);
    }

    /// Index-based variant of [`Version::get`].
    pub fn get_index(&self, index: usize) -> Result<Option<u64>> {
        Ok(self.get(Component::from_index(index)?))
    }

    /// Index-based variant of [`Version::set`].
    pub fn set_index(&mut self, index: usize, value: Option<u64>) -> Result<()> {
        self.set(Component::from_index(index)?, value);
        Ok(())
    }

    /// All four components, unset ones included.
    pub fn components(&self) -> [Option<u64>; 4] {
        self.parts
    }

    fn normalized(&self) -> [u64; 4] {
        self.parts.map(|p| p.unwrap_or(0))
    }

    /// Render all four components, unset ones as `0`.
    pub fn full(&self) -> String {
        let [major, minor, build, revision] = self.normalized();
        format!("{major}.{minor}.{build}.{revision}")
    }

    /// Render up to and including the last set component.
    pub fn short(&self) -> String {
        let len = self
            .parts
            .iter()
            .rposition(Option::is_some)
            .map_or(1, |i| i + 1);
        self.parts[..len]
            .iter()
            .map(|p| p.unwrap_or(0).to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Normalize a version string to its four-part form.
pub fn normalize(version: &str) -> Result<String> {
    Ok(Version::parse(version)?.full())
}

impl From<u64> for Version {
    fn from(major: u64) -> Self {
        Self {
            parts: [Some(major), None, None, None],
        }
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized().cmp(&other.normalized())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
