//! Read results of a sibling-producing store.

use std::fmt;

/// Opaque causality token attached to a stored version.
///
/// Only the store that issued a token interprets its contents.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(Vec<u8>);

impl VersionToken {
    /// Wraps store-specific token bytes.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionToken({} bytes)", self.0.len())
    }
}

/// One stored value of a key, with the token it was read under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub value: Vec<u8>,
    pub token: VersionToken,
}

impl Version {
    #[must_use]
    pub fn new(value: Vec<u8>, token: VersionToken) -> Self {
        Self { value, token }
    }
}

/// Everything a read found under one key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Siblings {
    /// Nothing stored.
    #[default]
    Empty,
    /// One converged version.
    Single(Version),
    /// Concurrent writes the store could not order.
    Diverged(Vec<Version>),
}

impl Siblings {
    /// Classifies a list of versions by how many there are.
    #[must_use]
    pub fn from_versions(mut versions: Vec<Version>) -> Self {
        match versions.len() {
            0 => Siblings::Empty,
            1 => versions.pop().map_or(Siblings::Empty, Siblings::Single),
            _ => Siblings::Diverged(versions),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.versions().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Siblings::Empty)
    }

    /// Returns true if the read found more than one version.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        matches!(self, Siblings::Diverged(_))
    }

    /// The versions in the order the store returned them.
    #[must_use]
    pub fn versions(&self) -> &[Version] {
        match self {
            Siblings::Empty => &[],
            Siblings::Single(version) => std::slice::from_ref(version),
            Siblings::Diverged(versions) => versions,
        }
    }

    /// Token a follow-up write should carry: the first version's.
    #[must_use]
    pub fn context(&self) -> Option<&VersionToken> {
        self.versions().first().map(|v| &v.token)
    }

    #[must_use]
    pub fn into_versions(self) -> Vec<Version> {
        match self {
            Siblings::Empty => Vec::new(),
            Siblings::Single(version) => vec![version],
            Siblings::Diverged(versions) => versions,
        }
    }
}
