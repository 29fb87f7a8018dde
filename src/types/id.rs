// ABOUTME: Identifiers for the runtime objects a listing refers to.
// ABOUTME: Containers, pods, and images each get their own ID type over one string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

pub enum ContainerMarker {}
pub enum PodMarker {}
pub enum ImageMarker {}

/// A runtime-assigned ID, tagged with the kind of object it names.
///
/// Records carry a container ID, an optional pod ID, and a root image ID side
/// by side; the tag keeps a query from deduplicating containers by pod or matching
/// an ancestor filter against a container. Listings show [`short`](Self::short)
/// unless full IDs were asked for. On the wire every kind is a plain string.
///
/// ```compile_fail
/// use ctrscope::types::{ContainerId, PodId};
///
/// fn takes_container(_: &ContainerId) {}
/// takes_container(&PodId::new("pod"));
/// ```
///
/// ```compile_fail
/// use ctrscope::types::{ImageId, PodId};
///
/// let pod: PodId = ImageId::new("sha256:abc");
/// ```
pub struct Id<T> {
    value: String,
    _kind: PhantomData<T>,
}

pub type ContainerId = Id<ContainerMarker>;
pub type PodId = Id<PodMarker>;
pub type ImageId = Id<ImageMarker>;

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _kind: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// At most `len` leading characters, never splitting a character.
    pub fn short(&self, len: usize) -> &str {
        self.value
            .char_indices()
            .nth(len)
            .map_or(self.value.as_str(), |(end, _)| &self.value[..end])
    }
}

// Derives would demand the same traits of the marker, which is uninhabited.

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_truncates_long_ids() {
        let id = ContainerId::new("0123456789abcdef0123");
        assert_eq!(id.short(12), "0123456789ab");
    }

    #[test]
    fn short_keeps_ids_under_the_limit() {
        let id = PodId::new("abc");
        assert_eq!(id.short(12), "abc");
    }

    #[test]
    fn short_counts_characters_not_bytes() {
        let id = ContainerId::new("ééééé");
        assert_eq!(id.short(3), "ééé");
    }

    #[test]
    fn debug_shows_only_the_value() {
        assert_eq!(format!("{:?}", PodId::new("p1")), "\"p1\"");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ImageId::new("sha256:feed");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sha256:feed\"");
    }
}
