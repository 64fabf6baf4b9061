//! Tri-state field values for partial updates.
//!
//! A request field is either [`Patch::Unset`] (leave the stored value alone)
//! or [`Patch::Set`] carrying the raw input, which may be blank. What a blank
//! value means is decided per field by the mutator.
//!
//! On the wire, an absent key and an explicit JSON `null` both deserialize to
//! `Unset`; annotate request fields with `#[serde(default)]`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Unset,
    Set(T),
}

impl<T> Patch<T> {
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    #[must_use]
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unset => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Set(value) => Patch::Set(f(value)),
            Self::Unset => Patch::Unset,
        }
    }
}

impl Patch<String> {
    /// Borrow the raw input as `&str`.
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.as_set().map(String::as_str)
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Set)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(value) => serializer.serialize_some(value),
            Self::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}
