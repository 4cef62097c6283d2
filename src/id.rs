use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::MenuTreeError;

const TEMP_PREFIX: &str = "tmp-";

static NEXT_TEMP: AtomicU64 = AtomicU64::new(1);

/// Identifier of a menu item.
///
/// Items loaded from the server carry a [`ItemId::Saved`] id. Items created in the editor
/// get a [`ItemId::Temp`] id until the persistence layer assigns a real one; temporary ids
/// never cross the submission boundary (they become `null` there).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemId {
    Saved(u64),
    Temp(u64),
}

impl ItemId {
    /// Returns a fresh temporary id, unique within the process.
    pub fn temporary() -> Self {
        Self::Temp(NEXT_TEMP.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn is_temporary(self) -> bool {
        matches!(self, Self::Temp(_))
    }

    /// Returns the persisted id, or `None` for a temporary one.
    #[inline]
    pub const fn saved(self) -> Option<u64> {
        match self {
            Self::Saved(id) => Some(id),
            Self::Temp(_) => None,
        }
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self::Saved(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved(id) => write!(f, "{id}"),
            Self::Temp(id) => write!(f, "{TEMP_PREFIX}{id}"),
        }
    }
}

impl FromStr for ItemId {
    type Err = MenuTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MenuTreeError::InvalidId(s.to_string());
        if let Some(rest) = s.strip_prefix(TEMP_PREFIX) {
            return rest.parse().map(Self::Temp).map_err(|_| invalid());
        }
        s.parse().map(Self::Saved).map_err(|_| invalid())
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Saved(id) => serializer.serialize_u64(*id),
            Self::Temp(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = ItemId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer id or a `tmp-<n>` string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ItemId, E> {
                Ok(ItemId::Saved(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ItemId, E> {
                u64::try_from(v)
                    .map(ItemId::Saved)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ItemId, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_ids_are_unique_and_marked() {
        let a = ItemId::temporary();
        let b = ItemId::temporary();
        assert_ne!(a, b);
        assert!(a.is_temporary());
        assert_eq!(a.saved(), None);
        assert!(a.to_string().starts_with("tmp-"));
    }

    #[test]
    fn parses_both_shapes() {
        assert_eq!("42".parse::<ItemId>().unwrap(), ItemId::Saved(42));
        assert_eq!("tmp-7".parse::<ItemId>().unwrap(), ItemId::Temp(7));
        assert!("tmp-x".parse::<ItemId>().is_err());
        assert!("abc".parse::<ItemId>().is_err());
    }

    #[test]
    fn json_shape() {
        assert_eq!(serde_json::to_string(&ItemId::Saved(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&ItemId::Temp(9)).unwrap(), "\"tmp-9\"");
        let id: ItemId = serde_json::from_str("\"tmp-9\"").unwrap();
        assert_eq!(id, ItemId::Temp(9));
        let id: ItemId = serde_json::from_str("5").unwrap();
        assert_eq!(id, ItemId::Saved(5));
    }
}
