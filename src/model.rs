use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::id::ItemId;

/// Menu item in flat form: explicit parent reference and sibling order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatMenuItem {
    pub id: ItemId,
    pub parent_id: Option<ItemId>,
    pub title: String,
    pub url: String,
    /// Position among items sharing `parent_id`.
    pub order: usize,
    /// Nesting level carried from the tree; not authoritative.
    #[serde(default)]
    pub depth: usize,
}

impl FlatMenuItem {
    /// Creates an item with empty title/url at depth 0.
    pub fn new(id: ItemId, parent_id: Option<ItemId>, order: usize) -> Self {
        Self {
            id,
            parent_id,
            title: String::new(),
            url: String::new(),
            order,
            depth: 0,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub(crate) fn set_field(&mut self, field: MenuField, value: String) {
        match field {
            MenuField::Title => self.title = value,
            MenuField::Url => self.url = value,
        }
    }
}

/// Menu item in tree form. `depth` is recomputed on every normalize pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub id: ItemId,
    pub title: String,
    pub url: String,
    pub depth: usize,
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// Creates an empty root-level node with a fresh temporary id.
    pub fn blank() -> Self {
        Self {
            id: ItemId::temporary(),
            title: String::new(),
            url: String::new(),
            depth: 0,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}

/// Editable text fields of a menu item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuField {
    Title,
    Url,
}

/// Menu item as delivered by the server on load.
///
/// Every field is optional except the texts; a missing id marks an item the server has not
/// persisted yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuRecord {
    pub id: Option<u64>,
    pub parent_id: Option<u64>,
    pub order: Option<i64>,
    pub title: String,
    pub url: String,
}

impl MenuRecord {
    /// Parses a JSON array of records.
    pub fn parse_list(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts into a flat item, generating a temporary id when none is present.
    pub fn into_flat(self) -> FlatMenuItem {
        let order = self
            .order
            .and_then(|order| usize::try_from(order).ok())
            .unwrap_or(0);
        FlatMenuItem {
            id: self.id.map_or_else(ItemId::temporary, ItemId::Saved),
            parent_id: self.parent_id.map(ItemId::Saved),
            title: self.title,
            url: self.url,
            order,
            depth: 0,
        }
    }
}

/// Internal page a menu item may link to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicPage {
    pub slug: String,
    pub title: String,
}

impl DynamicPage {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
        }
    }

    /// Parses a JSON array of pages.
    pub fn parse_list(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}
