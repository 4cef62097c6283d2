use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::MenuNode;

/// Nested payload handed to the persistence layer on save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSubmission {
    pub name: String,
    pub items: Vec<SubmissionItem>,
}

/// One submitted item. `id: None` asks the server to create the record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionItem {
    pub id: Option<u64>,
    pub title: String,
    pub url: String,
    pub order: usize,
    pub children: Vec<SubmissionItem>,
}

impl MenuSubmission {
    /// Builds the payload from a tree; temporary ids are replaced by `None`.
    pub fn from_tree(name: impl Into<String>, tree: &[MenuNode]) -> Self {
        Self {
            name: name.into(),
            items: items_of(tree),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn items_of(nodes: &[MenuNode]) -> Vec<SubmissionItem> {
    nodes
        .iter()
        .enumerate()
        .map(|(order, node)| SubmissionItem {
            id: node.id.saved(),
            title: node.title.clone(),
            url: node.url.clone(),
            order,
            children: items_of(&node.children),
        })
        .collect()
}
