//! Drag-and-drop nested menu editor for ratatui.
//!
//! A menu is kept as a nested tree ([`MenuNode`]) and flattened on demand into a display list
//! ([`FlatMenuItem`]) for row-based dragging. While a row is dragged, [`get_projection`]
//! derives the depth and parent it would take from the horizontal drag offset;
//! [`MenuTreeState`] commits drops, edits and removals, and [`MenuTreeView`] renders the rows.
//!
//! Feature flags:
//! - `keymap` (default): crossterm-based key bindings and `MenuTreeState::handle_key*` helpers.

mod action;
mod columns;
mod config;
mod context;
mod destinations;
mod error;
mod glyphs;
mod id;
#[cfg(feature = "keymap")]
mod keymap;
mod model;
mod normalize;
pub mod prelude;
mod projection;
mod state;
mod style;
mod submission;
mod widget;

pub use action::{MenuAction, MenuEvent};
pub use columns::{ColumnWidth, MenuColumns, distribute_widths};
pub use config::MenuTreeConfig;
pub use context::MenuRowContext;
pub use destinations::{LinkTarget, LinkTargets};
pub use error::{MenuTreeError, Result};
pub use glyphs::{MenuGlyphs, menu_title_cell, menu_title_line};
pub use id::ItemId;
#[cfg(feature = "keymap")]
pub use keymap::{KeymapProfile, MenuKeyBindings};
pub use model::{DynamicPage, FlatMenuItem, MenuField, MenuNode, MenuRecord};
pub use normalize::{
    build_tree, build_tree_from_records, descendants_of, find_node, flatten_tree,
    renumber_siblings,
};
pub use projection::{Projection, drag_depth, get_projection};
pub use state::{ChangeListener, MenuRow, MenuTreeState};
pub use style::MenuTreeStyle;
pub use submission::{MenuSubmission, SubmissionItem};
pub use widget::MenuTreeView;
