pub use crate::{
    ColumnWidth, DynamicPage, FlatMenuItem, ItemId, LinkTargets, MenuAction, MenuColumns,
    MenuEvent, MenuField, MenuGlyphs, MenuNode, MenuRecord, MenuRowContext, MenuSubmission,
    MenuTreeConfig, MenuTreeError, MenuTreeState, MenuTreeStyle, MenuTreeView, Projection,
    build_tree, flatten_tree, get_projection,
};

#[cfg(feature = "keymap")]
pub use crate::{KeymapProfile, MenuKeyBindings};
