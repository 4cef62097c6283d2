use ratatui::widgets::TableState;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::action::{MenuAction, MenuEvent};
use crate::config::MenuTreeConfig;
use crate::destinations::LinkTargets;
use crate::id::ItemId;
use crate::model::{FlatMenuItem, MenuField, MenuNode, MenuRecord};
use crate::normalize::{build_tree, descendants_of, flatten_tree, renumber_siblings};
use crate::projection::{Projection, get_projection};
use crate::submission::MenuSubmission;

#[cfg(feature = "keymap")]
use crate::keymap::MenuKeyBindings;
#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

/// Callback receiving the committed tree after every change.
pub type ChangeListener = Box<dyn FnMut(&[MenuNode])>;

/// A displayed row with metadata used for rendering.
#[derive(Clone, Debug)]
pub struct MenuRow<'a> {
    pub(crate) item: &'a FlatMenuItem,
    pub(crate) depth: usize,
    pub(crate) is_active: bool,
    pub(crate) is_tail_stack: SmallVec<[bool; 8]>,
}

impl<'a> MenuRow<'a> {
    pub const fn item(&self) -> &'a FlatMenuItem {
        self.item
    }

    /// Depth to draw: the projected depth for the dragged row, the committed one otherwise.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    pub const fn is_active(&self) -> bool {
        self.is_active
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragState {
    active: ItemId,
    over: ItemId,
    offset_x: f32,
}

/// Editor state: the menu tree, the in-progress drag and the row selection.
///
/// The nested tree is the single source of truth. The flat list is recomputed from it on
/// every commit and is only ever read.
pub struct MenuTreeState {
    tree: Vec<MenuNode>,
    flat: Vec<FlatMenuItem>,
    drag: Option<DragState>,
    list_state: TableState,
    config: MenuTreeConfig,
    on_change: Option<ChangeListener>,
    #[cfg(feature = "keymap")]
    keymap: MenuKeyBindings,
}

impl Default for MenuTreeState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MenuTreeState {
    /// Creates a state over the given tree with default settings.
    pub fn new(tree: Vec<MenuNode>) -> Self {
        Self::with_config(tree, MenuTreeConfig::default())
    }

    /// Creates a state over the given tree. Depths are recomputed from tree position.
    pub fn with_config(tree: Vec<MenuNode>, config: MenuTreeConfig) -> Self {
        let tree = build_tree(flatten_tree(&tree));
        let flat = flatten_tree(&tree);
        Self {
            tree,
            flat,
            drag: None,
            list_state: TableState::default(),
            config,
            on_change: None,
            #[cfg(feature = "keymap")]
            keymap: MenuKeyBindings::with_profile(config.keymap_profile),
        }
    }

    /// Creates a state from the flat records the server delivers on load.
    pub fn from_records<I>(records: I, config: MenuTreeConfig) -> Self
    where
        I: IntoIterator<Item = MenuRecord>,
    {
        let tree = build_tree(records.into_iter().map(MenuRecord::into_flat));
        Self::with_config(tree, config)
    }

    /// Registers the callback notified after every committed change.
    pub fn set_on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&[MenuNode]) + 'static,
    {
        self.on_change = Some(Box::new(listener));
    }

    #[cfg(feature = "keymap")]
    /// Returns a mutable reference to the key binding set.
    pub const fn keymap_mut(&mut self) -> &mut MenuKeyBindings {
        &mut self.keymap
    }

    pub const fn config(&self) -> &MenuTreeConfig {
        &self.config
    }

    /// The committed tree.
    pub fn tree(&self) -> &[MenuNode] {
        &self.tree
    }

    /// The committed tree in flat, pre-order form.
    pub fn flattened(&self) -> &[FlatMenuItem] {
        &self.flat
    }

    /// Ids in display order, as used to key sortable rows.
    pub fn ids(&self) -> Vec<ItemId> {
        self.flat.iter().map(|item| item.id).collect()
    }

    pub const fn len(&self) -> usize {
        self.flat.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.flat.iter().position(|item| item.id == id)
    }

    /// Builds the save payload for the committed tree.
    pub fn submission(&self, name: impl Into<String>) -> MenuSubmission {
        MenuSubmission::from_tree(name, &self.tree)
    }

    /// Returns whether connector lines are drawn.
    #[inline]
    pub const fn draw_lines(&self) -> bool {
        self.config.draw_lines
    }

    /// Enables or disables drawing of connector lines.
    pub const fn set_draw_lines(&mut self, draw: bool) {
        self.config.draw_lines = draw;
    }

    pub(crate) const fn list_state(&self) -> &TableState {
        &self.list_state
    }

    pub(crate) const fn list_state_mut(&mut self) -> &mut TableState {
        &mut self.list_state
    }

    fn commit(&mut self, tree: Vec<MenuNode>, op: &'static str) {
        self.tree = tree;
        self.flat = flatten_tree(&self.tree);
        self.clamp_selection();
        debug!(op, items = self.flat.len(), "menu tree committed");
        if let Some(listener) = self.on_change.as_mut() {
            listener(&self.tree);
        }
    }

    // ---- drag ----

    /// Id of the row being dragged.
    pub fn active_id(&self) -> Option<ItemId> {
        self.drag.map(|drag| drag.active)
    }

    /// Id of the row currently under the pointer.
    pub fn over_id(&self) -> Option<ItemId> {
        self.drag.map(|drag| drag.over)
    }

    /// Horizontal offset accumulated since the drag started.
    pub fn drag_offset(&self) -> f32 {
        self.drag.map_or(0.0, |drag| drag.offset_x)
    }

    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Starts dragging `id`; resets the horizontal offset.
    pub fn begin_drag(&mut self, id: ItemId) -> bool {
        let Some(idx) = self.position(id) else {
            trace!(id = %id, "drag start on unknown item");
            return false;
        };
        self.drag = Some(DragState {
            active: id,
            over: id,
            offset_x: 0.0,
        });
        self.list_state.select(Some(idx));
        true
    }

    /// Adds `delta_x` to the horizontal drag offset. Nothing is committed.
    pub fn drag_move(&mut self, delta_x: f32) {
        if let Some(drag) = self.drag.as_mut() {
            drag.offset_x += delta_x;
            trace!(offset_x = drag.offset_x, "drag moved");
        }
    }

    /// Records the row under the pointer. Rows inside the dragged subtree are rejected.
    pub fn drag_over(&mut self, over: ItemId) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let candidates = self.drag_candidates(drag.active);
        let Some(idx) = candidates.iter().position(|item| item.id == over) else {
            return false;
        };
        self.drag = Some(DragState { over, ..drag });
        self.list_state.select(Some(idx));
        true
    }

    /// Live projection for the drag in progress.
    pub fn projection(&self) -> Option<Projection> {
        let drag = self.drag?;
        let candidates = self.drag_candidates(drag.active);
        get_projection(
            &candidates,
            drag.active,
            drag.over,
            drag.offset_x,
            self.config.indent_width,
        )
    }

    /// Abandons the drag in progress.
    pub fn cancel_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        if let Some(idx) = self.position(drag.active) {
            self.list_state.select(Some(idx));
        }
        true
    }

    /// Drops the dragged row at the row currently under the pointer.
    pub fn drop_drag(&mut self) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        self.end_drag(drag.active, Some(drag.over))
    }

    /// Commits a drop of `active_id` over `over_id`.
    ///
    /// A missing or unknown target, or a target inside the dragged subtree, leaves the tree
    /// unchanged. The drag is reset to idle in every case.
    pub fn end_drag(&mut self, active_id: ItemId, over_id: Option<ItemId>) -> bool {
        let offset_x = self
            .drag
            .take()
            .filter(|drag| drag.active == active_id)
            .map_or(0.0, |drag| drag.offset_x);

        let Some(over_id) = over_id else {
            debug!(active = %active_id, "drop without target ignored");
            return false;
        };
        let (Some(active_idx), Some(over_idx)) = (self.position(active_id), self.position(over_id))
        else {
            debug!(active = %active_id, over = %over_id, "drop on unknown item ignored");
            return false;
        };
        let subtree = descendants_of(&self.flat, active_id);
        if over_id != active_id && subtree.contains(&over_id) {
            debug!(active = %active_id, over = %over_id, "drop inside dragged subtree ignored");
            return false;
        }

        let candidates = self.drag_candidates(active_id);
        let Some(projection) = get_projection(
            &candidates,
            active_id,
            over_id,
            offset_x,
            self.config.indent_width,
        ) else {
            return false;
        };

        let mut items = self.flat.clone();
        items[active_idx].parent_id = projection.parent_id;
        items[active_idx].depth = projection.depth;
        let moved = items.remove(active_idx);
        items.insert(over_idx, moved);
        renumber_siblings(&mut items);

        self.commit(build_tree(items), "drop");
        self.select_by_id(active_id);
        true
    }

    // The dragged row plus every row outside its subtree, in display order.
    fn drag_candidates(&self, active: ItemId) -> Vec<FlatMenuItem> {
        let subtree = descendants_of(&self.flat, active);
        self.flat
            .iter()
            .filter(|item| item.id == active || !subtree.contains(&item.id))
            .cloned()
            .collect()
    }

    fn step_over(&mut self, delta: isize) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let candidates = self.drag_candidates(drag.active);
        let Some(idx) = candidates.iter().position(|item| item.id == drag.over) else {
            return false;
        };
        let last = candidates.len().saturating_sub(1);
        let next = idx.saturating_add_signed(delta).min(last);
        self.drag_over(candidates[next].id)
    }

    // ---- edits ----

    /// Replaces one text field of an item.
    pub fn update_field(&mut self, id: ItemId, field: MenuField, value: impl Into<String>) -> bool {
        let value = value.into();
        let mut items = self.flat.clone();
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            trace!(id = %id, "update of unknown item ignored");
            return false;
        };
        let current = match field {
            MenuField::Title => &item.title,
            MenuField::Url => &item.url,
        };
        if *current == value {
            return false;
        }
        item.set_field(field, value);
        self.commit(build_tree(items), "update");
        true
    }

    /// Removes an item together with all of its descendants.
    pub fn remove(&mut self, id: ItemId) -> bool {
        if !self.contains(id) {
            trace!(id = %id, "removal of unknown item ignored");
            return false;
        }
        let doomed = descendants_of(&self.flat, id);
        if let Some(active) = self.active_id()
            && doomed.contains(&active)
        {
            self.drag = None;
        }
        let items: Vec<FlatMenuItem> = self
            .flat
            .iter()
            .filter(|item| !doomed.contains(&item.id))
            .cloned()
            .collect();
        self.commit(build_tree(items), "remove");
        true
    }

    /// Appends an empty root-level item and returns its temporary id.
    pub fn add_item(&mut self) -> ItemId {
        let node = MenuNode::blank();
        let id = node.id;
        let mut tree = self.tree.clone();
        tree.push(node);
        self.commit(tree, "add");
        id
    }

    // ---- rows & selection ----

    /// Rows to display, in order.
    ///
    /// While dragging, the dragged row is shown at the drop position with its projected
    /// depth and its descendants are hidden.
    pub fn rows(&self) -> Vec<MenuRow<'_>> {
        let (ordered, active): (Vec<(&FlatMenuItem, usize)>, Option<ItemId>) = match self.drag {
            None => (
                self.flat.iter().map(|item| (item, item.depth)).collect(),
                None,
            ),
            Some(drag) => {
                let subtree = descendants_of(&self.flat, drag.active);
                let mut items: Vec<&FlatMenuItem> = self
                    .flat
                    .iter()
                    .filter(|item| item.id == drag.active || !subtree.contains(&item.id))
                    .collect();
                let from = items.iter().position(|item| item.id == drag.active);
                let to = items.iter().position(|item| item.id == drag.over);
                if let (Some(from), Some(to)) = (from, to) {
                    let moved = items.remove(from);
                    items.insert(to, moved);
                }
                let live_depth = self.projection().map(|projection| projection.depth);
                let ordered = items
                    .into_iter()
                    .map(|item| {
                        let depth = if item.id == drag.active {
                            live_depth.unwrap_or(item.depth)
                        } else {
                            item.depth
                        };
                        (item, depth)
                    })
                    .collect();
                (ordered, Some(drag.active))
            }
        };

        let depths: Vec<usize> = ordered.iter().map(|(_, depth)| *depth).collect();
        ordered
            .into_iter()
            .zip(tail_stacks(&depths))
            .map(|((item, depth), is_tail_stack)| MenuRow {
                item,
                depth,
                is_active: active == Some(item.id),
                is_tail_stack,
            })
            .collect()
    }

    /// Id under the pointer `row` lines below the top of the viewport.
    ///
    /// While dragging, rows are hit-tested in their order before the live move, so the
    /// returned id is the drop target that places the dragged row at `row`.
    pub fn id_at_viewport_row(&self, row: usize) -> Option<ItemId> {
        let idx = self.list_state.offset().checked_add(row)?;
        match self.drag {
            None => self.flat.get(idx).map(|item| item.id),
            Some(drag) => self
                .drag_candidates(drag.active)
                .get(idx)
                .map(|item| item.id),
        }
    }

    fn row_count(&self) -> usize {
        match self.drag {
            None => self.flat.len(),
            Some(drag) => {
                let hidden = descendants_of(&self.flat, drag.active).len().saturating_sub(1);
                self.flat.len().saturating_sub(hidden)
            }
        }
    }

    /// Returns the id of the selected row; the dragged row while a drag is in progress.
    pub fn selected_id(&self) -> Option<ItemId> {
        if let Some(drag) = self.drag {
            return Some(drag.active);
        }
        self.list_state
            .selected()
            .and_then(|idx| self.flat.get(idx).map(|item| item.id))
    }

    /// Selects the row of `id` if present.
    pub fn select_by_id(&mut self, id: ItemId) -> bool {
        if let Some(idx) = self.position(id) {
            self.list_state.select(Some(idx));
            true
        } else {
            false
        }
    }

    /// Selects the first row.
    pub const fn select_first(&mut self) {
        self.list_state.select_first();
    }

    /// Selects the last row.
    pub const fn select_last(&mut self) {
        self.list_state.select_last();
    }

    /// Moves selection to the previous row.
    pub fn select_prev(&mut self) {
        if self.flat.is_empty() {
            self.list_state.select(None);
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some(selected.saturating_sub(1)));
    }

    /// Moves selection to the next row.
    pub fn select_next(&mut self) {
        if self.flat.is_empty() {
            self.list_state.select(None);
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        let new_selected = (selected + 1).min(self.flat.len().saturating_sub(1));
        self.list_state.select(Some(new_selected));
    }

    /// Adjusts scroll offset so the selection is within the viewport.
    pub fn ensure_selection_visible(&mut self, viewport_height: usize) {
        self.clamp_selection();
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let offset = self.list_state.offset();
        if selected < offset {
            *self.list_state.offset_mut() = selected;
        } else if selected >= offset + viewport_height {
            *self.list_state.offset_mut() = selected + 1 - viewport_height;
        }
    }

    fn clamp_selection(&mut self) {
        let rows = self.row_count();
        if rows == 0 {
            self.list_state.select(None);
            return;
        }

        if let Some(selected) = self.list_state.selected()
            && selected >= rows
        {
            self.list_state.select(Some(rows - 1));
        }
    }

    // ---- actions ----

    /// Handles an action and returns the resulting event.
    ///
    /// `targets` is the read-only list of destinations the URL actions cycle through.
    pub fn handle_action<C>(
        &mut self,
        action: MenuAction<C>,
        targets: &LinkTargets,
    ) -> MenuEvent<C> {
        match action {
            MenuAction::Custom(_) | MenuAction::EditTitle | MenuAction::Save => {
                return MenuEvent::Action(action);
            }
            MenuAction::AddItem => {
                if self.is_dragging() {
                    return MenuEvent::Unhandled;
                }
                let id = self.add_item();
                self.select_by_id(id);
                return MenuEvent::Changed;
            }
            MenuAction::ToggleGuides => {
                self.config.draw_lines = !self.config.draw_lines;
                return MenuEvent::Handled;
            }
            _ => {}
        }

        if self.flat.is_empty() {
            return MenuEvent::Unhandled;
        }

        let step = self.config.indent_width;
        match action {
            MenuAction::MoveUp => {
                if self.is_dragging() {
                    self.step_over(-1);
                } else {
                    self.select_prev();
                }
                MenuEvent::Handled
            }
            MenuAction::MoveDown => {
                if self.is_dragging() {
                    self.step_over(1);
                } else {
                    self.select_next();
                }
                MenuEvent::Handled
            }
            MenuAction::SelectFirst if !self.is_dragging() => {
                self.select_first();
                MenuEvent::Handled
            }
            MenuAction::SelectLast if !self.is_dragging() => {
                self.select_last();
                MenuEvent::Handled
            }
            MenuAction::ToggleDrag => {
                if self.is_dragging() {
                    changed(self.drop_drag())
                } else if let Some(id) = self.selected_id() {
                    self.begin_drag(id);
                    MenuEvent::Handled
                } else {
                    MenuEvent::Unhandled
                }
            }
            MenuAction::CancelDrag => {
                if self.cancel_drag() {
                    MenuEvent::Handled
                } else {
                    MenuEvent::Unhandled
                }
            }
            MenuAction::Indent | MenuAction::Outdent => {
                let delta = if matches!(action, MenuAction::Indent) {
                    step
                } else {
                    -step
                };
                if self.is_dragging() {
                    self.drag_move(delta);
                    return MenuEvent::Handled;
                }
                let Some(id) = self.selected_id() else {
                    return MenuEvent::Unhandled;
                };
                self.begin_drag(id);
                self.drag_move(delta);
                changed(self.drop_drag())
            }
            MenuAction::RemoveItem if !self.is_dragging() => self
                .selected_id()
                .map_or(MenuEvent::Unhandled, |id| changed(self.remove(id))),
            MenuAction::NextUrl | MenuAction::PrevUrl if !self.is_dragging() => {
                let Some(id) = self.selected_id() else {
                    return MenuEvent::Unhandled;
                };
                let Some(current) = self.position(id).map(|idx| self.flat[idx].url.as_str())
                else {
                    return MenuEvent::Unhandled;
                };
                let target = if matches!(action, MenuAction::NextUrl) {
                    targets.next(current)
                } else {
                    targets.prev(current)
                };
                let Some(url) = target.map(|target| target.url.clone()) else {
                    return MenuEvent::Unhandled;
                };
                changed(self.update_field(id, MenuField::Url, url))
            }
            _ => MenuEvent::Unhandled,
        }
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event into an action and handles it.
    pub fn handle_key(&mut self, key: KeyEvent, targets: &LinkTargets) -> MenuEvent<()> {
        let Some(action) = self.keymap.resolve(key) else {
            return MenuEvent::Unhandled;
        };
        self.handle_action(action, targets)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with a custom mapping and handles it.
    pub fn handle_key_with<C, F>(
        &mut self,
        key: KeyEvent,
        targets: &LinkTargets,
        custom: F,
    ) -> MenuEvent<C>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        let Some(action) = self.keymap.resolve_with(key, custom) else {
            return MenuEvent::Unhandled;
        };
        self.handle_action(action, targets)
    }
}

const fn changed<C>(did_change: bool) -> MenuEvent<C> {
    if did_change {
        MenuEvent::Changed
    } else {
        MenuEvent::Unhandled
    }
}

/// For each row, whether the row and each of its ancestors below the root level is the
/// last of its siblings. Entry `k` belongs to level `k + 1`.
fn tail_stacks(depths: &[usize]) -> Vec<SmallVec<[bool; 8]>> {
    let mut is_last = vec![false; depths.len()];
    let mut following: SmallVec<[bool; 8]> = SmallVec::new();
    for (idx, &depth) in depths.iter().enumerate().rev() {
        if following.len() <= depth {
            following.resize(depth + 1, false);
        }
        is_last[idx] = !following[depth];
        following[depth] = true;
        following.truncate(depth + 1);
    }

    let mut path: SmallVec<[bool; 8]> = SmallVec::new();
    depths
        .iter()
        .zip(is_last)
        .map(|(&depth, last)| {
            // Missing ancestors (inconsistent depths) draw as blank columns.
            path.resize(depth, true);
            path.push(last);
            path.iter().skip(1).copied().collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::model::DynamicPage;

    fn record(id: u64, parent: Option<u64>, order: i64, title: &str) -> MenuRecord {
        MenuRecord {
            id: Some(id),
            parent_id: parent,
            order: Some(order),
            title: title.to_string(),
            url: String::new(),
        }
    }

    fn saved(id: u64) -> ItemId {
        ItemId::Saved(id)
    }

    /// A(1), B(2) -> C(3)
    fn abc() -> MenuTreeState {
        MenuTreeState::from_records(
            [
                record(1, None, 0, "A"),
                record(2, None, 1, "B"),
                record(3, Some(2), 0, "C"),
            ],
            MenuTreeConfig::default(),
        )
    }

    fn shape(state: &MenuTreeState) -> Vec<(ItemId, Option<ItemId>, usize, usize)> {
        state
            .flattened()
            .iter()
            .map(|item| (item.id, item.parent_id, item.order, item.depth))
            .collect()
    }

    #[test]
    fn drop_after_parent_nests_under_it() {
        let mut state = abc();
        assert!(state.begin_drag(saved(1)));
        assert!(state.end_drag(saved(1), Some(saved(2))));

        assert_eq!(
            shape(&state),
            vec![
                (saved(2), None, 0, 0),
                (saved(1), Some(saved(2)), 0, 1),
                (saved(3), Some(saved(2)), 1, 1),
            ]
        );
        assert!(!state.is_dragging());
        assert_eq!(state.drag_offset(), 0.0);
    }

    #[test]
    fn drop_without_target_is_noop() {
        let mut state = abc();
        let before = state.tree().to_vec();
        state.begin_drag(saved(1));
        state.drag_move(8.0);

        assert!(!state.end_drag(saved(1), Some(saved(99))));
        assert_eq!(state.tree(), before.as_slice());
        assert!(!state.is_dragging());

        state.begin_drag(saved(1));
        assert!(!state.end_drag(saved(1), None));
        assert_eq!(state.tree(), before.as_slice());
    }

    #[test]
    fn drop_into_own_subtree_is_rejected() {
        let mut state = abc();
        state.begin_drag(saved(2));
        assert!(!state.drag_over(saved(3)));
        assert!(!state.end_drag(saved(2), Some(saved(3))));
        assert_eq!(state.tree().len(), 2);
    }

    #[test]
    fn dragged_parent_carries_children() {
        let mut state = abc();
        state.begin_drag(saved(2));
        state.drag_over(saved(1));
        assert!(state.drop_drag());

        assert_eq!(
            shape(&state),
            vec![
                (saved(2), None, 0, 0),
                (saved(3), Some(saved(2)), 0, 1),
                (saved(1), None, 1, 0),
            ]
        );
    }

    #[test]
    fn pointer_held_on_one_row_keeps_the_same_target() {
        let mut state = abc();
        state.begin_drag(saved(1));

        let mut targets = Vec::new();
        for _ in 0..4 {
            if let Some(id) = state.id_at_viewport_row(1) {
                state.drag_over(id);
            }
            targets.push(state.over_id());
        }

        assert_eq!(targets, vec![Some(saved(2)); 4]);
        assert_eq!(state.rows()[1].item().id, saved(1));
    }

    #[test]
    fn pointer_rows_skip_the_dragged_subtree() {
        let mut state = abc();
        state.begin_drag(saved(2));
        assert_eq!(state.id_at_viewport_row(0), Some(saved(1)));
        assert_eq!(state.id_at_viewport_row(1), Some(saved(2)));
        assert_eq!(state.id_at_viewport_row(2), None);
    }

    /// A(1) -> [A1(11), A2(12)], B(2), C(3)
    fn parent_first() -> MenuTreeState {
        MenuTreeState::from_records(
            [
                record(1, None, 0, "A"),
                record(11, Some(1), 0, "A1"),
                record(12, Some(1), 1, "A2"),
                record(2, None, 1, "B"),
                record(3, None, 2, "C"),
            ],
            MenuTreeConfig::default(),
        )
    }

    #[test]
    fn parent_dragged_down_keeps_children() {
        let mut state = parent_first();
        state.begin_drag(saved(1));
        state.drag_over(saved(2));
        assert!(state.drop_drag());

        assert_eq!(
            shape(&state),
            vec![
                (saved(2), None, 0, 0),
                (saved(1), None, 1, 0),
                (saved(11), Some(saved(1)), 0, 1),
                (saved(12), Some(saved(1)), 1, 1),
                (saved(3), None, 2, 0),
            ]
        );
    }

    #[test]
    fn parent_dragged_down_and_indented_nests_with_children() {
        let mut state = parent_first();
        let indent = state.config().indent_width;
        state.begin_drag(saved(1));
        state.drag_over(saved(2));
        state.drag_move(indent);
        assert!(state.drop_drag());

        assert_eq!(
            shape(&state),
            vec![
                (saved(2), None, 0, 0),
                (saved(1), Some(saved(2)), 0, 1),
                (saved(11), Some(saved(1)), 0, 2),
                (saved(12), Some(saved(1)), 1, 2),
                (saved(3), None, 1, 0),
            ]
        );
    }

    #[test]
    fn horizontal_offset_indents_in_place() {
        let mut state = abc();
        let indent = state.config().indent_width;
        state.begin_drag(saved(2));
        state.drag_move(indent);
        assert_eq!(
            state.projection().map(|p| (p.depth, p.parent_id)),
            Some((1, Some(saved(1))))
        );
        assert!(state.drop_drag());

        let root = &state.tree()[0];
        assert_eq!(root.id, saved(1));
        assert_eq!(root.children[0].id, saved(2));
        assert_eq!(root.children[0].children[0].depth, 2);
    }

    #[test]
    fn update_field_rewrites_one_item() {
        let mut state = abc();
        assert!(state.update_field(saved(3), MenuField::Title, "Sale"));
        assert!(!state.update_field(saved(3), MenuField::Title, "Sale"));
        assert!(!state.update_field(saved(42), MenuField::Url, "/x"));
        assert_eq!(state.tree()[1].children[0].title, "Sale");
    }

    #[test]
    fn remove_cascades_to_descendants() {
        let mut state = MenuTreeState::from_records(
            [
                record(1, None, 0, "Root"),
                record(2, Some(1), 0, "Child"),
                record(3, Some(2), 0, "Grandchild"),
            ],
            MenuTreeConfig::default(),
        );
        assert!(state.remove(saved(2)));
        assert_eq!(state.ids(), vec![saved(1)]);
        assert!(!state.remove(saved(3)));
    }

    #[test]
    fn add_item_appends_blank_root() {
        let mut state = MenuTreeState::default();
        let id = state.add_item();

        assert!(id.is_temporary());
        let tree = state.tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, id);
        assert!(tree[0].title.is_empty());
        assert!(tree[0].url.is_empty());
        assert_eq!(tree[0].depth, 0);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn listener_sees_every_commit() {
        let commits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&commits);
        let mut state = abc();
        state.set_on_change(move |_| seen.set(seen.get() + 1));

        state.add_item();
        state.remove(saved(1));
        state.end_drag(saved(2), None);
        assert_eq!(commits.get(), 2);
    }

    #[test]
    fn rows_show_projection_while_dragging() {
        let mut state = abc();
        state.begin_drag(saved(2));
        state.drag_over(saved(1));

        let rows = state.rows();
        let ids: Vec<_> = rows.iter().map(|row| row.item().id).collect();
        assert_eq!(ids, vec![saved(2), saved(1)]);
        assert!(rows[0].is_active());
        assert_eq!(rows[0].depth(), 0);
    }

    #[test]
    fn keyboard_drag_moves_and_drops() {
        let mut state = abc();
        let targets = LinkTargets::default();
        state.select_by_id(saved(1));

        assert_eq!(
            state.handle_action::<()>(MenuAction::ToggleDrag, &targets),
            MenuEvent::Handled
        );
        state.handle_action::<()>(MenuAction::MoveDown, &targets);
        assert_eq!(state.over_id(), Some(saved(2)));
        assert_eq!(
            state.handle_action::<()>(MenuAction::ToggleDrag, &targets),
            MenuEvent::Changed
        );
        assert_eq!(state.ids(), vec![saved(2), saved(1), saved(3)]);
        assert_eq!(state.selected_id(), Some(saved(1)));
    }

    #[test]
    fn outdent_without_drag_lifts_item() {
        let mut state = abc();
        let targets = LinkTargets::default();
        state.select_by_id(saved(3));
        assert_eq!(
            state.handle_action::<()>(MenuAction::Outdent, &targets),
            MenuEvent::Changed
        );
        assert_eq!(state.tree().len(), 3);
        assert_eq!(state.tree()[2].id, saved(3));
    }

    #[test]
    fn url_actions_cycle_targets() {
        let mut state = abc();
        let targets = LinkTargets::new([
            DynamicPage::new("home", "Home"),
            DynamicPage::new("sale", "Sale"),
        ]);
        state.select_by_id(saved(1));

        state.handle_action::<()>(MenuAction::NextUrl, &targets);
        assert_eq!(state.flattened()[0].url, "/home");
        state.handle_action::<()>(MenuAction::NextUrl, &targets);
        assert_eq!(state.flattened()[0].url, "/sale");
        state.handle_action::<()>(MenuAction::PrevUrl, &targets);
        assert_eq!(state.flattened()[0].url, "/home");
    }

    #[test]
    fn submission_nulls_new_items() {
        let mut state = abc();
        state.add_item();
        let submission = state.submission("main");
        assert_eq!(submission.items[0].id, Some(1));
        assert_eq!(submission.items[2].id, None);
    }

    #[test]
    fn tail_stacks_track_last_siblings() {
        let stacks = tail_stacks(&[0, 1, 1, 2, 0]);
        let stacks: Vec<Vec<bool>> = stacks.into_iter().map(|s| s.to_vec()).collect();
        assert_eq!(
            stacks,
            vec![vec![], vec![false], vec![true], vec![true, true], vec![]]
        );
    }
}
