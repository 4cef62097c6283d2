use tracing::debug;

use crate::id::ItemId;
use crate::model::FlatMenuItem;

/// Depth and parent a dragged item would take if dropped at the current pointer position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projection {
    pub depth: usize,
    pub parent_id: Option<ItemId>,
    pub min_depth: usize,
    pub max_depth: usize,
}

/// Converts a horizontal offset into whole indentation steps.
///
/// Halves round up (`-0.5` → `0`, `0.5` → `1`). A non-finite offset or a non-positive
/// indent width yields no change.
pub fn drag_depth(offset_x: f32, indent_width: f32) -> isize {
    if !offset_x.is_finite() || !indent_width.is_finite() || indent_width <= 0.0 {
        return 0;
    }
    // `as` saturates for out-of-range floats.
    (offset_x / indent_width + 0.5).floor() as isize
}

/// Computes the projected depth and parent of `active_id` dropped over `over_id`.
///
/// `items` is the flat list in display order. Returns `None` if either id is missing. The
/// list is not modified; the vertical move is simulated on a local copy.
pub fn get_projection(
    items: &[FlatMenuItem],
    active_id: ItemId,
    over_id: ItemId,
    offset_x: f32,
    indent_width: f32,
) -> Option<Projection> {
    let active_idx = items.iter().position(|item| item.id == active_id)?;
    let over_idx = items.iter().position(|item| item.id == over_id)?;

    let mut moved: Vec<&FlatMenuItem> = items.iter().collect();
    let active = moved.remove(active_idx);
    moved.insert(over_idx, active);

    let previous = over_idx.checked_sub(1).map(|idx| moved[idx]);
    let next = moved.get(over_idx + 1).copied();

    let max_depth = previous.map_or(0, |item| item.depth + 1);
    let min_depth = next.map_or(0, |item| item.depth);
    let projected =
        isize::try_from(active.depth).unwrap_or(isize::MAX) + drag_depth(offset_x, indent_width);

    let mut depth = if projected >= isize::try_from(max_depth).unwrap_or(isize::MAX) {
        max_depth
    } else if projected < isize::try_from(min_depth).unwrap_or(isize::MAX) {
        min_depth
    } else {
        usize::try_from(projected).unwrap_or(0)
    };

    let parent_id = if depth == 0 {
        None
    } else {
        let parent = moved[..over_idx]
            .iter()
            .rev()
            .find(|item| item.depth == depth - 1)
            .map(|item| item.id);
        if parent.is_none() {
            debug!(active = %active_id, depth, "no ancestor at projected depth, dropping to root");
            depth = 0;
        }
        parent
    };

    Some(Projection {
        depth,
        parent_id,
        min_depth,
        max_depth,
    })
}
