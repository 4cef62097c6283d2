/// Actions that a user or application can initiate on the menu editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction<Custom = ()> {
    /// Move selection up; while dragging, move the drop target up.
    MoveUp,
    /// Move selection down; while dragging, move the drop target down.
    MoveDown,
    /// Select the first row.
    SelectFirst,
    /// Select the last row.
    SelectLast,
    /// Pick up the selected row, or drop the row being dragged.
    ToggleDrag,
    /// Abort the current drag without changes.
    CancelDrag,
    /// Nest one level deeper (live while dragging, immediate otherwise).
    Indent,
    /// Move one level up (live while dragging, immediate otherwise).
    Outdent,
    /// Append a new root-level item.
    AddItem,
    /// Remove the selected item together with its descendants.
    RemoveItem,
    /// Point the selected item at the next allowed destination.
    NextUrl,
    /// Point the selected item at the previous allowed destination.
    PrevUrl,
    /// Request editing the selected item's title.
    EditTitle,
    /// Request submitting the menu.
    Save,
    /// Toggle drawing of connector lines.
    ToggleGuides,
    /// Custom action forwarded to the caller without internal handling.
    Custom(Custom),
}

/// Result of handling an action or key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEvent<Custom = ()> {
    /// The action only touched view state (selection, drag pointer, guides).
    Handled,
    /// The action committed a new tree.
    Changed,
    /// The action was ignored (e.g., nothing selected / nothing to do).
    Unhandled,
    /// The action is forwarded to the caller for handling.
    Action(MenuAction<Custom>),
}
