use ratatui::style::Style;

#[derive(Clone, Copy)]
pub struct MenuRowContext<'a> {
    pub depth: usize,
    pub is_tail_stack: &'a [bool],
    pub is_active: bool,
    /// Columns per nesting level.
    pub indent: u16,
    pub draw_lines: bool,
    pub line_style: Style,
}
