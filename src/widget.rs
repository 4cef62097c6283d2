use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
    Table,
};

use crate::columns::MenuColumns;
use crate::context::MenuRowContext;
use crate::destinations::LinkTargets;
use crate::glyphs::{MenuGlyphs, menu_title_cell};
use crate::state::{MenuRow, MenuTreeState};
use crate::style::MenuTreeStyle;

/// Основной виджет редактора меню (table + stateful).
///
/// Renders one row per menu item: drag handle, indented title, link target and a remove
/// marker. All edits go through [`MenuTreeState`]; the widget only reads it.
pub struct MenuTreeView<'a> {
    targets: &'a LinkTargets,
    style: MenuTreeStyle<'a>,
    glyphs: MenuGlyphs<'a>,
    columns: MenuColumns,
}

impl<'a> MenuTreeView<'a> {
    pub fn new(targets: &'a LinkTargets, style: MenuTreeStyle<'a>) -> Self {
        Self {
            targets,
            style,
            glyphs: MenuGlyphs::unicode(),
            columns: MenuColumns::default(),
        }
    }

    #[must_use]
    pub const fn glyphs(mut self, glyphs: MenuGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    #[must_use]
    pub fn columns(mut self, columns: MenuColumns) -> Self {
        self.columns = columns;
        self
    }

    fn url_cell(&self, url: &str) -> Cell<'a> {
        if url.is_empty() {
            return Cell::from(Span::styled("(no link)", self.style.placeholder_style));
        }
        let line = self.targets.title_for(url).map_or_else(
            || Line::from(Span::styled(url.to_string(), self.style.url_style)),
            |title| {
                Line::from(vec![
                    Span::styled(title, self.style.url_style),
                    Span::styled(format!(" {url}"), self.style.placeholder_style),
                ])
            },
        );
        Cell::from(line)
    }

    fn build_rows(&self, rows: &[MenuRow<'_>], draw_lines: bool, indent: u16) -> Vec<Row<'a>> {
        rows.iter()
            .map(|row| {
                let ctx = MenuRowContext {
                    depth: row.depth,
                    is_tail_stack: row.is_tail_stack.as_slice(),
                    is_active: row.is_active,
                    indent,
                    draw_lines,
                    line_style: self.style.line_style,
                };
                let item = row.item();
                let cells = [
                    menu_title_cell(&ctx, &item.title, &self.glyphs, self.style.placeholder_style),
                    self.url_cell(&item.url),
                    Cell::from(self.glyphs.remove),
                ];
                let table_row = Row::new(cells);
                if ctx.is_active {
                    table_row.style(self.style.drag_style)
                } else {
                    table_row
                }
            })
            .collect()
    }

    fn render_scrollbar(
        area: Rect,
        buf: &mut Buffer,
        offset: usize,
        inner_height: usize,
        scroll_rows: usize,
    ) {
        let scroll_len = scroll_rows.saturating_add(1);
        let position = offset.min(scroll_len.saturating_sub(1));
        let mut scrollbar_state = ScrollbarState::new(scroll_len)
            .position(position)
            .viewport_content_length(inner_height);
        Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .render(area, buf, &mut scrollbar_state);
    }
}

impl StatefulWidget for MenuTreeView<'_> {
    type State = MenuTreeState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let header = self.columns.header();
        let header_height = u16::from(header.is_some());

        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        block = block
            .style(self.style.block_style)
            .border_style(self.style.border_style);

        let inner_height = block.inner(area).height.saturating_sub(header_height) as usize;
        state.ensure_selection_visible(inner_height);

        let indent = state.config().indent_columns();
        let rows = {
            let menu_rows = state.rows();
            self.build_rows(&menu_rows, state.draw_lines(), indent)
        };
        let scroll_rows = rows.len().saturating_sub(inner_height);

        let (table_area, table_block, scrollbar_area) = if scroll_rows > 0 {
            let table_area = Rect {
                width: area.width.saturating_sub(1),
                ..area
            };
            let scrollbar_area = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y,
                width: 1,
                height: area.height,
            };
            let mut table_borders = self.style.borders;
            table_borders.remove(Borders::RIGHT);
            (table_area, block.borders(table_borders), Some(scrollbar_area))
        } else {
            (area, block, None)
        };

        let constraints = self.columns.constraints_for_area(table_block.inner(table_area));
        let mut table = Table::new(rows, constraints)
            .style(self.style.block_style)
            .block(table_block)
            .row_highlight_style(self.style.highlight_style)
            .highlight_symbol(self.style.highlight_symbol);
        if let Some(header) = header {
            table = table.header(header);
        }
        table.render(table_area, buf, state.list_state_mut());

        if let Some(scrollbar_area) = scrollbar_area {
            let offset = state.list_state().offset();
            Self::render_scrollbar(scrollbar_area, buf, offset, inner_height, scroll_rows);
        }
    }
}
