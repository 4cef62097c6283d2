use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Cell;

use crate::context::MenuRowContext;

#[derive(Clone, Copy)]
pub struct MenuGlyphs<'a> {
    pub handle: &'a str,
    pub branch: &'a str,
    pub branch_last: &'a str,
    pub vert: &'a str,
    pub horizontal: &'a str,
    pub remove: &'a str,
    /// Shown instead of an empty title.
    pub untitled: &'a str,
}

impl MenuGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            handle: "⠿",
            branch: "├",
            branch_last: "└",
            vert: "│",
            horizontal: "─",
            remove: "✕",
            untitled: "(untitled)",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            handle: "=",
            branch: "|",
            branch_last: "`",
            vert: "|",
            horizontal: "-",
            remove: "x",
            untitled: "(untitled)",
        }
    }
}

fn connector(head: &str, fill: &str, width: usize) -> String {
    match width {
        0 => String::new(),
        1 => head.to_string(),
        _ => format!("{head}{} ", fill.repeat(width - 2)),
    }
}

fn padded(glyph: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    format!("{glyph}{}", " ".repeat(width - 1))
}

/// Builds the title column of a row: drag handle, indentation with connector lines, title.
///
/// Indentation is `depth × indent` columns; nested rows get a connector to their parent when
/// lines are enabled.
pub fn menu_title_line<'a>(
    ctx: &MenuRowContext<'_>,
    title: &str,
    glyphs: &MenuGlyphs<'a>,
    untitled_style: Style,
) -> Line<'a> {
    let width = usize::from(ctx.indent);
    let mut spans: Vec<Span<'a>> = Vec::with_capacity(ctx.depth + 3);
    spans.push(Span::raw(glyphs.handle));
    spans.push(Span::raw(" "));

    if ctx.depth > 0 {
        if ctx.draw_lines {
            let own_level = ctx.is_tail_stack.len().saturating_sub(1);
            for (level, &is_last) in ctx.is_tail_stack.iter().enumerate() {
                let part = if level == own_level {
                    let head = if is_last {
                        glyphs.branch_last
                    } else {
                        glyphs.branch
                    };
                    connector(head, glyphs.horizontal, width)
                } else if is_last {
                    " ".repeat(width)
                } else {
                    padded(glyphs.vert, width)
                };
                spans.push(Span::styled(part, ctx.line_style));
            }
        } else {
            spans.push(Span::raw(" ".repeat(width * ctx.depth)));
        }
    }

    if title.is_empty() {
        spans.push(Span::styled(glyphs.untitled, untitled_style));
    } else {
        spans.push(Span::raw(title.to_string()));
    }
    Line::from(spans)
}

pub fn menu_title_cell<'a>(
    ctx: &MenuRowContext<'_>,
    title: &str,
    glyphs: &MenuGlyphs<'a>,
    untitled_style: Style,
) -> Cell<'a> {
    Cell::from(menu_title_line(ctx, title, glyphs, untitled_style))
}
