use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Cell, Row};
use smallvec::SmallVec;

/// Width constraints for a column in adaptive layout.
#[derive(Clone, Copy, Debug)]
pub struct ColumnWidth {
    /// Minimum width.
    pub min: u16,
    /// Ideal width (used before expanding toward max).
    pub ideal: u16,
    /// Maximum width.
    pub max: u16,
}

impl ColumnWidth {
    /// Creates a fixed width (min = ideal = max).
    pub const fn fixed(width: u16) -> Self {
        Self {
            min: width,
            ideal: width,
            max: width,
        }
    }

    pub const fn new(min: u16, ideal: u16, max: u16) -> Self {
        Self { min, ideal, max }
    }
}

/// Distributes `total` width across columns respecting `min`/`ideal`/`max`.
///
/// If `total` is outside the feasible range (`sum(min)`..=`sum(max)`), the returned widths are
/// clamped to `min` or `max` respectively (so the sum may differ from `total`).
pub fn distribute_widths(total: u16, columns: &[ColumnWidth]) -> SmallVec<[u16; 4]> {
    let mut widths: SmallVec<[u16; 4]> = columns.iter().map(|col| col.min).collect();
    let min_sum = widths.iter().fold(0u16, |acc, w| acc.saturating_add(*w));

    let mut remaining = total.saturating_sub(min_sum);
    // Grow toward ideal widths first, then toward max.
    let passes: [fn(&ColumnWidth) -> u16; 2] = [|col| col.ideal.max(col.min), |col| col.max];
    for target in passes {
        for (width, col) in widths.iter_mut().zip(columns) {
            if remaining == 0 {
                return widths;
            }
            let add = target(col).saturating_sub(*width).min(remaining);
            *width = width.saturating_add(add);
            remaining -= add;
        }
    }
    widths
}

/// Layout of the editor row: title (with tree indentation), link target, remove marker.
pub struct MenuColumns {
    title: ColumnWidth,
    url: ColumnWidth,
    remove: ColumnWidth,
    headers: [&'static str; 3],
    header_style: Style,
    show_header: bool,
}

impl Default for MenuColumns {
    fn default() -> Self {
        Self::new(
            ColumnWidth::new(16, 32, u16::MAX),
            ColumnWidth::new(8, 24, 40),
            ColumnWidth::fixed(2),
        )
    }
}

impl MenuColumns {
    pub const fn new(title: ColumnWidth, url: ColumnWidth, remove: ColumnWidth) -> Self {
        Self {
            title,
            url,
            remove,
            headers: ["Title", "Link", ""],
            header_style: Style::new(),
            show_header: true,
        }
    }

    /// Replaces the header labels.
    pub const fn headers(mut self, headers: [&'static str; 3]) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the header row style.
    pub const fn header_style(mut self, style: Style) -> Self {
        self.header_style = style;
        self
    }

    /// Disables the header row.
    pub const fn without_header(mut self) -> Self {
        self.show_header = false;
        self
    }

    pub fn header(&self) -> Option<Row<'static>> {
        if !self.show_header {
            return None;
        }
        let cells = self.headers.map(Cell::from);
        Some(Row::new(cells).style(self.header_style))
    }

    /// Returns constraints for all columns based on the available area.
    pub fn constraints_for_area(&self, area: Rect) -> SmallVec<[Constraint; 4]> {
        distribute_widths(area.width, &[self.title, self.url, self.remove])
            .into_iter()
            .map(Constraint::Length)
            .collect()
    }
}
