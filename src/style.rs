use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Borders;

/// Визуальные настройки редактора меню.
#[derive(Clone)]
pub struct MenuTreeStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    pub highlight_style: Style,
    /// Row being dragged.
    pub drag_style: Style,
    pub line_style: Style,
    pub url_style: Style,
    /// Empty titles and links.
    pub placeholder_style: Style,
    pub highlight_symbol: &'a str,
    pub borders: Borders,
}

impl Default for MenuTreeStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            block_style: Style::default(),
            border_style: Style::default(),
            highlight_style: Style::default().add_modifier(Modifier::REVERSED),
            drag_style: Style::default().add_modifier(Modifier::BOLD),
            line_style: Style::default(),
            url_style: Style::default(),
            placeholder_style: Style::default().add_modifier(Modifier::DIM),
            highlight_symbol: ">> ",
            borders: Borders::ALL,
        }
    }
}
