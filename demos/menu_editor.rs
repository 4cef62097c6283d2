// Interactive menu editor: keyboard and mouse drag-and-drop over a JSON-loaded menu.
//
// Usage: menu_editor [items.json [pages.json]]
// Set MENUTREE_LOG=<file> to write tracing output (filter with RUST_LOG).
use std::env;
use std::fs;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};
use tracing_subscriber::EnvFilter;

use tui_menutree::{
    DynamicPage, ItemId, LinkTargets, MenuAction, MenuEvent, MenuField, MenuRecord,
    MenuTreeConfig, MenuTreeState, MenuTreeStyle, MenuTreeView, find_node,
};

const SAMPLE_ITEMS: &str = r#"[
    {"id": 1, "parent_id": null, "order": 0, "title": "Home", "url": "/home"},
    {"id": 2, "parent_id": null, "order": 1, "title": "Shop", "url": "/shop"},
    {"id": 3, "parent_id": 2, "order": 0, "title": "New arrivals", "url": "/new"},
    {"id": 4, "parent_id": 2, "order": 1, "title": "Sale", "url": "/sale"},
    {"id": 5, "parent_id": null, "order": 2, "title": "About", "url": "/about"}
]"#;

const SAMPLE_PAGES: &str = r#"[
    {"slug": "home", "title": "Home"},
    {"slug": "shop", "title": "Shop"},
    {"slug": "new", "title": "New arrivals"},
    {"slug": "sale", "title": "Sale"},
    {"slug": "about", "title": "About"},
    {"slug": "contact", "title": "Contact"}
]"#;

// First table row on screen: top border plus header.
const ROWS_TOP: u16 = 2;

struct TitleEdit {
    id: ItemId,
    buffer: String,
}

struct App {
    state: MenuTreeState,
    targets: LinkTargets,
    style: MenuTreeStyle<'static>,
    editing: Option<TitleEdit>,
    drag_column: u16,
    saved: Option<String>,
}

fn init_logging() {
    let Some(path) = env::var_os("MENUTREE_LOG") else {
        return;
    };
    let Ok(file) = fs::File::create(path) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tui_menutree=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

type Loaded = (Vec<MenuRecord>, Vec<DynamicPage>);

fn load(args: &[String]) -> Result<Loaded, Box<dyn std::error::Error>> {
    let items = match args.first() {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE_ITEMS.to_string(),
    };
    let pages = match args.get(1) {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE_PAGES.to_string(),
    };
    Ok((MenuRecord::parse_list(&items)?, DynamicPage::parse_list(&pages)?))
}

impl App {
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let Some(edit) = self.editing.as_mut() {
            match key.code {
                KeyCode::Enter => {
                    if let Some(edit) = self.editing.take() {
                        self.state.update_field(edit.id, MenuField::Title, edit.buffer);
                    }
                }
                KeyCode::Esc => self.editing = None,
                KeyCode::Backspace => {
                    edit.buffer.pop();
                }
                KeyCode::Char(c) => edit.buffer.push(c),
                _ => {}
            }
            return true;
        }

        if key.code == KeyCode::Char('q') && !self.state.is_dragging() {
            return false;
        }

        if let MenuEvent::Action(action) = self.state.handle_key(key, &self.targets) {
            match action {
                MenuAction::EditTitle => {
                    if let Some(id) = self.state.selected_id() {
                        let buffer = find_node(self.state.tree(), id)
                            .map(|node| node.title.clone())
                            .unwrap_or_default();
                        self.editing = Some(TitleEdit { id, buffer });
                    }
                }
                MenuAction::Save => match self.state.submission("main").to_json_pretty() {
                    Ok(json) => self.saved = Some(json),
                    Err(err) => tracing::error!(%err, "submission failed"),
                },
                _ => {}
            }
        }
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let row = usize::from(mouse.row.saturating_sub(ROWS_TOP));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if mouse.row >= ROWS_TOP => {
                if let Some(id) = self.state.id_at_viewport_row(row) {
                    self.state.begin_drag(id);
                    self.drag_column = mouse.column;
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.state.is_dragging() => {
                let delta = f32::from(mouse.column) - f32::from(self.drag_column);
                self.drag_column = mouse.column;
                self.state.drag_move(delta);
                if let Some(over) = self.state.id_at_viewport_row(row) {
                    self.state.drag_over(over);
                }
            }
            MouseEventKind::Up(MouseButton::Left) if self.state.is_dragging() => {
                self.state.drop_drag();
            }
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let [main, status] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let widget = MenuTreeView::new(&self.targets, self.style.clone());
        frame.render_stateful_widget(widget, main, &mut self.state);

        let status_line = if let Some(edit) = &self.editing {
            Line::from(format!("title: {}_", edit.buffer))
        } else if let Some(projection) = self.state.projection() {
            Line::from(format!(
                "dragging: depth {} (allowed {}..={})",
                projection.depth, projection.min_depth, projection.max_depth
            ))
        } else {
            Line::from(
                "space drag  ←/→ nest  a add  D remove  e title  u/U link  ctrl-s save  q quit",
            )
        };
        frame.render_widget(Paragraph::new(status_line), status);
    }
}

fn run_app(mut terminal: DefaultTerminal, mut app: App) -> io::Result<App> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !app.handle_key(key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }
    Ok(app)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args: Vec<String> = env::args().skip(1).collect();
    let (records, pages) = load(&args)?;

    let config = match env::var("MENUTREE_CONFIG") {
        Ok(json) => MenuTreeConfig::from_json(&json)?,
        Err(_) => MenuTreeConfig::default(),
    };
    let mut state = MenuTreeState::from_records(records, config);
    state.set_on_change(|tree| tracing::info!(roots = tree.len(), "menu changed"));
    state.select_first();

    let mut style = MenuTreeStyle::default();
    style.line_style = Style::default().fg(Color::Rgb(86, 98, 120));
    style.drag_style = Style::default()
        .fg(Color::Rgb(136, 192, 208))
        .add_modifier(Modifier::BOLD);
    style.highlight_style = Style::default()
        .fg(Color::Rgb(255, 255, 255))
        .bg(Color::Rgb(52, 66, 96))
        .add_modifier(Modifier::BOLD);
    style.title = Some(Line::from("menu"));

    let app = App {
        state,
        targets: LinkTargets::new(pages),
        style,
        editing: None,
        drag_column: 0,
        saved: None,
    };

    let terminal = ratatui::init();
    execute!(io::stdout(), EnableMouseCapture)?;
    let result = run_app(terminal, app);
    execute!(io::stdout(), DisableMouseCapture)?;
    ratatui::restore();

    if let Some(json) = result?.saved {
        println!("{json}");
    }
    Ok(())
}
