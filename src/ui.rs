use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kuntahaku::format::{area_sentence, national_sentence};
use kuntahaku::{AreaIndex, SearchState};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use tracing::debug;

const ACCENT: Color = Color::Cyan;
const MUTED: Color = Color::Gray;

pub struct App {
    pub index: AreaIndex,
    pub search: SearchState,
    pub target_year: i32,
    /// Set when the data could not be loaded; the index is then empty
    pub load_error: Option<String>,
    pub list_state: ListState,
}

impl App {
    pub fn new(index: AreaIndex, target_year: i32, load_error: Option<String>) -> Self {
        Self {
            index,
            search: SearchState::new(),
            target_year,
            load_error,
            list_state: ListState::default(),
        }
    }

    /// Returns false when the app should quit
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return false,
            KeyCode::Esc => {
                if self.search.show_suggestions {
                    self.search.hide_suggestions();
                } else {
                    return false;
                }
            }
            KeyCode::Enter => {
                self.search.accept(&self.index);
                debug!(query = %self.search.query, found = self.search.result.is_some(), "search");
            }
            KeyCode::Down => {
                if !self.search.show_suggestions {
                    self.search.on_focus();
                }
                self.search.highlight_next(&self.index);
            }
            KeyCode::Up => self.search.highlight_previous(&self.index),
            KeyCode::Backspace => self.search.pop_char(),
            KeyCode::Char(c) => self.search.push_char(c),
            _ => {}
        }

        self.list_state.select(self.search.highlighted);
        true
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key.code, key.modifiers) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Intro
            Constraint::Length(3), // Search box
            Constraint::Min(0),    // Suggestions or results
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0]);
    render_intro(f, chunks[1], app);
    render_input(f, chunks[2], app);

    if app.search.show_suggestions && !app.search.visible_suggestions(&app.index).is_empty() {
        render_suggestions(f, chunks[3], app);
    } else {
        render_results(f, chunks[3], app);
    }

    render_status_bar(f, chunks[4], app);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(Span::styled(
        "Vieraskieliset varhaiskasvatuksessa",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(ACCENT)));

    f.render_widget(header, area);
}

fn render_intro(f: &mut Frame, area: Rect, app: &App) {
    let text = format!(
        "Hae oma kunta ja katso, kuinka suuri osa varhaiskasvatuksen lapsista on vieraskielisiä. \
         Tiedot perustuvat Tilastokeskuksen tilastoon (vuosi {}).",
        app.target_year
    );

    let intro = Paragraph::new(Span::styled(text, Style::default().fg(MUTED))).wrap(Wrap { trim: true });
    f.render_widget(intro, area);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let content = if app.search.query.is_empty() {
        Span::styled("Esim. Helsinki", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.search.query.as_str())
    };

    let input = Paragraph::new(Line::from(content)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED))
            .title(" Kunta "),
    );
    f.render_widget(input, area);

    // Cursor after the typed text, inside the border
    let typed = app.search.query.chars().count() as u16;
    f.set_cursor(area.x + 1 + typed.min(area.width.saturating_sub(3)), area.y + 1);
}

fn render_suggestions(f: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = app
        .search
        .visible_suggestions(&app.index)
        .iter()
        .map(|record| ListItem::new(record.area_name.clone()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED))
                .title(" Ehdotukset "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_results(f: &mut Frame, area: Rect, app: &App) {
    let mut content = vec![Line::from("")];

    if let Some(err) = &app.load_error {
        content.push(Line::from(Span::styled(
            format!("  Datan haku epäonnistui: {}", err),
            Style::default().fg(Color::Red),
        )));
        content.push(Line::from(""));
    }

    if let Some(record) = &app.search.result {
        content.push(Line::from(Span::styled(
            format!("  {}", record.area_name),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )));
        content.push(Line::from(format!("  {}", area_sentence(record))));

        if let Some(national) = app.index.national_aggregate() {
            content.push(Line::from(""));
            content.push(Line::from("  ─────────────────────────────────────"));
            content.push(Line::from(Span::styled(
                "  VERTAILU: KOKO MAA",
                Style::default().fg(MUTED).add_modifier(Modifier::BOLD),
            )));
            content.push(Line::from(format!("  {}", national_sentence(national))));
        }
    }

    if let Some(message) = app.search.not_found_message() {
        content.push(Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(Color::Red),
        )));
    }

    let results = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(" Tulos "),
        );

    f.render_widget(results, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let status_spans = vec![
        Span::styled(
            format!(" Kuntia: {} ", app.index.len()),
            Style::default().fg(ACCENT),
        ),
        Span::raw(" | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Hae | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Ehdotukset | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" Sulje / Lopeta"),
    ];

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuntahaku::{AreaRecord, Count};

    fn app() -> App {
        let record = |name: &str| AreaRecord {
            year: 2024,
            area_name: name.to_string(),
            age_category: "Yhteensä".to_string(),
            total_enrolled: Count::Parsed(200),
            foreign_language_enrolled: Count::Parsed(37),
            line: 0,
        };
        let index = AreaIndex::new(vec![record("Helsinki"), record("KOKO MAA")], "KOKO MAA");
        App::new(index, 2024, None)
    }

    #[test]
    fn test_typing_and_enter() {
        let mut app = app();
        for c in "helsinki".chars() {
            assert!(app.handle_key(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(app.search.result.as_ref().unwrap().area_name, "Helsinki");
    }

    #[test]
    fn test_arrow_selects_suggestion() {
        let mut app = app();
        app.handle_key(KeyCode::Char('k'), KeyModifiers::NONE);
        app.handle_key(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(app.list_state.selected(), Some(0));

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.search.query, "Helsinki");
    }

    #[test]
    fn test_escape_hides_then_quits() {
        let mut app = app();
        app.handle_key(KeyCode::Char('h'), KeyModifiers::NONE);

        assert!(app.handle_key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.search.show_suggestions);
        assert!(!app.handle_key(KeyCode::Esc, KeyModifiers::NONE));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
    }
}
