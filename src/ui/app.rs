use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_path;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::{error, info};

use crate::db::{count_articles, insert_article, search_articles};
use crate::preview::PREVIEW_COLUMNS;

use super::forms::{ArticleField, ArticleForm};
use super::helpers::{centered_rect, key_hint, surface_error};
use super::screens::{
    AddArticleScreen, BrowserEntry, FileBrowser, Notice, ResultLine, SearchScreen,
};

const APP_TITLE: &str = "Towermourne Knowledge Base";
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const SEARCH_PROMPT: &str = "Search: ";
const SUCCESS_MESSAGE: &str = "Article added successfully!";
/// Background of the tags bar along the bottom of the search screen.
const TAGS_BAR_COLOR: Color = Color::Rgb(210, 180, 140);
const PAGE: i32 = 10;

/// Which modal, if any, sits on top of the main screen. `Normal` is the main
/// screen itself.
enum Mode {
    Normal,
    Searching(SearchScreen),
    AddingArticle(AddArticleScreen),
    Acknowledging(Notice),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. Owns the store connection for the lifetime of
/// the process.
pub struct App {
    conn: Connection,
    article_count: i64,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(conn: Connection) -> Result<Self> {
        let article_count = count_articles(&conn)?;
        Ok(Self {
            conn,
            article_count,
            mode: Mode::Normal,
            status: None,
        })
    }

    /// Route a key press to the active mode. Returns `true` when the user asked
    /// to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(screen) => self.handle_search(code, screen)?,
            Mode::AddingArticle(screen) => self.handle_add_article(code, screen)?,
            Mode::Acknowledging(notice) => self.handle_notice(code, notice)?,
        };

        Ok(exit)
    }

    /// Ctrl-O: browse for an image on the add screen, or open the previewed
    /// image in the system viewer on the search screen.
    pub(crate) fn handle_ctrl_o(&mut self) -> Result<()> {
        let mut status: Option<(String, StatusKind)> = None;

        match &mut self.mode {
            Mode::AddingArticle(screen) if screen.browser.is_none() => {
                screen.browser = Some(FileBrowser::starting_at(&screen.form.image_path));
            }
            Mode::Searching(screen) => {
                status = Some(match &screen.preview {
                    None => ("No image to open.".to_string(), StatusKind::Error),
                    Some(slot) => match open_path(&slot.path) {
                        Ok(()) => (format!("Opened {}.", slot.path), StatusKind::Info),
                        Err(err) => (format!("Failed to open image: {err}"), StatusKind::Error),
                    },
                });
            }
            _ => {}
        }

        if let Some((text, kind)) = status {
            self.set_status(text, kind);
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('/') => {
                self.clear_status();
                return Ok(Mode::Searching(SearchScreen::new()));
            }
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingArticle(AddArticleScreen::default()));
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode, mut screen: SearchScreen) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => self.run_search(&mut screen),
            KeyCode::Backspace => screen.backspace(),
            KeyCode::Up => screen.scroll_by(-1),
            KeyCode::Down => screen.scroll_by(1),
            KeyCode::PageUp => screen.scroll_by(-PAGE),
            KeyCode::PageDown => screen.scroll_by(PAGE),
            KeyCode::Home => screen.scroll_to_top(),
            KeyCode::Char(ch) => screen.push_char(ch),
            _ => {}
        }
        Ok(Mode::Searching(screen))
    }

    fn run_search(&mut self, screen: &mut SearchScreen) {
        match search_articles(&self.conn, &screen.query) {
            Ok(results) => {
                info!(
                    query_len = screen.query.chars().count(),
                    hits = results.len(),
                    "search executed"
                );
                screen.show_results(results);
                self.clear_status();
            }
            Err(err) => {
                error!(error = %err, "search failed");
                screen.clear();
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    fn handle_add_article(&mut self, code: KeyCode, mut screen: AddArticleScreen) -> Result<Mode> {
        if let Some(browser) = screen.browser.as_mut() {
            match code {
                KeyCode::Esc => screen.browser = None,
                KeyCode::Up => browser.move_selection(-1),
                KeyCode::Down => browser.move_selection(1),
                KeyCode::PageUp => browser.move_selection(-(PAGE as isize)),
                KeyCode::PageDown => browser.move_selection(PAGE as isize),
                KeyCode::Home => browser.select_first(),
                KeyCode::End => browser.select_last(),
                KeyCode::Backspace | KeyCode::Left => browser.ascend(),
                KeyCode::Enter | KeyCode::Right => {
                    if let Some(path) = browser.activate() {
                        screen.form.set_image_path(path.display().to_string());
                        screen.browser = None;
                    }
                }
                _ => {}
            }
            return Ok(Mode::AddingArticle(screen));
        }

        let form = &mut screen.form;
        match code {
            KeyCode::Esc => {
                self.set_status("Add article cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_article(form) {
                Ok(()) => return Ok(Mode::Acknowledging(Notice::success(SUCCESS_MESSAGE))),
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::AddingArticle(screen))
    }

    fn handle_notice(&mut self, code: KeyCode, notice: Notice) -> Result<Mode> {
        match code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Ok(Mode::Normal),
            _ => Ok(Mode::Acknowledging(notice)),
        }
    }

    fn save_article(&mut self, form: &ArticleForm) -> Result<()> {
        let new = form.parse_inputs()?;
        let article = match insert_article(&self.conn, &new) {
            Ok(article) => article,
            Err(err) => {
                error!(error = %err, "article insert failed");
                return Err(err);
            }
        };
        info!(id = article.id, category = %article.category, "article inserted");

        self.article_count += 1;
        self.set_status(format!("Added {article}."), StatusKind::Info);
        Ok(())
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_main(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Normal => {}
            Mode::Searching(screen) => self.draw_search(frame, content_area, screen),
            Mode::AddingArticle(screen) => {
                self.draw_article_form(frame, content_area, &screen.form);
                if let Some(browser) = &screen.browser {
                    self.draw_file_browser(frame, content_area, browser);
                }
            }
            Mode::Acknowledging(notice) => self.draw_notice(frame, content_area, notice),
        }
    }

    fn draw_main(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(APP_TITLE);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(4),
                Constraint::Fill(1),
            ])
            .split(inner);

        let mut banner = Vec::new();
        banner.extend(key_hint("[S]", "Search"));
        banner.extend(key_hint("[A]", "Add Article"));
        frame.render_widget(Paragraph::new(Line::from(banner)), chunks[0]);

        let welcome_style = Style::default().add_modifier(Modifier::BOLD);
        let shelf = match self.article_count {
            1 => "1 article on the shelves.".to_string(),
            count => format!("{count} articles on the shelves."),
        };
        let welcome = Paragraph::new(vec![
            Line::from(Span::styled("Welcome to the Library.", welcome_style)),
            Line::from(Span::styled("What would you like to do?", welcome_style)),
            Line::from(""),
            Line::from(Span::styled(shelf, Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(welcome, chunks[2]);
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect, screen: &SearchScreen) {
        let popup_area = centered_rect(90, 90, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Search Articles")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(inner);

        let query_block = Block::default().borders(Borders::ALL);
        let query = Paragraph::new(Span::raw(format!("{SEARCH_PROMPT}{}", screen.query)))
            .block(query_block.clone());
        frame.render_widget(query, rows[0]);

        let query_inner = query_block.inner(rows[0]);
        let cursor_x = cursor_column(
            query_inner.x,
            SEARCH_PROMPT.len() + screen.query.chars().count(),
        );
        frame.set_cursor_position((
            cursor_x.min(query_inner.right().saturating_sub(1)),
            query_inner.y,
        ));

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(PREVIEW_COLUMNS + 2),
            ])
            .split(rows[1]);

        let results_title = if screen.results.is_empty() {
            "Search Results".to_string()
        } else {
            format!("Search Results ({})", screen.results.len())
        };
        let lines: Vec<Line> = screen.lines.iter().map(result_line).collect();
        let results = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(results_title))
            .wrap(Wrap { trim: false })
            .scroll((screen.scroll, 0));
        frame.render_widget(results, columns[0]);

        let image_block = Block::default().borders(Borders::ALL).title("Image");
        let image = match &screen.preview {
            Some(slot) => Paragraph::new(slot.image.lines()),
            None => Paragraph::new(""),
        };
        frame.render_widget(image.block(image_block), columns[1]);

        let tags = Paragraph::new(screen.tags.clone())
            .style(Style::default().bg(TAGS_BAR_COLOR).fg(Color::Black))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(tags, rows[2]);
    }

    fn draw_article_form(&self, frame: &mut Frame, area: Rect, form: &ArticleForm) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Article").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = ArticleField::ALL
            .into_iter()
            .map(|field| form.build_line(field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Ctrl-O to browse for an image • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let field = form.active;
        let prefix = field.label().len() + 2;
        let cursor_x = cursor_column(inner.x, prefix + form.value_len(field));
        frame.set_cursor_position((
            cursor_x.min(inner.right().saturating_sub(1)),
            cursor_column(inner.y, field.index()).min(inner.bottom().saturating_sub(1)),
        ));
    }

    fn draw_file_browser(&self, frame: &mut Frame, area: Rect, browser: &FileBrowser) {
        let popup_area = centered_rect(60, 70, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Choose Image: {}", browser.dir.display()))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let items: Vec<ListItem> = browser
            .entries
            .iter()
            .map(|entry| {
                let style = match entry {
                    BrowserEntry::Parent | BrowserEntry::Dir(_) => {
                        Style::default().fg(Color::Cyan)
                    }
                    BrowserEntry::File(_) => Style::default(),
                };
                ListItem::new(Span::styled(entry.label(), style))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(browser.selected));
        frame.render_stateful_widget(list, chunks[0], &mut list_state);

        if let Some(error) = &browser.error {
            let line = Paragraph::new(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            ));
            frame.render_widget(line, chunks[1]);
        }
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(notice.title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(notice.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to continue.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let hints: &[(&'static str, &'static str)] = match &self.mode {
            Mode::Normal => &[("[S]", "Search"), ("[A]", "Add Article"), ("[Q]", "Quit")],
            Mode::Searching(_) => &[
                ("[Enter]", "Search"),
                ("[↑↓]", "Scroll"),
                ("[Ctrl-O]", "Open Image"),
                ("[Esc]", "Close"),
            ],
            Mode::AddingArticle(screen) if screen.browser.is_some() => &[
                ("[↑↓]", "Navigate"),
                ("[Enter]", "Open / Choose"),
                ("[Backspace]", "Up a Folder"),
                ("[Esc]", "Back"),
            ],
            Mode::AddingArticle(_) => &[
                ("[Tab]", "Next Field"),
                ("[Enter]", "Save"),
                ("[Ctrl-O]", "Browse Image"),
                ("[Esc]", "Cancel"),
            ],
            Mode::Acknowledging(_) => &[("[Enter]", "Continue")],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|&(key, action)| key_hint(key, action))
            .collect();
        Line::from(spans)
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

fn result_line(line: &ResultLine) -> Line<'static> {
    let style = match line {
        ResultLine::Field { .. } => Style::default(),
        ResultLine::Divider => Style::default().fg(Color::DarkGray),
        ResultLine::ImageError(_) => Style::default().fg(Color::Red),
        ResultLine::NoResults => Style::default().add_modifier(Modifier::ITALIC),
    };
    Line::from(Span::styled(line.text(), style))
}

/// Screen column `offset` cells to the right of `start`, clamped to the
/// terminal coordinate range.
fn cursor_column(start: u16, offset: usize) -> u16 {
    start.saturating_add(u16::try_from(offset).unwrap_or(u16::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_tables;
    use crate::models::NewArticle;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        App::new(conn).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(code).unwrap()
    }

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            assert!(!press(app, KeyCode::Char(ch)));
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn status_text(app: &App) -> Option<&str> {
        app.status.as_ref().map(|status| status.text.as_str())
    }

    fn search_screen(app: &App) -> &SearchScreen {
        match &app.mode {
            Mode::Searching(screen) => screen,
            _ => panic!("search screen is not open"),
        }
    }

    fn add_screen(app: &App) -> &AddArticleScreen {
        match &app.mode {
            Mode::AddingArticle(screen) => screen,
            _ => panic!("add article screen is not open"),
        }
    }

    fn fill_form(app: &mut App, fields: [&str; 5]) {
        for (index, value) in fields.iter().enumerate() {
            type_str(app, value);
            if index + 1 < fields.len() {
                press(app, KeyCode::Tab);
            }
        }
    }

    #[test]
    fn main_screen_shows_welcome_and_quits() {
        let mut app = app();
        let screen = render(&app);
        assert!(screen.contains("Towermourne Knowledge Base"));
        assert!(screen.contains("Welcome to the Library."));
        assert!(screen.contains("What would you like to do?"));
        assert!(screen.contains("0 articles on the shelves."));

        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn add_article_flow_inserts_and_acknowledges() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        fill_form(
            &mut app,
            [
                "Goblin Camp",
                "A small raiding outpost.",
                "Location",
                "encounter,forest",
                "",
            ],
        );
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Acknowledging(_)));
        assert!(render(&app).contains("Article added successfully!"));
        assert_eq!(app.article_count, 1);
        assert_eq!(status_text(&app), Some("Added Goblin Camp [Location]."));

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, Mode::Normal));
        assert!(render(&app).contains("1 article on the shelves."));

        let stored = search_articles(&app.conn, "").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Goblin Camp");
        assert_eq!(stored[0].tags.as_deref(), Some("encounter,forest"));
        assert_eq!(stored[0].image_path, None);
    }

    #[test]
    fn add_article_stores_field_values_as_typed() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        fill_form(
            &mut app,
            [
                "Goblin Camp",
                "A small raiding outpost.",
                "Location",
                "  encounter, forest  ",
                "camp .png ",
            ],
        );
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, Mode::Acknowledging(_)));

        let stored = search_articles(&app.conn, "goblin").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].tags.as_deref(), Some("  encounter, forest  "));
        assert_eq!(stored[0].image_path.as_deref(), Some("camp .png "));
        assert_eq!(stored[0].image(), Some("camp .png "));
    }

    #[test]
    fn oversized_input_draws_without_overflow() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        if let Mode::Searching(screen) = &mut app.mode {
            screen.query = "x".repeat(70_000);
        }
        assert!(render(&app).contains("Search: xxx"));

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('a'));
        if let Mode::AddingArticle(screen) = &mut app.mode {
            screen.form.title = "y".repeat(70_000);
        }
        assert!(render(&app).contains("Title:"));
        assert_eq!(cursor_column(10, 70_000), u16::MAX);
        assert_eq!(cursor_column(2, 8), 10);
    }

    #[test]
    fn add_article_with_missing_fields_stays_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "Only a title");
        press(&mut app, KeyCode::Enter);

        let screen = add_screen(&app);
        assert_eq!(
            screen.form.error.as_deref(),
            Some("Content and Category are required.")
        );
        assert_eq!(count_articles(&app.conn).unwrap(), 0);
    }

    #[test]
    fn closing_add_screen_discards_the_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        fill_form(&mut app, ["t", "c", "k", "", ""]);
        press(&mut app, KeyCode::Esc);

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(status_text(&app), Some("Add article cancelled."));
        assert_eq!(count_articles(&app.conn).unwrap(), 0);
    }

    #[test]
    fn insert_failure_is_reported_in_the_form() {
        let mut app = app();
        app.conn.execute("DROP TABLE articles", []).unwrap();
        press(&mut app, KeyCode::Char('a'));
        fill_form(&mut app, ["t", "c", "k", "", ""]);
        press(&mut app, KeyCode::Enter);

        let error = add_screen(&app).form.error.clone().unwrap();
        assert!(error.contains("no such table"));
        assert_eq!(status_text(&app), Some(error.as_str()));
    }

    #[test]
    fn search_finds_goblin_camp() {
        let mut app = app();
        insert_article(
            &app.conn,
            &NewArticle::new("Goblin Camp", "A small raiding outpost.", "Location")
                .with_tags("encounter,forest"),
        )
        .unwrap();
        insert_article(&app.conn, &NewArticle::new("Towermourne", "The city.", "City")).unwrap();

        press(&mut app, KeyCode::Char('s'));
        type_str(&mut app, "goblin");
        press(&mut app, KeyCode::Enter);

        let screen = search_screen(&app);
        assert_eq!(screen.results.len(), 1);
        assert_eq!(screen.results[0].title, "Goblin Camp");
        assert_eq!(screen.tags, "Tags: encounter,forest");

        let rendered = render(&app);
        assert!(rendered.contains("Title: Goblin Camp"));
        assert!(rendered.contains("Category: Location"));
        assert!(rendered.contains("Tags: encounter,forest"));
    }

    #[test]
    fn search_on_empty_store_renders_no_results() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "anything");
        press(&mut app, KeyCode::Enter);

        assert!(search_screen(&app).results.is_empty());
        assert!(render(&app).contains("No results found."));
    }

    #[test]
    fn typing_in_search_never_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        type_str(&mut app, "quest");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(search_screen(&app).query, "ques");

        assert!(!press(&mut app, KeyCode::Esc));
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn resubmitting_replaces_previous_results() {
        let mut app = app();
        insert_article(&app.conn, &NewArticle::new("Goblin Camp", "outpost", "Location")).unwrap();

        press(&mut app, KeyCode::Char('s'));
        type_str(&mut app, "goblin");
        press(&mut app, KeyCode::Enter);
        assert_eq!(search_screen(&app).results.len(), 1);

        type_str(&mut app, "zzz");
        press(&mut app, KeyCode::Enter);
        let screen = search_screen(&app);
        assert!(screen.results.is_empty());
        assert_eq!(screen.lines, vec![ResultLine::NoResults]);
        assert_eq!(screen.tags, "");
    }

    #[test]
    fn search_failure_clears_results_and_sets_status() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        app.conn.execute("DROP TABLE articles", []).unwrap();
        press(&mut app, KeyCode::Enter);

        assert!(search_screen(&app).lines.is_empty());
        assert!(status_text(&app).unwrap().contains("no such table"));
    }

    #[test]
    fn ctrl_o_without_preview_reports_missing_image() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        app.handle_ctrl_o().unwrap();
        assert_eq!(status_text(&app), Some("No image to open."));
    }

    #[test]
    fn file_browser_fills_image_path() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("camp.png");
        std::fs::write(&image, b"").unwrap();

        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        for _ in 0..4 {
            press(&mut app, KeyCode::Tab);
        }
        type_str(&mut app, &dir.path().join("placeholder").display().to_string());

        app.handle_ctrl_o().unwrap();
        assert!(add_screen(&app).browser.is_some());
        assert!(render(&app).contains("camp.png"));

        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Enter);

        let screen = add_screen(&app);
        assert!(screen.browser.is_none());
        assert_eq!(screen.form.image_path, image.display().to_string());
    }

    #[test]
    fn escape_closes_only_the_file_browser() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "Title");
        app.handle_ctrl_o().unwrap();
        press(&mut app, KeyCode::Esc);

        let screen = add_screen(&app);
        assert!(screen.browser.is_none());
        assert_eq!(screen.form.title, "Title");
    }
}
