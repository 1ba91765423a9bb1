//! Ratatui front-end wired to the remote search service.
//!
//! The draw/input loop is synchronous; searches run as tokio tasks and report back over a
//! channel that is drained on every tick.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use ratatui::backend::TestBackend;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::crossterm::{ExecutableCommand, execute};
use ratatui::prelude::*;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::model::types::SearchResponse;
use crate::search::client::{SearchBackend, SearchError};
use crate::search::tracker::SearchTicket;
use crate::session::FileSessionStore;
use crate::ui::Alert;
use crate::ui::components::theme::ThemePalette;
use crate::ui::components::widgets::{
    ResultsFocus, render_alert, render_detail, render_home, render_results,
};
use crate::ui::detail::DetailView;
use crate::ui::form::SearchForm;
use crate::ui::nav::Route;
use crate::ui::results::{ResultsView, SearchOutcome};

/// Completed searches coming back from worker tasks.
#[derive(Debug)]
pub enum Msg {
    Form {
        ticket: SearchTicket,
        result: Result<SearchResponse, SearchError>,
    },
    Results {
        id: u64,
        result: Result<SearchResponse, SearchError>,
    },
}

enum Screen {
    Home,
    Results,
    Detail(Box<DetailView>),
}

pub struct App<B> {
    config: ClientConfig,
    backend: B,
    runtime: Handle,
    tx: UnboundedSender<Msg>,
    screen: Screen,
    form: SearchForm,
    results: Option<ResultsView<FileSessionStore>>,
    cursor: usize,
    focus: ResultsFocus,
    alert: Option<Alert>,
    detail_scroll: u16,
    dark: bool,
    quit: bool,
}

impl<B> App<B>
where
    B: SearchBackend + Clone + 'static,
{
    pub fn new(config: ClientConfig, backend: B, runtime: Handle) -> (Self, UnboundedReceiver<Msg>) {
        let (tx, rx) = unbounded_channel();
        let app = Self {
            config,
            backend,
            runtime,
            tx,
            screen: Screen::Home,
            form: SearchForm::new(),
            results: None,
            cursor: 0,
            focus: ResultsFocus::Query,
            alert: None,
            detail_scroll: 0,
            dark: true,
            quit: false,
        };
        (app, rx)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn results(&self) -> Option<&ResultsView<FileSessionStore>> {
        self.results.as_ref()
    }

    pub fn form_mut(&mut self) -> &mut SearchForm {
        &mut self.form
    }

    pub fn screen_name(&self) -> &'static str {
        match self.screen {
            Screen::Home => "home",
            Screen::Results => "results",
            Screen::Detail(_) => "detail",
        }
    }

    pub fn navigate(&mut self, route: Route) {
        match route {
            Route::Home => {
                debug!("route: home");
                self.screen = Screen::Home;
            }
            Route::Results(nav) => {
                debug!(from_nav = nav.is_some(), "route: results");
                let store = FileSessionStore::new(self.config.session_path());
                self.results = Some(ResultsView::initialize(
                    store,
                    self.config.category_match,
                    nav,
                ));
                self.cursor = 0;
                self.focus = if self.results.as_ref().is_some_and(|v| !v.results().is_empty()) {
                    ResultsFocus::List
                } else {
                    ResultsFocus::Query
                };
                self.screen = Screen::Results;
            }
            Route::Detail(detail) => {
                debug!(title = %detail.title(), "route: detail");
                self.detail_scroll = 0;
                self.screen = Screen::Detail(detail);
            }
        }
    }

    pub fn handle_msg(&mut self, msg: Msg) {
        match msg {
            Msg::Form { ticket, result } => match self.form.finish(&ticket, result) {
                Ok(Some(route)) => self.navigate(route),
                Ok(None) => {}
                Err(alert) => self.alert = Some(alert),
            },
            Msg::Results { id, result } => {
                let Some(view) = self.results.as_mut() else {
                    return;
                };
                match view.finish_search(id, result) {
                    SearchOutcome::Applied => {
                        self.cursor = 0;
                        self.focus = ResultsFocus::List;
                    }
                    SearchOutcome::Failed(alert) => {
                        view.dismiss_alert();
                        self.alert = Some(alert);
                    }
                    SearchOutcome::Stale => {}
                }
            }
        }
    }

    fn spawn_form_search(&mut self) {
        match self.form.submit() {
            Ok(ticket) => {
                let backend = self.backend.clone();
                let tx = self.tx.clone();
                self.runtime.spawn(async move {
                    let result = backend.search(&ticket.request).await;
                    let _ = tx.send(Msg::Form { ticket, result });
                });
            }
            Err(alert) => self.alert = Some(alert),
        }
    }

    fn spawn_results_search(&mut self) {
        let Some(view) = self.results.as_mut() else {
            return;
        };
        match view.begin_search() {
            Ok(ticket) => {
                let backend = self.backend.clone();
                let tx = self.tx.clone();
                self.runtime.spawn(async move {
                    let result = backend.search(&ticket.request).await;
                    let _ = tx.send(Msg::Results {
                        id: ticket.id,
                        result,
                    });
                });
            }
            Err(alert) => {
                view.dismiss_alert();
                self.alert = Some(alert);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.alert = None;
            }
            return;
        }
        if key.code == KeyCode::F(2) {
            self.dark = !self.dark;
            return;
        }
        match self.screen {
            Screen::Home => self.handle_home_key(key),
            Screen::Results => self.handle_results_key(key),
            Screen::Detail(_) => self.handle_detail_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Enter => self.spawn_form_search(),
            KeyCode::Left => self.form.method = self.form.method.prev(),
            KeyCode::Right | KeyCode::Tab => self.form.method = self.form.method.next(),
            KeyCode::F(5) => self.navigate(Route::Results(None)),
            KeyCode::Backspace => {
                self.form.query.pop();
            }
            KeyCode::Char(c) => self.form.query.push(c),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        let Some(view) = self.results.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.navigate(Route::Home);
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    ResultsFocus::Query => ResultsFocus::List,
                    ResultsFocus::List => ResultsFocus::Query,
                };
                return;
            }
            KeyCode::F(3) => {
                view.set_method(view.method().next());
                return;
            }
            KeyCode::F(4) => {
                let next = next_category(&view.categories(), view.selected_category());
                view.filter_by_category(&next);
                self.cursor = 0;
                return;
            }
            _ => {}
        }

        match self.focus {
            ResultsFocus::Query => match key.code {
                KeyCode::Enter => self.spawn_results_search(),
                KeyCode::Backspace => {
                    let mut q = view.query().to_string();
                    q.pop();
                    view.set_query(q);
                }
                KeyCode::Char(c) => {
                    let mut q = view.query().to_string();
                    q.push(c);
                    view.set_query(q);
                }
                _ => {}
            },
            ResultsFocus::List => match key.code {
                KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
                KeyCode::Down => {
                    let len = view.page_items().len();
                    if self.cursor + 1 < len {
                        self.cursor += 1;
                    }
                }
                KeyCode::Left | KeyCode::PageUp => {
                    if view.paginate(view.page().saturating_sub(1)) {
                        self.cursor = 0;
                    }
                }
                KeyCode::Right | KeyCode::PageDown => {
                    if view.paginate(view.page() + 1) {
                        self.cursor = 0;
                    }
                }
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    let page = c.to_digit(10).unwrap_or(0) as usize;
                    if view.paginate(page) {
                        self.cursor = 0;
                    }
                }
                KeyCode::Enter => {
                    if let Some(detail) = view.open_detail(self.cursor) {
                        self.navigate(Route::Detail(Box::new(detail)));
                    }
                }
                _ => {}
            },
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => {
                let screen = std::mem::replace(&mut self.screen, Screen::Home);
                if let Screen::Detail(detail) = screen {
                    self.navigate(detail.back());
                }
            }
            KeyCode::Char('h') => self.navigate(Route::Home),
            KeyCode::Up => self.detail_scroll = self.detail_scroll.saturating_sub(1),
            KeyCode::Down => self.detail_scroll = self.detail_scroll.saturating_add(1),
            KeyCode::PageUp => self.detail_scroll = self.detail_scroll.saturating_sub(10),
            KeyCode::PageDown => self.detail_scroll = self.detail_scroll.saturating_add(10),
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let palette = if self.dark {
            ThemePalette::dark()
        } else {
            ThemePalette::light()
        };
        let area = frame.area();
        match &self.screen {
            Screen::Home => render_home(frame, area, &self.form, palette),
            Screen::Results => {
                if let Some(view) = &self.results {
                    render_results(frame, area, view, self.cursor, self.focus, palette);
                }
            }
            Screen::Detail(detail) => render_detail(frame, area, detail, self.detail_scroll, palette),
        }
        if let Some(alert) = &self.alert {
            render_alert(frame, alert, palette);
        }
    }
}

/// Cycles "" → first → … → last → "".
pub fn next_category(categories: &[String], current: &str) -> String {
    if current.is_empty() {
        return categories.first().cloned().unwrap_or_default();
    }
    match categories.iter().position(|c| c == current) {
        Some(idx) => categories.get(idx + 1).cloned().unwrap_or_default(),
        None => String::new(),
    }
}

/// Render the current screen into an off-screen buffer, one string per row.
pub fn render_to_lines<B>(app: &App<B>, width: u16, height: u16) -> Result<Vec<String>>
where
    B: SearchBackend + Clone + 'static,
{
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    terminal.draw(|f| app.draw(f))?;
    let buffer = terminal.backend().buffer();
    Ok(buffer
        .content()
        .chunks(width as usize)
        .map(|row| {
            row.iter()
                .map(|cell| cell.symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect())
}

pub fn run_tui<B>(config: ClientConfig, backend: B, once: bool) -> Result<()>
where
    B: SearchBackend + Clone + 'static,
{
    if once
        && std::env::var("TUI_HEADLESS")
            .map(|v| v == "1")
            .unwrap_or(false)
    {
        return run_tui_headless(config, backend);
    }

    let runtime = Handle::try_current().context("tui requires a tokio runtime")?;
    let (mut app, mut rx) = App::new(config, backend, runtime);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    info!("tui started");

    let result = event_loop(&mut terminal, &mut app, &mut rx);
    teardown_terminal()?;
    info!("tui stopped");
    result
}

fn event_loop<B, W>(
    terminal: &mut Terminal<CrosstermBackend<W>>,
    app: &mut App<B>,
    rx: &mut UnboundedReceiver<Msg>,
) -> Result<()>
where
    B: SearchBackend + Clone + 'static,
    W: io::Write,
{
    let tick_rate = Duration::from_millis(50);
    let mut needs_draw = true;

    loop {
        if needs_draw {
            terminal.draw(|f| app.draw(f))?;
            needs_draw = false;
        }

        while let Ok(msg) = rx.try_recv() {
            app.handle_msg(msg);
            needs_draw = true;
        }

        if app.should_quit() {
            return Ok(());
        }

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                    needs_draw = true;
                }
                Event::Resize(_, _) => needs_draw = true,
                _ => {}
            }
        }
    }
}

fn run_tui_headless<B>(config: ClientConfig, backend: B) -> Result<()>
where
    B: SearchBackend + Clone + 'static,
{
    let runtime = Handle::try_current().context("tui requires a tokio runtime")?;
    let (mut app, _rx) = App::new(config, backend, runtime);
    app.navigate(Route::Results(None));
    for line in render_to_lines(&app, 120, 32)? {
        println!("{line}");
    }
    Ok(())
}

fn teardown_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;
    Ok(())
}
