use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, warn};

use crate::error::Result;
use crate::persistence::{PersistenceManager, SaveOutcome};
use crate::session::Session;
use crate::store::{AddOutcome, TaskStore};

use super::view;

const EVENT_POLL_MS: u64 = 120;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    List,
    Input,
    LoadPicker,
}

/// Save file names offered by the load picker.
///
/// Names stay listed across openings; reopening only appends names that are
/// not already present.
#[derive(Debug, Default)]
pub(crate) struct LoadPicker {
    pub(crate) files: Vec<String>,
    pub(crate) selected: usize,
}

impl LoadPicker {
    fn extend(&mut self, names: Vec<String>) {
        for name in names {
            if !self.files.contains(&name) {
                self.files.push(name);
            }
        }
        if self.selected >= self.files.len() {
            self.selected = 0;
        }
    }

    fn move_by(&mut self, delta: isize) {
        if self.files.is_empty() {
            return;
        }
        let max = self.files.len() as isize - 1;
        self.selected = (self.selected as isize + delta).clamp(0, max) as usize;
    }

    pub(crate) fn selected_file(&self) -> Option<&str> {
        self.files.get(self.selected).map(String::as_str)
    }
}

pub struct AppState {
    pub(crate) store: TaskStore,
    pub(crate) mode: Mode,
    pub(crate) input: String,
    pub(crate) picker: LoadPicker,
    status: Option<(String, StatusKind)>,
    session: Session,
    persistence: PersistenceManager,
    today: Option<NaiveDate>,
}

impl AppState {
    pub(crate) fn new(
        store: TaskStore,
        session: Session,
        persistence: PersistenceManager,
        today: Option<NaiveDate>,
    ) -> Self {
        Self {
            store,
            mode: Mode::List,
            input: String::new(),
            picker: LoadPicker::default(),
            status: None,
            session,
            persistence,
            today,
        }
    }

    pub(crate) fn status_line(&self) -> Option<(&str, StatusKind)> {
        self.status
            .as_ref()
            .map(|(message, kind)| (message.as_str(), *kind))
    }

    pub(crate) fn footer_hint(&self) -> &'static str {
        match self.mode {
            Mode::List => {
                "a add  j/k move  c complete  d delete  X clear  s save  l load  q quit"
            }
            Mode::Input => "enter add  esc cancel",
            Mode::LoadPicker => "j/k move  enter load  esc cancel",
        }
    }

    pub(crate) fn count_summary(&self) -> String {
        format!(
            "{} pending  {} completed",
            self.store.pending().len(),
            self.store.completed_unique().len()
        )
    }

    fn set_info(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), StatusKind::Info));
    }

    fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(%message, "task list action failed");
        self.status = Some((message, StatusKind::Error));
    }

    /// Apply a key press. Returns `true` when the UI should exit.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.mode {
            Mode::Input => {
                self.handle_input_key(key);
                false
            }
            Mode::LoadPicker => {
                self.handle_picker_key(key);
                false
            }
            Mode::List => self.handle_list_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('a') | KeyCode::Char('i') => {
                self.mode = Mode::Input;
                self.status = None;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('c') | KeyCode::Char(' ') => self.complete_selected(),
            KeyCode::Char('X') => {
                self.store.clear_all();
                self.set_info("cleared all tasks");
            }
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('l') => self.open_load_picker(),
            _ => {}
        }
        false
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.input);
                match self.store.add_task(&text) {
                    AddOutcome::Added { index } => {
                        self.set_info(format!("added task {}", index + 1));
                    }
                    AddOutcome::Ignored => self.set_info("empty task ignored"),
                }
                self.mode = Mode::List;
            }
            KeyCode::Esc => {
                self.input.clear();
                self.mode = Mode::List;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) => self.input.push(ch),
            _ => {}
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.picker.move_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.picker.move_by(-1),
            KeyCode::Enter => {
                let Some(file) = self.picker.selected_file().map(str::to_string) else {
                    self.mode = Mode::List;
                    return;
                };
                match self.persistence.load_into(&file, &mut self.store) {
                    Ok(()) => self.set_info(format!("loaded {file}")),
                    Err(err) => self.set_error(err.to_string()),
                }
                self.mode = Mode::List;
            }
            KeyCode::Esc | KeyCode::Char('q') => self.mode = Mode::List,
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.store.pending().len();
        if len == 0 {
            return;
        }
        let target = (self.store.selected() as isize + delta).clamp(0, len as isize - 1);
        if let Err(err) = self.store.select(target as usize) {
            self.set_error(err.to_string());
        }
    }

    fn delete_selected(&mut self) {
        match self.store.delete_task(self.store.selected()) {
            Ok(Some(task)) => self.set_info(format!("deleted '{task}'")),
            Ok(None) => self.set_info("no pending tasks"),
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn complete_selected(&mut self) {
        match self.store.complete_task(self.store.selected()) {
            Ok(Some(task)) => self.set_info(format!("completed '{task}'")),
            Ok(None) => self.set_info("no pending tasks"),
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn save(&mut self) {
        let today = self
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        match self.persistence.save(&self.store, today) {
            Ok(SaveOutcome::Saved { name, .. }) => self.set_info(format!("saved {name}")),
            Ok(SaveOutcome::NothingToSave) => self.set_info("No Task Entries"),
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn open_load_picker(&mut self) {
        match self.persistence.list_save_files() {
            Ok(files) => {
                self.picker.extend(files);
                if self.picker.files.is_empty() {
                    self.set_info("no save files");
                    return;
                }
                self.mode = Mode::LoadPicker;
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn store_session(&self) -> Result<()> {
        self.session.store(&self.store)
    }
}

pub fn run(
    store: TaskStore,
    session: Session,
    persistence: PersistenceManager,
    today: Option<NaiveDate>,
) -> Result<()> {
    let mut app = AppState::new(store, session, persistence, today);
    let result = run_terminal(&mut app);
    finish(&app, result)
}

/// Store the session whatever the terminal loop returned, then report the
/// loop's error first.
fn finish(app: &AppState, result: Result<()>) -> Result<()> {
    debug!(ok = result.is_ok(), "task list closed; storing session");
    let stored = app.store_session();
    result.and(stored)
}

fn run_terminal(app: &mut AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
    Ok(())
}
