mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    time::Instant,
};
use studytrack::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging::init_logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Metronome, Runner, POLL_INTERVAL},
    session::{MAX_TARGET_MINUTES, MIN_TARGET_MINUTES},
    util::{format_hms, step_clamped},
    FileHistoryStore, HistoryStore, Mode, Session, Tick, Tracker, TrackerError,
};
use tracing::{error, info, warn};

/// Minutes per PageUp/PageDown on the clock, rows per page in the history
const PAGE_STEP: i32 = 10;

/// study time tracker with a stopwatch, a countdown timer, and daily history
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Track study time with a stopwatch or a countdown timer. Finished sessions are added to today's total in a local history file."
)]
pub struct Cli {
    /// clock to start with (defaults to the one used last time)
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// countdown length in minutes for timer mode
    #[clap(
        short = 't',
        long,
        value_parser = clap::value_parser!(u32).range(MIN_TARGET_MINUTES as i64..=MAX_TARGET_MINUTES as i64)
    )]
    minutes: Option<u32>,

    /// history file to read and update
    #[clap(long)]
    history_file: Option<PathBuf>,

    /// print the study history and exit
    #[clap(long)]
    print_history: bool,
}

impl Cli {
    /// Command-line values take precedence over the saved config
    fn resolve(&self, config: &Config) -> (Mode, u32, PathBuf) {
        let history_file = self
            .history_file
            .clone()
            .or_else(|| config.history_file.clone())
            .unwrap_or_else(AppDirs::history_path);
        (
            self.mode.unwrap_or(config.mode),
            self.minutes.unwrap_or(config.target_minutes),
            history_file,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Clock,
    History,
}

#[derive(Debug, Default)]
pub struct HistoryState {
    pub scroll_offset: usize,
    pub rows: Vec<(String, u64)>,
    pub total_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Pause,
    Toggle,
    Stop,
    SwitchMode,
    AdjustTarget(i32),
    ToggleHistory,
    Scroll(i32),
    ScrollTop,
    Quit,
}

pub struct App<S: HistoryStore> {
    pub tracker: Tracker<S>,
    pub metronome: Metronome,
    pub state: AppState,
    pub history_state: HistoryState,
    pub today_seconds: u64,
    pub message: Option<String>,
}

impl<S: HistoryStore> App<S> {
    pub fn new(tracker: Tracker<S>) -> Self {
        let mut app = Self {
            tracker,
            metronome: Metronome::default(),
            state: AppState::Clock,
            history_state: HistoryState::default(),
            today_seconds: 0,
            message: None,
        };
        app.refresh_today();
        app
    }

    /// Apply a user action. Returns false when the app should exit.
    pub fn apply(&mut self, action: Action, now: Instant) -> bool {
        match action {
            Action::Start => self.start(now),
            Action::Pause => self.pause(now),
            Action::Toggle => {
                if self.tracker.is_active() {
                    self.pause(now);
                } else {
                    self.start(now);
                }
            }
            Action::Stop => {
                self.on_tick(now);
                self.metronome.stop();
                let result = self.tracker.stop();
                self.after_record(result);
            }
            Action::SwitchMode => {
                self.on_tick(now);
                self.metronome.stop();
                let next = self.tracker.mode().other();
                let result = self.tracker.switch_mode(next);
                self.after_record(result);
            }
            Action::AdjustTarget(delta) => {
                let minutes = step_clamped(
                    self.tracker.session().target_minutes(),
                    delta,
                    MIN_TARGET_MINUTES,
                    MAX_TARGET_MINUTES,
                );
                if let Err(e) = self.tracker.set_target_minutes(minutes) {
                    self.report(&e);
                }
            }
            Action::ToggleHistory => {
                self.state = match self.state {
                    AppState::Clock => {
                        self.refresh_history();
                        AppState::History
                    }
                    AppState::History => AppState::Clock,
                };
            }
            Action::Scroll(delta) => {
                let offset = self.history_state.scroll_offset as i64 + i64::from(delta);
                // upper bound is clamped by the renderer, which knows the table height
                self.history_state.scroll_offset = offset.max(0) as usize;
            }
            Action::ScrollTop => self.history_state.scroll_offset = 0,
            Action::Quit => {
                self.on_tick(now);
                if self.tracker.is_active() {
                    info!("recording running session before exit");
                    self.metronome.stop();
                    let result = self.tracker.stop();
                    self.after_record(result);
                }
                return false;
            }
        }
        true
    }

    /// Run the session ticks that became due. Returns true when anything changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let due = self.metronome.due_ticks(now);
        for _ in 0..due {
            match self.tracker.tick() {
                Ok(Tick::Completed(elapsed)) => {
                    self.metronome.stop();
                    self.message = Some(format!("Timer finished: {} studied", format_hms(elapsed)));
                    self.refresh_today();
                    break;
                }
                Ok(Tick::Ignored) => {
                    self.metronome.stop();
                    break;
                }
                Ok(Tick::Advanced) => {}
                Err(e) => {
                    self.metronome.stop();
                    self.report(&e);
                    break;
                }
            }
        }
        due > 0
    }

    fn start(&mut self, now: Instant) {
        if self.tracker.start() {
            self.metronome.start(now);
            self.message = None;
        }
    }

    /// Seconds already due are counted before the run halts.
    fn pause(&mut self, now: Instant) {
        self.on_tick(now);
        if self.tracker.pause() {
            self.metronome.stop();
        }
    }

    fn after_record(&mut self, result: studytrack::Result<Option<u64>>) {
        match result {
            Ok(Some(total)) => {
                self.today_seconds = total;
                self.message = Some(format!("Saved. Today: {}", format_hms(total)));
                if self.state == AppState::History {
                    self.refresh_history();
                }
            }
            Ok(None) => {}
            Err(e) => self.report(&e),
        }
    }

    fn refresh_today(&mut self) {
        match self.tracker.today_total() {
            Ok(total) => self.today_seconds = total,
            Err(e) => self.report(&e),
        }
    }

    fn refresh_history(&mut self) {
        match self.tracker.history() {
            Ok(record) => {
                self.history_state.rows = record
                    .iter()
                    .map(|(day, secs)| (day.to_string(), secs))
                    .collect();
                self.history_state.total_seconds = record.total_seconds();
            }
            Err(e) => self.report(&e),
        }
    }

    fn report(&mut self, e: &TrackerError) {
        error!(error = %e, "tracker operation failed");
        self.message = Some(format!("Error: {e}"));
    }
}

pub fn action_for(key: KeyEvent, state: &AppState) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match (state, key.code) {
        (_, KeyCode::Esc) | (_, KeyCode::Char('q')) => Some(Action::Quit),
        (_, KeyCode::Char('h')) => Some(Action::ToggleHistory),
        (AppState::Clock, KeyCode::Char('s')) => Some(Action::Start),
        (AppState::Clock, KeyCode::Char('p')) => Some(Action::Pause),
        (AppState::Clock, KeyCode::Char(' ')) => Some(Action::Toggle),
        (AppState::Clock, KeyCode::Char('x')) | (AppState::Clock, KeyCode::Enter) => {
            Some(Action::Stop)
        }
        (AppState::Clock, KeyCode::Char('m')) | (AppState::Clock, KeyCode::Tab) => {
            Some(Action::SwitchMode)
        }
        (AppState::Clock, KeyCode::Up) => Some(Action::AdjustTarget(1)),
        (AppState::Clock, KeyCode::Down) => Some(Action::AdjustTarget(-1)),
        (AppState::Clock, KeyCode::PageUp) => Some(Action::AdjustTarget(PAGE_STEP)),
        (AppState::Clock, KeyCode::PageDown) => Some(Action::AdjustTarget(-PAGE_STEP)),
        (AppState::History, KeyCode::Char('b')) | (AppState::History, KeyCode::Backspace) => {
            Some(Action::ToggleHistory)
        }
        (AppState::History, KeyCode::Up) => Some(Action::Scroll(-1)),
        (AppState::History, KeyCode::Down) => Some(Action::Scroll(1)),
        (AppState::History, KeyCode::PageUp) => Some(Action::Scroll(-PAGE_STEP)),
        (AppState::History, KeyCode::PageDown) => Some(Action::Scroll(PAGE_STEP)),
        (AppState::History, KeyCode::Home) => Some(Action::ScrollTop),
        _ => None,
    }
}

/// Plain-text history table, oldest day first
fn print_history<S: HistoryStore, W: Write>(
    store: &S,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let record = store.load()?;
    if record.is_empty() {
        writeln!(out, "No study sessions recorded yet.")?;
        return Ok(());
    }
    writeln!(out, "{:<12}{}", "Date", "Time Studied")?;
    for (day, studied) in record.rows() {
        writeln!(out, "{day:<12}{studied}")?;
    }
    writeln!(out, "{:<12}{}", "Total", format_hms(record.total_seconds()))?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&AppDirs::log_dir());

    let config_store = FileConfigStore::new();
    let config = config_store.load();
    let (mode, minutes, history_file) = cli.resolve(&config);
    let store = FileHistoryStore::with_path(&history_file);

    if cli.print_history {
        return print_history(&store, &mut io::stdout().lock());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    info!(%mode, minutes, history = %history_file.display(), "starting");
    let mut app = App::new(Tracker::new(Session::new(mode, minutes)?, store));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if let Err(e) = config_store.save(&config.remember(app.tracker.session())) {
        warn!(error = %e, "could not save config");
    }

    outcome
}

fn start_tui<B: Backend, S: HistoryStore + 'static>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(POLL_INTERVAL));

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                if app.on_tick(Instant::now()) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            AppEvent::Key(key) => {
                if let Some(action) = action_for(key, &app.state) {
                    if !app.apply(action, Instant::now()) {
                        break;
                    }
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui<S: HistoryStore + 'static>(app: &mut App<S>, f: &mut Frame) {
    ui::screen::current_screen::<S>(&app.state).render(app, f);
}
