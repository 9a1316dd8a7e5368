use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::util::{format_hms, SECS_PER_MINUTE};

pub const MIN_TARGET_MINUTES: u32 = 1;
pub const MAX_TARGET_MINUTES: u32 = 720;
pub const DEFAULT_TARGET_MINUTES: u32 = 30;

/// Which clock the session is driving
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Stopwatch,
    Timer,
}

impl Mode {
    pub fn other(self) -> Mode {
        match self {
            Mode::Stopwatch => Mode::Timer,
            Mode::Timer => Mode::Stopwatch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Status {
    Idle,
    Running,
    Paused,
}

/// Result of advancing the session by one second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The session was not running; nothing changed.
    Ignored,
    Advanced,
    /// The countdown reached zero and the run ended with this many seconds studied.
    Completed(u64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Stopwatch {
    elapsed_seconds: u64,
    active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Countdown {
    remaining_seconds: u64,
    target_seconds: u64,
    active: bool,
}

impl Countdown {
    fn elapsed(&self) -> u64 {
        self.target_seconds.saturating_sub(self.remaining_seconds)
    }
}

/// Stopwatch/timer state machine. Advanced by an external one-second driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    mode: Mode,
    stopwatch: Stopwatch,
    countdown: Countdown,
    target_minutes: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            stopwatch: Stopwatch::default(),
            countdown: Countdown::default(),
            target_minutes: DEFAULT_TARGET_MINUTES,
        }
    }
}

pub fn validate_target_minutes(minutes: u32) -> Result<u32> {
    if (MIN_TARGET_MINUTES..=MAX_TARGET_MINUTES).contains(&minutes) {
        Ok(minutes)
    } else {
        Err(TrackerError::InvalidConfiguration {
            minutes,
            min: MIN_TARGET_MINUTES,
            max: MAX_TARGET_MINUTES,
        })
    }
}

impl Session {
    pub fn new(mode: Mode, target_minutes: u32) -> Result<Self> {
        Ok(Self {
            mode,
            target_minutes: validate_target_minutes(target_minutes)?,
            ..Self::default()
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn target_minutes(&self) -> u32 {
        self.target_minutes
    }

    pub fn is_active(&self) -> bool {
        match self.mode {
            Mode::Stopwatch => self.stopwatch.active,
            Mode::Timer => self.countdown.active,
        }
    }

    pub fn status(&self) -> Status {
        if self.is_active() {
            return Status::Running;
        }
        let has_progress = match self.mode {
            Mode::Stopwatch => self.stopwatch.elapsed_seconds > 0,
            Mode::Timer => self.countdown.remaining_seconds > 0,
        };
        if has_progress {
            Status::Paused
        } else {
            Status::Idle
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.stopwatch.elapsed_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.countdown.remaining_seconds
    }

    pub fn target_seconds(&self) -> u64 {
        self.countdown.target_seconds
    }

    /// Fraction of the current timer run already studied, if a run is loaded.
    pub fn progress(&self) -> Option<f64> {
        match self.mode {
            Mode::Timer if self.countdown.target_seconds > 0 => {
                Some(self.countdown.elapsed() as f64 / self.countdown.target_seconds as f64)
            }
            _ => None,
        }
    }

    /// Select the length of the next fresh timer run.
    ///
    /// A run already loaded keeps its target until it is stopped.
    pub fn set_target_minutes(&mut self, minutes: u32) -> Result<()> {
        self.target_minutes = validate_target_minutes(minutes)?;
        debug!(minutes, "timer target selected");
        Ok(())
    }

    /// Begin or resume. Returns false when already running.
    pub fn start(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        match self.mode {
            Mode::Stopwatch => self.stopwatch.active = true,
            Mode::Timer => {
                if self.countdown.remaining_seconds == 0 {
                    let target = u64::from(self.target_minutes) * SECS_PER_MINUTE;
                    self.countdown.target_seconds = target;
                    self.countdown.remaining_seconds = target;
                }
                self.countdown.active = true;
            }
        }
        debug!(mode = %self.mode, display = %self.current_display(), "session started");
        true
    }

    /// Halt without recording. Returns false when not running.
    pub fn pause(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        match self.mode {
            Mode::Stopwatch => self.stopwatch.active = false,
            Mode::Timer => self.countdown.active = false,
        }
        debug!(mode = %self.mode, display = %self.current_display(), "session paused");
        true
    }

    /// End the current run and reset the counters of the current mode.
    ///
    /// Returns the seconds studied when the session was running, `None` when
    /// it was idle or paused (a paused run is discarded, not recorded).
    pub fn stop(&mut self) -> Option<u64> {
        let elapsed = match self.mode {
            Mode::Stopwatch if self.stopwatch.active => Some(self.stopwatch.elapsed_seconds),
            Mode::Timer if self.countdown.active => Some(self.countdown.elapsed()),
            _ => None,
        };
        self.reset(self.mode);
        debug!(mode = %self.mode, ?elapsed, "session stopped");
        elapsed
    }

    /// Advance one second. Ticks while inactive are ignored.
    pub fn tick(&mut self) -> Tick {
        if !self.is_active() {
            return Tick::Ignored;
        }
        match self.mode {
            Mode::Stopwatch => {
                self.stopwatch.elapsed_seconds += 1;
                Tick::Advanced
            }
            Mode::Timer => {
                self.countdown.remaining_seconds = self.countdown.remaining_seconds.saturating_sub(1);
                if self.countdown.remaining_seconds == 0 {
                    Tick::Completed(self.stop().unwrap_or_default())
                } else {
                    Tick::Advanced
                }
            }
        }
    }

    /// Change mode. A running session of the previous mode is stopped first and
    /// its elapsed seconds returned for recording; the previous mode's counters
    /// are cleared either way.
    pub fn switch_mode(&mut self, mode: Mode) -> Option<u64> {
        if mode == self.mode {
            return None;
        }
        let recorded = if self.is_active() { self.stop() } else { None };
        self.reset(self.mode);
        debug!(from = %self.mode, to = %mode, "mode switched");
        self.mode = mode;
        recorded
    }

    /// `HH:MM:SS` of the counter that belongs to the current mode.
    pub fn current_display(&self) -> String {
        match self.mode {
            Mode::Stopwatch => format_hms(self.stopwatch.elapsed_seconds),
            Mode::Timer => format_hms(self.countdown.remaining_seconds),
        }
    }

    fn reset(&mut self, mode: Mode) {
        match mode {
            Mode::Stopwatch => self.stopwatch = Stopwatch::default(),
            Mode::Timer => self.countdown = Countdown::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn timer(minutes: u32) -> Session {
        Session::new(Mode::Timer, minutes).unwrap()
    }

    #[test]
    fn test_default_session_is_idle_stopwatch() {
        let session = Session::default();
        assert_eq!(session.mode(), Mode::Stopwatch);
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.target_minutes(), DEFAULT_TARGET_MINUTES);
        assert_eq!(session.current_display(), "00:00:00");
    }

    #[test]
    fn test_new_rejects_out_of_range_target() {
        assert_matches!(
            Session::new(Mode::Timer, 0),
            Err(TrackerError::InvalidConfiguration { minutes: 0, .. })
        );
        assert_matches!(
            Session::new(Mode::Timer, 721),
            Err(TrackerError::InvalidConfiguration { minutes: 721, .. })
        );
        assert!(Session::new(Mode::Timer, 720).is_ok());
        assert!(Session::new(Mode::Timer, 1).is_ok());
    }

    #[test]
    fn test_set_target_minutes_keeps_previous_on_error() {
        let mut session = timer(10);
        assert!(session.set_target_minutes(0).is_err());
        assert_eq!(session.target_minutes(), 10);
        session.set_target_minutes(45).unwrap();
        assert_eq!(session.target_minutes(), 45);
    }

    #[test]
    fn test_stopwatch_counts_up() {
        let mut session = Session::default();
        assert!(session.start());
        for _ in 0..125 {
            assert_eq!(session.tick(), Tick::Advanced);
        }
        assert_eq!(session.current_display(), "00:02:05");
        assert_eq!(session.stop(), Some(125));
        assert_eq!(session.current_display(), "00:00:00");
        assert_eq!(session.status(), Status::Idle);
    }

    #[test]
    fn test_start_is_noop_when_running() {
        let mut session = Session::default();
        assert!(session.start());
        session.tick();
        assert!(!session.start());
        assert_eq!(session.elapsed_seconds(), 1);
    }

    #[test]
    fn test_pause_keeps_counter_and_ignores_ticks() {
        let mut session = Session::default();
        session.start();
        session.tick();
        session.tick();
        assert!(session.pause());
        assert!(!session.pause());
        assert_eq!(session.status(), Status::Paused);
        assert_eq!(session.tick(), Tick::Ignored);
        assert_eq!(session.current_display(), "00:00:02");

        session.start();
        session.tick();
        assert_eq!(session.stop(), Some(3));
    }

    #[test]
    fn test_stop_while_paused_discards() {
        let mut session = Session::default();
        session.start();
        session.tick();
        session.pause();
        assert_eq!(session.stop(), None);
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[test]
    fn test_stop_when_idle_returns_none() {
        let mut session = timer(5);
        assert_eq!(session.stop(), None);
        assert_eq!(session.current_display(), "00:00:00");
    }

    #[test]
    fn test_timer_loads_target_on_fresh_start() {
        let mut session = timer(5);
        session.start();
        assert_eq!(session.target_seconds(), 300);
        assert_eq!(session.remaining_seconds(), 300);
        assert_eq!(session.current_display(), "00:05:00");
    }

    #[test]
    fn test_timer_resume_keeps_target() {
        let mut session = timer(5);
        session.start();
        session.tick();
        session.pause();
        session.set_target_minutes(10).unwrap();
        session.start();
        assert_eq!(session.target_seconds(), 300);
        assert_eq!(session.remaining_seconds(), 299);
    }

    #[test]
    fn test_timer_completes_on_reaching_zero() {
        let mut session = timer(5);
        session.start();
        for _ in 0..299 {
            assert_eq!(session.tick(), Tick::Advanced);
            assert!(session.remaining_seconds() <= session.target_seconds());
        }
        assert_eq!(session.current_display(), "00:00:01");
        assert_eq!(session.tick(), Tick::Completed(300));
        assert!(!session.is_active());
        assert_eq!(session.current_display(), "00:00:00");
        assert_eq!(session.tick(), Tick::Ignored);
    }

    #[test]
    fn test_timer_manual_stop_reports_elapsed() {
        let mut session = timer(1);
        session.start();
        for _ in 0..17 {
            session.tick();
        }
        assert_eq!(session.stop(), Some(17));
        assert_eq!(session.target_seconds(), 0);
    }

    #[test]
    fn test_timer_progress() {
        let mut session = timer(1);
        assert_eq!(session.progress(), None);
        session.start();
        for _ in 0..30 {
            session.tick();
        }
        assert_eq!(session.progress(), Some(0.5));
    }

    #[test]
    fn test_switch_mode_force_stops_running_session() {
        let mut session = Session::default();
        session.start();
        for _ in 0..42 {
            session.tick();
        }
        assert_eq!(session.switch_mode(Mode::Timer), Some(42));
        assert_eq!(session.mode(), Mode::Timer);
        assert!(!session.is_active());
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[test]
    fn test_switch_mode_clears_paused_previous_mode() {
        let mut session = timer(5);
        session.start();
        session.tick();
        session.pause();
        assert_eq!(session.switch_mode(Mode::Stopwatch), None);
        assert_eq!(session.remaining_seconds(), 0);
        assert_eq!(session.target_seconds(), 0);
        assert_eq!(session.current_display(), "00:00:00");
    }

    #[test]
    fn test_switch_to_same_mode_is_noop() {
        let mut session = Session::default();
        session.start();
        session.tick();
        assert_eq!(session.switch_mode(Mode::Stopwatch), None);
        assert!(session.is_active());
        assert_eq!(session.elapsed_seconds(), 1);
    }

    #[test]
    fn test_mode_other_and_display() {
        assert_eq!(Mode::Stopwatch.other(), Mode::Timer);
        assert_eq!(Mode::Timer.other(), Mode::Stopwatch);
        assert_eq!(Mode::Timer.to_string(), "Timer");
    }
}
