//! Application controller: drives a [`Session`] and hands finished runs to a
//! [`HistoryStore`].

use chrono::NaiveDate;
use tracing::info;

use crate::error::Result;
use crate::history::{local_today, HistoryRecord, HistoryStore};
use crate::session::{Mode, Session, Status, Tick};

pub struct Tracker<S: HistoryStore> {
    session: Session,
    store: S,
    today: fn() -> NaiveDate,
}

impl<S: HistoryStore> Tracker<S> {
    pub fn new(session: Session, store: S) -> Self {
        Self::with_clock(session, store, local_today)
    }

    /// Tracker whose notion of "today" comes from `today`.
    pub fn with_clock(session: Session, store: S, today: fn() -> NaiveDate) -> Self {
        Self {
            session,
            store,
            today,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    pub fn status(&self) -> Status {
        self.session.status()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn current_display(&self) -> String {
        self.session.current_display()
    }

    pub fn start(&mut self) -> bool {
        self.session.start()
    }

    pub fn pause(&mut self) -> bool {
        self.session.pause()
    }

    pub fn set_target_minutes(&mut self, minutes: u32) -> Result<()> {
        self.session.set_target_minutes(minutes)
    }

    /// Stop the run and record it. Returns today's new total when something
    /// was recorded.
    pub fn stop(&mut self) -> Result<Option<u64>> {
        let elapsed = self.session.stop();
        self.record(elapsed)
    }

    /// Advance one second; a countdown that reaches zero is recorded.
    pub fn tick(&mut self) -> Result<Tick> {
        let tick = self.session.tick();
        if let Tick::Completed(elapsed) = tick {
            info!(elapsed, "timer finished");
            self.record(Some(elapsed))?;
        }
        Ok(tick)
    }

    /// Switch mode, recording a run of the previous mode that was still going.
    pub fn switch_mode(&mut self, mode: Mode) -> Result<Option<u64>> {
        let elapsed = self.session.switch_mode(mode);
        self.record(elapsed)
    }

    pub fn history(&self) -> Result<HistoryRecord> {
        self.store.load()
    }

    pub fn today_total(&self) -> Result<u64> {
        Ok(self.store.load()?.on((self.today)()))
    }

    fn record(&self, elapsed: Option<u64>) -> Result<Option<u64>> {
        match elapsed {
            Some(seconds) => self.store.record_session_on((self.today)(), seconds),
            None => Ok(None),
        }
    }
}
