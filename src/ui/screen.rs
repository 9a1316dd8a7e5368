use ratatui::Frame;
use studytrack::HistoryStore;

use crate::{ui::history::render_history, App, AppState};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen<S: HistoryStore> {
    fn render(&self, app: &mut App<S>, f: &mut Frame);
}

/// Clock screen - renders the stopwatch/timer using the App widget
pub struct ClockScreen;

impl<S: HistoryStore> Screen<S> for ClockScreen {
    fn render(&self, app: &mut App<S>, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// History screen - per-day totals table
pub struct HistoryScreen;

impl<S: HistoryStore> Screen<S> for HistoryScreen {
    fn render(&self, app: &mut App<S>, f: &mut Frame) {
        render_history(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen<S: HistoryStore + 'static>(state: &AppState) -> Box<dyn Screen<S>> {
    match state {
        AppState::Clock => Box::new(ClockScreen),
        AppState::History => Box::new(HistoryScreen),
    }
}
