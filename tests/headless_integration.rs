use std::fs;
use std::sync::mpsc;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use studytrack::{
    runtime::{AppEvent, FixedTicker, Runner, TestEventSource},
    FileHistoryStore, HistoryStore, Mode, Session, Tick, Tracker,
};

fn exam_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless integration using the internal runtime + Tracker without a TTY.
// Runner ticks stand in for the one-second driver.
#[test]
fn headless_stopwatch_flow_records_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("study_history.json");
    let store = FileHistoryStore::with_path(&path);
    let mut tracker = Tracker::with_clock(Session::default(), store, exam_day);

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(1));
    let runner = Runner::new(es, ticker);

    tx.send(key('s')).unwrap();

    let mut ticks = 0;
    for _ in 0..1000u32 {
        match runner.step() {
            AppEvent::Tick => {
                if tracker.tick().unwrap() == Tick::Advanced {
                    ticks += 1;
                }
                if ticks == 125 {
                    tx.send(key('x')).unwrap();
                }
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => match key.code {
                KeyCode::Char('s') => {
                    tracker.start();
                }
                KeyCode::Char('x') => {
                    tracker.stop().unwrap();
                    break;
                }
                _ => {}
            },
        }
    }

    assert_eq!(tracker.current_display(), "00:00:00");
    assert_eq!(tracker.history().unwrap().on(exam_day()), 125);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "{\n    \"2024-06-03\": 125\n}"
    );
}

#[test]
fn headless_timer_runs_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileHistoryStore::with_path(dir.path().join("study_history.json"));
    let mut tracker = Tracker::with_clock(Session::new(Mode::Timer, 1).unwrap(), store, exam_day);

    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    tracker.start();
    let mut last_display = tracker.current_display();
    let mut finished = None;
    for _ in 0..200u32 {
        if let AppEvent::Tick = runner.step() {
            match tracker.tick().unwrap() {
                Tick::Completed(secs) => {
                    finished = Some(secs);
                    last_display = tracker.current_display();
                    break;
                }
                _ => last_display = tracker.current_display(),
            }
        }
    }

    assert_eq!(finished, Some(60));
    assert_eq!(last_display, "00:00:00");
    assert_eq!(tracker.today_total().unwrap(), 60);
}

#[test]
fn headless_sessions_accumulate_across_trackers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("study_history.json");

    for run in [30u64, 45] {
        let store = FileHistoryStore::with_path(&path);
        let mut tracker = Tracker::with_clock(Session::default(), store, exam_day);
        tracker.start();
        for _ in 0..run {
            tracker.tick().unwrap();
        }
        tracker.stop().unwrap();
    }

    let record = FileHistoryStore::with_path(&path).load().unwrap();
    assert_eq!(record.on(exam_day()), 75);
    assert_eq!(record.len(), 1);
}

#[test]
fn headless_corrupted_history_is_replaced_on_next_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("study_history.json");
    fs::write(&path, "{ definitely not json").unwrap();

    let store = FileHistoryStore::with_path(&path);
    assert!(store.load().unwrap().is_empty());

    let mut tracker = Tracker::with_clock(Session::default(), store, exam_day);
    tracker.start();
    tracker.tick().unwrap();
    tracker.pause();
    // stopping a paused run discards it
    assert_eq!(tracker.stop().unwrap(), None);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ definitely not json");

    tracker.start();
    tracker.tick().unwrap();
    tracker.stop().unwrap();
    assert_eq!(tracker.history().unwrap().on(exam_day()), 1);
}
