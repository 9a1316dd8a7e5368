// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod tracker;
pub mod util;

pub use error::{Result, TrackerError};
pub use history::{FileHistoryStore, HistoryRecord, HistoryStore, MemoryHistoryStore};
pub use session::{Mode, Session, Status, Tick};
pub use tracker::Tracker;
