pub mod cli;
pub mod config;
pub mod models;
pub mod stats;
pub mod storage;
pub mod store;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use models::{AppState, CalendarEvent, Goal, StudySession, Subject, Task};
pub use storage::Storage;
pub use store::{Action, DispatchOutcome, Store};
pub use utils::Profile;
