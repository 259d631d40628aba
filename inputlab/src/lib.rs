pub mod catalog;
pub mod confirm;
pub mod console;
pub mod detect;
pub mod display;
pub mod error;
pub mod history;
pub mod input;
pub mod pad;
pub mod player;
pub mod poll;
pub mod press_log;
pub mod settings;
pub mod trace;
pub mod tracker;

pub use catalog::{ActionKind, ActionType, CATALOG};
pub use console::ConsoleLog;
pub use display::{BaseLink, DisplayRow};
pub use error::{SettingsError, TraceError};
pub use history::{ActionEntry, ActionHistory};
pub use pad::{PadStatus, RawPadStatus};
pub use player::{ActionState, PlayerState};
pub use poll::{PollRange, PollRecorder};
pub use press_log::{PressEvent, PressLog};
pub use settings::{SettingsStore, TrackerSettings};
pub use trace::SessionTrace;
pub use tracker::ActionTracker;
