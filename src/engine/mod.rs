//! Episode execution: path recording, the episode state machine, and
//! the stock run observers.

pub mod observers;
pub mod path;
pub mod runner;

pub use observers::{JsonlTraceObserver, MetricsObserver, ProgressObserver};
pub use path::{Path, Transition};
pub use runner::{EpisodeRunner, EpisodeSummary, RunConfig, RunSummary, Terminal, UpdateMode};
