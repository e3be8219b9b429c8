pub mod client;
pub mod error;
pub mod sync;

pub use client::{LotClient, LotSource};
pub use error::{FetchError, SchedulerError};
pub use sync::{run_cycle, PollScheduler, SchedulerState, Snapshot, SyncStatus};
