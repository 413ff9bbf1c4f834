//! Remote schedule store: the interface the engine's wire records are
//! persisted through, with an HTTP client and an in-memory implementation.

pub mod error;
pub mod http;
pub mod memory;
pub mod store;

pub use error::{RemoteError, RemoteResult};
pub use http::HttpScheduleStore;
pub use memory::MemoryScheduleStore;
pub use store::ScheduleStore;
