//! Schedule service: validation, persistence and agenda building on top of a
//! [`ScheduleStore`](cilt_store::ScheduleStore).

pub mod error;
pub mod schedule;
pub mod service;

pub use error::{ServiceError, ServiceResult};
pub use schedule::{AgendaEntry, Schedule};
pub use service::ScheduleService;
