//! Recurrence rule engine for CILT sequence schedules.
//!
//! A schedule is described by a [`RecurrenceRule`]: a frequency unit with the
//! selector that unit needs, an interval, a start date (optionally with a time
//! of day) and an optional inclusive end date. The engine offers four pure
//! operations:
//!
//! - [`validate`] turns a form-shaped [`RuleDraft`] into a rule,
//! - [`encode`] / [`decode`] convert between a rule and the remote store's
//!   [`WireRecord`],
//! - [`occurrences`] expands a rule into ascending [`Occurrence`]s within a window.
//!
//! None of them perform I/O or hold state; all are safe to call from any thread.

pub mod error;
pub mod expand;
pub mod export;
pub mod model;
pub mod wire;

pub use error::{
    DecodeError, DecodeErrorKind, DecodeResult, ValidationError, ValidationErrorKind,
    ValidationResult,
};
pub use expand::{Occurrence, Occurrences, next_occurrence, occurrences};
pub use model::{
    FREQUENCY_CODES, FrequencyUnit, MonthlySelector, Ordinal, Recurrence, RecurrenceRule,
    RuleDraft, Weekday, WeekdaySet, YearlySelector, validate,
};
pub use wire::{ScheduleScope, WireRecord, decode, encode};
