//! Recurrence rule value types.

mod frequency;
mod rule;
mod weekday;

pub use frequency::{FREQUENCY_CODES, FrequencyUnit};
pub use rule::{MonthlySelector, Recurrence, RecurrenceRule, RuleDraft, YearlySelector, validate};
pub use weekday::{Ordinal, Weekday, WeekdaySet};
