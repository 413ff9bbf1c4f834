//! Agenda window and plain-text rendering.

use anyhow::Context;
use chrono::{Days, Local, NaiveDate};
use cilt_core::types::SequenceId;
use cilt_service::AgendaEntry;

/// Inclusive date window an agenda covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Window {
    /// Window of `horizon_days` days after `from`, `from` included.
    pub fn starting(from: NaiveDate, horizon_days: u32) -> anyhow::Result<Self> {
        let to = from
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .with_context(|| format!("agenda horizon of {horizon_days} days overflows the calendar"))?;
        Ok(Self { from, to })
    }

    pub fn from_today(horizon_days: u32) -> anyhow::Result<Self> {
        Self::starting(Local::now().date_naive(), horizon_days)
    }
}

/// Renders one sequence's agenda, one occurrence per line.
pub fn render(sequence_id: SequenceId, entries: &[AgendaEntry]) -> String {
    let mut out = format!("Sequence {sequence_id}\n");
    if entries.is_empty() {
        out.push_str("  (no executions)\n");
    }
    for entry in entries {
        out.push_str(&format!("  {entry}\n"));
    }
    out
}
