//! Frequency units and their persisted short codes.

use std::fmt;

/// Recurrence granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyUnit {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// The one table mapping frequency units to the store's `scheduleType` codes.
///
/// Both directions of the mapping read from here. Entries are ordered by
/// declaration order of [`FrequencyUnit`].
pub const FREQUENCY_CODES: [(FrequencyUnit, &str); 4] = [
    (FrequencyUnit::Daily, "dai"),
    (FrequencyUnit::Weekly, "wee"),
    (FrequencyUnit::Monthly, "mon"),
    (FrequencyUnit::Yearly, "yea"),
];

impl FrequencyUnit {
    /// Returns the persisted short code.
    #[must_use]
    pub const fn as_code(self) -> &'static str {
        FREQUENCY_CODES[self as usize].1
    }

    /// Parses a persisted short code (surrounding whitespace and case are ignored).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        FREQUENCY_CODES
            .iter()
            .find_map(|(unit, known)| known.eq_ignore_ascii_case(code).then_some(*unit))
    }

    /// Returns the RFC 5545 `FREQ` value.
    #[must_use]
    pub const fn as_rrule_freq(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [FrequencyUnit; 4] = [
        FrequencyUnit::Daily,
        FrequencyUnit::Weekly,
        FrequencyUnit::Monthly,
        FrequencyUnit::Yearly,
    ];

    #[test]
    fn code_table_is_symmetric() {
        for unit in ALL {
            assert_eq!(FrequencyUnit::from_code(unit.as_code()), Some(unit));
        }
    }

    #[test]
    fn code_table_is_ordered_by_unit() {
        for (index, unit) in ALL.into_iter().enumerate() {
            assert_eq!(FREQUENCY_CODES[index].0, unit);
        }
    }

    #[test]
    fn code_table_has_distinct_codes() {
        for (i, (_, a)) in FREQUENCY_CODES.iter().enumerate() {
            for (_, b) in &FREQUENCY_CODES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn code_parse_is_lenient_on_case_and_whitespace() {
        assert_eq!(FrequencyUnit::from_code(" MON "), Some(FrequencyUnit::Monthly));
        assert_eq!(FrequencyUnit::from_code("Wee"), Some(FrequencyUnit::Weekly));
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(FrequencyUnit::from_code("man"), None);
        assert_eq!(FrequencyUnit::from_code("xyz"), None);
        assert_eq!(FrequencyUnit::from_code(""), None);
    }
}
