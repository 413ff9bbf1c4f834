//! Error types for rule validation and wire decoding.

use std::fmt;

/// Result type for rule validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for wire decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// A rule draft that does not describe a valid recurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The kind of error.
    pub kind: ValidationErrorKind,
    /// Additional context, suitable for form feedback.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a missing required field error.
    #[must_use]
    pub fn missing_field(name: &str) -> Self {
        Self::new(
            ValidationErrorKind::MissingField,
            format!("missing required field: {name}"),
        )
    }

    /// Creates a selector mismatch error.
    #[must_use]
    pub fn selector_mismatch(unit: impl fmt::Display, selector: &str) -> Self {
        Self::new(
            ValidationErrorKind::SelectorMismatch,
            format!("{selector} cannot be used with a {unit} rule"),
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The kind of validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Frequency unit or start date is absent.
    MissingField,
    /// The selector required by the frequency unit is absent.
    MissingSelector,
    /// A selector belonging to another frequency unit is present.
    SelectorMismatch,
    /// Interval is below 1.
    IntervalOutOfRange,
    /// Day of month outside 1..=31.
    DayOutOfRange,
    /// Month outside 1..=12.
    MonthOutOfRange,
    /// End date precedes start date.
    EndBeforeStart,
    /// Weekly rule without any weekday.
    EmptyWeekdaySet,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingField => "missing field",
            Self::MissingSelector => "missing selector",
            Self::SelectorMismatch => "selector mismatch",
            Self::IntervalOutOfRange => "interval out of range",
            Self::DayOutOfRange => "day out of range",
            Self::MonthOutOfRange => "month out of range",
            Self::EndBeforeStart => "end date before start date",
            Self::EmptyWeekdaySet => "empty weekday set",
        })
    }
}

/// A wire record that cannot be turned back into a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// The kind of error.
    pub kind: DecodeErrorKind,
    /// Additional context or message.
    pub message: String,
    validation: Option<ValidationError>,
}

impl DecodeError {
    /// Creates a new decode error.
    #[must_use]
    pub fn new(kind: DecodeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            validation: None,
        }
    }

    /// Creates an unknown schedule type error.
    #[must_use]
    pub fn unknown_schedule_type(code: &str) -> Self {
        Self::new(
            DecodeErrorKind::UnknownScheduleType,
            format!("unknown schedule type code: {code:?}"),
        )
    }

    /// Creates a malformed date error.
    #[must_use]
    pub fn malformed_date(field: &str, value: &str) -> Self {
        Self::new(
            DecodeErrorKind::MalformedDate,
            format!("{field} is not an ISO-8601 date: {value:?}"),
        )
    }

    /// Creates an inconsistent flags error.
    #[must_use]
    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::new(DecodeErrorKind::InconsistentFlags, message)
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            DecodeErrorKind::MissingField,
            format!("missing required field: {field}"),
        )
    }

    /// The validation failure behind an [`DecodeErrorKind::InvalidRule`] error.
    #[must_use]
    pub const fn validation(&self) -> Option<&ValidationError> {
        self.validation.as_ref()
    }
}

impl From<ValidationError> for DecodeError {
    fn from(error: ValidationError) -> Self {
        Self {
            kind: DecodeErrorKind::InvalidRule,
            message: error.to_string(),
            validation: Some(error),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.validation
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// The kind of decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    /// `frequencyCode` is not in the code table.
    UnknownScheduleType,
    /// A date or time string does not parse.
    MalformedDate,
    /// Fields present that the schedule type does not use, or flags outside 0/1.
    InconsistentFlags,
    /// A field the schedule type requires is absent.
    MissingField,
    /// The fields decode but describe an invalid rule.
    InvalidRule,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnknownScheduleType => "unknown schedule type",
            Self::MalformedDate => "malformed date",
            Self::InconsistentFlags => "inconsistent flags",
            Self::MissingField => "missing field",
            Self::InvalidRule => "invalid rule",
        })
    }
}
