/// Route components of the remote schedule API, shared across crates
pub const SCHEDULE_ROUTE_COMPONENT: &str = "cilt-sequence-schedules";
pub const SCHEDULE_ROUTE_PREFIX: &str = const_str::concat!("/", SCHEDULE_ROUTE_COMPONENT);

pub const BY_SEQUENCE_ROUTE_COMPONENT: &str = "sequence";
pub const SCHEDULE_BY_SEQUENCE_ROUTE_PREFIX: &str =
    const_str::concat!(SCHEDULE_ROUTE_PREFIX, "/", BY_SEQUENCE_ROUTE_COMPONENT);

pub const BY_CILT_ROUTE_COMPONENT: &str = "cilt";
pub const SCHEDULE_BY_CILT_ROUTE_PREFIX: &str =
    const_str::concat!(SCHEDULE_ROUTE_PREFIX, "/", BY_CILT_ROUTE_COMPONENT);

/// Upper bound on occurrences produced for a single agenda query.
pub const DEFAULT_MAX_OCCURRENCES: usize = 500;

/// Default look-ahead window for agenda queries.
pub const DEFAULT_HORIZON_DAYS: u32 = 30;
