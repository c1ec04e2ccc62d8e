use serde::{Deserialize, Serialize};

/// Calendar-ish units used by the time axis.
///
/// Months are a fixed 28 days and years 365 days; tick planning only needs
/// stable sizes, not calendar arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

/// Units scanned by the tick planner, smallest first.
pub const TICK_SCALE_UNITS: [TimeUnit; 6] = [
    TimeUnit::Second,
    TimeUnit::Minute,
    TimeUnit::Hour,
    TimeUnit::Day,
    TimeUnit::Month,
    TimeUnit::Year,
];

pub const MILLIS_PER_SECOND: f64 = 1_000.0;
pub const MILLIS_PER_MINUTE: f64 = 60_000.0;
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;
pub const MILLIS_PER_YEAR: f64 = 31_536_000_000.0;

impl TimeUnit {
    #[must_use]
    pub const fn size_ms(self) -> f64 {
        match self {
            Self::Millisecond => 1.0,
            Self::Second => MILLIS_PER_SECOND,
            Self::Minute => MILLIS_PER_MINUTE,
            Self::Hour => 3_600_000.0,
            Self::Day => MILLIS_PER_DAY,
            Self::Month => 2_419_200_000.0,
            Self::Year => MILLIS_PER_YEAR,
        }
    }

    #[must_use]
    pub const fn size_seconds(self) -> f64 {
        self.size_ms() / MILLIS_PER_SECOND
    }

    /// "Nice" multipliers of this unit, ascending.
    ///
    /// Empty for milliseconds: ticks are never finer than one second.
    #[must_use]
    pub const fn increments(self) -> &'static [u32] {
        match self {
            Self::Millisecond => &[],
            Self::Second | Self::Minute => &[1, 2, 5, 10, 15, 30],
            Self::Hour => &[1, 2, 3, 4, 6, 8, 12],
            Self::Day => &[1, 2, 3, 7, 14],
            Self::Month => &[1, 2, 3, 6],
            Self::Year => &[1, 2, 5, 10, 20, 50, 100],
        }
    }
}
