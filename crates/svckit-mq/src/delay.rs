//! Fixed delay tiers for delayed delivery.
//!
//! Brokers in this family only support a fixed ladder of delays rather than
//! arbitrary durations, so delayed sends name a tier instead of a Duration.

use std::time::Duration;

/// A delayed-delivery tier.
///
/// Tiers are numbered 1 through 18 and map to fixed durations from one
/// second up to two hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayLevel {
    OneSecond,
    FiveSeconds,
    TenSeconds,
    ThirtySeconds,
    OneMinute,
    TwoMinutes,
    ThreeMinutes,
    FourMinutes,
    FiveMinutes,
    SixMinutes,
    SevenMinutes,
    EightMinutes,
    NineMinutes,
    TenMinutes,
    TwentyMinutes,
    ThirtyMinutes,
    OneHour,
    TwoHours,
}

impl DelayLevel {
    /// The broker-side level number, 1 through 18.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::OneSecond => 1,
            Self::FiveSeconds => 2,
            Self::TenSeconds => 3,
            Self::ThirtySeconds => 4,
            Self::OneMinute => 5,
            Self::TwoMinutes => 6,
            Self::ThreeMinutes => 7,
            Self::FourMinutes => 8,
            Self::FiveMinutes => 9,
            Self::SixMinutes => 10,
            Self::SevenMinutes => 11,
            Self::EightMinutes => 12,
            Self::NineMinutes => 13,
            Self::TenMinutes => 14,
            Self::TwentyMinutes => 15,
            Self::ThirtyMinutes => 16,
            Self::OneHour => 17,
            Self::TwoHours => 18,
        }
    }

    /// The delivery delay this tier stands for.
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::OneSecond => Duration::from_secs(1),
            Self::FiveSeconds => Duration::from_secs(5),
            Self::TenSeconds => Duration::from_secs(10),
            Self::ThirtySeconds => Duration::from_secs(30),
            Self::OneMinute => Duration::from_secs(60),
            Self::TwoMinutes => Duration::from_secs(2 * 60),
            Self::ThreeMinutes => Duration::from_secs(3 * 60),
            Self::FourMinutes => Duration::from_secs(4 * 60),
            Self::FiveMinutes => Duration::from_secs(5 * 60),
            Self::SixMinutes => Duration::from_secs(6 * 60),
            Self::SevenMinutes => Duration::from_secs(7 * 60),
            Self::EightMinutes => Duration::from_secs(8 * 60),
            Self::NineMinutes => Duration::from_secs(9 * 60),
            Self::TenMinutes => Duration::from_secs(10 * 60),
            Self::TwentyMinutes => Duration::from_secs(20 * 60),
            Self::ThirtyMinutes => Duration::from_secs(30 * 60),
            Self::OneHour => Duration::from_secs(60 * 60),
            Self::TwoHours => Duration::from_secs(2 * 60 * 60),
        }
    }

    /// Resolves a broker-side level number back to a tier.
    #[must_use]
    pub const fn from_level(level: u8) -> Option<Self> {
        Some(match level {
            1 => Self::OneSecond,
            2 => Self::FiveSeconds,
            3 => Self::TenSeconds,
            4 => Self::ThirtySeconds,
            5 => Self::OneMinute,
            6 => Self::TwoMinutes,
            7 => Self::ThreeMinutes,
            8 => Self::FourMinutes,
            9 => Self::FiveMinutes,
            10 => Self::SixMinutes,
            11 => Self::SevenMinutes,
            12 => Self::EightMinutes,
            13 => Self::NineMinutes,
            14 => Self::TenMinutes,
            15 => Self::TwentyMinutes,
            16 => Self::ThirtyMinutes,
            17 => Self::OneHour,
            18 => Self::TwoHours,
            _ => return None,
        })
    }
}
