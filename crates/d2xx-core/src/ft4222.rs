//! FT4222H value types

use std::fmt;

/// FT4222H system clock selection
///
/// The discriminant is the ordinal the D2XX driver uses for the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockRate {
    /// 60 MHz system clock
    SysClk60 = 0,
    /// 24 MHz system clock
    SysClk24 = 1,
    /// 48 MHz system clock
    SysClk48 = 2,
    /// 80 MHz system clock
    SysClk80 = 3,
}

impl ClockRate {
    /// All clock rates in ordinal order
    pub const ALL: [ClockRate; 4] = [
        ClockRate::SysClk60,
        ClockRate::SysClk24,
        ClockRate::SysClk48,
        ClockRate::SysClk80,
    ];

    /// Look up a clock rate by its driver ordinal
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// Driver ordinal of this clock rate
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Get the frequency in kHz
    pub fn khz(self) -> u32 {
        match self {
            ClockRate::SysClk60 => 60_000,
            ClockRate::SysClk24 => 24_000,
            ClockRate::SysClk48 => 48_000,
            ClockRate::SysClk80 => 80_000,
        }
    }
}

impl fmt::Display for ClockRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MHz", self.khz() / 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ordinal_lowest() {
        assert_eq!(ClockRate::from_ordinal(0), Some(ClockRate::SysClk60));
    }

    #[test]
    fn test_ordinals() {
        for rate in ClockRate::ALL {
            assert_eq!(ClockRate::from_ordinal(rate.ordinal()), Some(rate));
        }
        assert_eq!(ClockRate::from_ordinal(4), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ClockRate::SysClk80.to_string(), "80 MHz");
        assert_eq!(ClockRate::SysClk24.khz(), 24_000);
    }
}
