//! Ordinal 1..=5 energy ("battery") level.

use serde::{Deserialize, Serialize};

/// Energy level chosen on the battery picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    Drained = 1,
    Low = 2,
    Normal = 3,
    Charged = 4,
    Full = 5,
}

impl EnergyLevel {
    pub const ALL: [EnergyLevel; 5] = [
        EnergyLevel::Drained,
        EnergyLevel::Low,
        EnergyLevel::Normal,
        EnergyLevel::Charged,
        EnergyLevel::Full,
    ];

    /// Numeric score in `1..=5`.
    pub fn score(self) -> u8 {
        self as u8
    }

    /// Exact conversion from a stored score.
    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            1 => Some(Self::Drained),
            2 => Some(Self::Low),
            3 => Some(Self::Normal),
            4 => Some(Self::Charged),
            5 => Some(Self::Full),
            _ => None,
        }
    }

    /// Converts any raw value into a level, clamping into `1..=5`.
    pub fn from_clamped(value: i64) -> Self {
        match Self::from_score(clamp_energy(value)) {
            Some(level) => level,
            None => Self::Normal,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Drained => "drained",
            Self::Low => "low",
            Self::Normal => "normal",
            Self::Charged => "charged",
            Self::Full => "full",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Drained => "Drained",
            Self::Low => "Low power",
            Self::Normal => "Normal",
            Self::Charged => "Charged",
            Self::Full => "Fully charged",
        }
    }
}

/// Clamps a raw energy value into `1..=5`.
pub fn clamp_energy(value: i64) -> u8 {
    value.clamp(1, 5) as u8
}

#[cfg(test)]
mod tests {
    use super::{clamp_energy, EnergyLevel};

    #[test]
    fn clamp_energy_bounds_values() {
        assert_eq!(clamp_energy(-3), 1);
        assert_eq!(clamp_energy(0), 1);
        assert_eq!(clamp_energy(4), 4);
        assert_eq!(clamp_energy(42), 5);
    }

    #[test]
    fn score_and_key_are_consistent() {
        for level in EnergyLevel::ALL {
            assert_eq!(EnergyLevel::from_score(level.score()), Some(level));
        }
        assert_eq!(EnergyLevel::from_clamped(9), EnergyLevel::Full);
        assert_eq!(EnergyLevel::from_clamped(-2), EnergyLevel::Drained);
    }
}
