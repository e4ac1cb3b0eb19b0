// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnimationError;

/// Discrete stage of the stylized processing cycle
///
/// `All` is the neutral state: nothing is emphasized under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Feedforward sweep
    Infer,
    /// Top-down prediction injection
    Predict,
    /// Local mismatch correction
    Update,
    #[default]
    All,
}

impl Phase {
    /// Order the phase clock cycles through
    pub const CYCLE: [Phase; 3] = [Phase::Infer, Phase::Predict, Phase::Update];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Infer => "infer",
            Phase::Predict => "predict",
            Phase::Update => "update",
            Phase::All => "all",
        }
    }

    /// Compact encoding for lock-free observers
    pub fn as_u8(&self) -> u8 {
        match self {
            Phase::Infer => 0,
            Phase::Predict => 1,
            Phase::Update => 2,
            Phase::All => 3,
        }
    }

    /// Inverse of [`Phase::as_u8`]; unknown codes map to `All`
    pub fn from_u8(code: u8) -> Phase {
        match code {
            0 => Phase::Infer,
            1 => Phase::Predict,
            2 => Phase::Update,
            _ => Phase::All,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "infer" => Ok(Phase::Infer),
            "predict" => Ok(Phase::Predict),
            "update" => Ok(Phase::Update),
            "all" => Ok(Phase::All),
            _ => Err(AnimationError::UnknownPhase(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for phase in [Phase::Infer, Phase::Predict, Phase::Update, Phase::All] {
            assert_eq!(phase.to_string().parse::<Phase>().unwrap(), phase);
        }
        assert_eq!(" Predict ".parse::<Phase>().unwrap(), Phase::Predict);
        assert!(matches!(
            "dream".parse::<Phase>(),
            Err(AnimationError::UnknownPhase(_))
        ));
    }

    #[test]
    fn test_u8_codes() {
        for phase in [Phase::Infer, Phase::Predict, Phase::Update, Phase::All] {
            assert_eq!(Phase::from_u8(phase.as_u8()), phase);
        }
        assert_eq!(Phase::from_u8(200), Phase::All);
    }

    #[test]
    fn test_default_is_neutral() {
        assert_eq!(Phase::default(), Phase::All);
        assert!(!Phase::CYCLE.contains(&Phase::All));
    }
}
