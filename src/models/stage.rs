use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Interview phase. Each stage has its own question template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Aptitude,
    Coding,
    Technical,
    Behavioral,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Aptitude,
        Stage::Coding,
        Stage::Technical,
        Stage::Behavioral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Aptitude => "aptitude",
            Stage::Coding => "coding",
            Stage::Technical => "technical",
            Stage::Behavioral => "behavioral",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Stage::Aptitude => "Break the problem into smaller parts and solve step by step.",
            Stage::Coding => "Think about edge cases and optimize your solution.",
            Stage::Technical => "Focus on trade-offs and system design principles.",
            Stage::Behavioral => "Reflect on a real-world experience that aligns with the question.",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aptitude" => Ok(Stage::Aptitude),
            "coding" => Ok(Stage::Coding),
            "technical" => Ok(Stage::Technical),
            "behavioral" => Ok(Stage::Behavioral),
            other => Err(Error::BadRequest(format!("Invalid stage selected: {}", other))),
        }
    }
}
