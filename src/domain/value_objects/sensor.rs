use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which rule family a sensor belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Smoker,
    Food,
}

impl SensorKind {
    /// Short headline used when rendering an alert for this kind.
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self {
            Self::Smoker => "Smoker alert!",
            Self::Food => "Food stall!",
        }
    }

    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Smoker => "\u{1f525}",
            Self::Food => "\u{1f356}",
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Smoker => write!(f, "smoker"),
            Self::Food => write!(f, "food"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sensor channel: '{0}' (expected smoker, food-A or food-B)")]
pub struct UnknownChannel(pub String);

/// The three thermometer channels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorChannel {
    #[serde(rename = "smoker")]
    Smoker,
    #[serde(rename = "food-A")]
    FoodA,
    #[serde(rename = "food-B")]
    FoodB,
}

impl SensorChannel {
    pub const ALL: [Self; 3] = [Self::Smoker, Self::FoodA, Self::FoodB];

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Smoker => "smoker",
            Self::FoodA => "food-A",
            Self::FoodB => "food-B",
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SensorKind {
        match self {
            Self::Smoker => SensorKind::Smoker,
            Self::FoodA | Self::FoodB => SensorKind::Food,
        }
    }

    /// Index of this channel's reading among the value cells of a
    /// thermometer CSV row, i.e. counting from the column after the timestamp.
    #[must_use]
    pub const fn cell_index(&self) -> usize {
        match self {
            Self::Smoker => 0,
            Self::FoodA => 1,
            Self::FoodB => 2,
        }
    }
}

impl std::fmt::Display for SensorChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SensorChannel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "smoker" => Ok(Self::Smoker),
            "food-a" => Ok(Self::FoodA),
            "food-b" => Ok(Self::FoodB),
            _ => Err(UnknownChannel(s.trim().to_string())),
        }
    }
}
