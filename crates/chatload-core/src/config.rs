//! Run configuration: population counts and the volume tiering profile.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Profile parse error.
    #[error("profile parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Volume tier of a team or channel.
///
/// Tiers control both how many members join and how likely the team or
/// channel is to be picked as "active" by a simulated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    High,
    Mid,
    Low,
}

/// Fractions of a total population falling into each volume tier.
///
/// Each fraction is relative to the whole count, not to the other tiers.
/// Sums above 1.0 are not rejected; assignment downstream caps instead of
/// validating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierSplit {
    pub high: f64,
    pub mid: f64,
    pub low: f64,
}

impl TierSplit {
    pub fn fraction(&self, tier: Tier) -> f64 {
        match tier {
            Tier::High => self.high,
            Tier::Mid => self.mid,
            Tier::Low => self.low,
        }
    }
}

/// Relative selection weights for picking an "active" team or channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierWeights {
    pub high: u32,
    pub mid: u32,
    pub low: u32,
}

impl TierWeights {
    pub fn weight(&self, tier: Tier) -> u32 {
        match tier {
            Tier::High => self.high,
            Tier::Mid => self.mid,
            Tier::Low => self.low,
        }
    }
}

/// Volume tiering profile for the team axis and the channel axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeProfile {
    /// Fraction of all teams classified into each tier.
    pub team_tiers: TierSplit,
    /// Fraction of all users joining a team of each tier.
    pub team_members: TierSplit,
    /// Selection weight of a team of each tier in a user's choice table.
    pub team_weights: TierWeights,
    /// Fraction of a team's channels classified into each tier.
    pub channel_tiers: TierSplit,
    /// Fraction of a team's members joining a channel of each tier.
    pub channel_members: TierSplit,
    /// Selection weight of a channel of each tier.
    pub channel_weights: TierWeights,
}

impl Default for VolumeProfile {
    fn default() -> Self {
        Self {
            team_tiers: TierSplit {
                high: 0.2,
                mid: 0.3,
                low: 0.5,
            },
            team_members: TierSplit {
                high: 0.5,
                mid: 0.25,
                low: 0.1,
            },
            team_weights: TierWeights {
                high: 4,
                mid: 2,
                low: 1,
            },
            channel_tiers: TierSplit {
                high: 0.2,
                mid: 0.3,
                low: 0.5,
            },
            channel_members: TierSplit {
                high: 0.3,
                mid: 0.2,
                low: 0.1,
            },
            channel_weights: TierWeights {
                high: 4,
                mid: 2,
                low: 1,
            },
        }
    }
}

impl VolumeProfile {
    /// Load a profile from a YAML file. Missing fields keep their
    /// defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Parameters for one population generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub num_teams: usize,
    pub num_channels_per_team: usize,
    pub num_users: usize,
    /// Seed for the distribution's random source; same seed and config
    /// reproduce the population bit for bit.
    pub seed: u64,
    pub profile: VolumeProfile,
}
