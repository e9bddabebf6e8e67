//! CLI argument definitions for population generation.

use chatload_core::{ConfigError, GenerationConfig, VolumeProfile};
use clap::Args;
use std::path::PathBuf;

/// Population sizing and seeding arguments shared by subcommands.
#[derive(Args, Clone, Debug)]
pub struct PopulationArgs {
    /// Number of teams to generate
    #[arg(long, default_value = "10")]
    pub num_teams: usize,

    /// Number of channels per team
    #[arg(long, default_value = "10")]
    pub channels_per_team: usize,

    /// Number of users to generate
    #[arg(long, default_value = "100")]
    pub num_users: usize,

    /// Random seed for deterministic distribution (same seed = same population)
    #[arg(long, default_value = "29")]
    pub seed: u64,

    /// Path to a YAML volume profile overriding the built-in tier splits
    #[arg(long)]
    pub profile: Option<PathBuf>,
}

impl PopulationArgs {
    /// Resolve the CLI arguments into a generation config.
    pub fn to_config(&self) -> Result<GenerationConfig, ConfigError> {
        let profile = match &self.profile {
            Some(path) => VolumeProfile::from_file(path)?,
            None => VolumeProfile::default(),
        };
        Ok(GenerationConfig {
            num_teams: self.num_teams,
            num_channels_per_team: self.channels_per_team,
            num_users: self.num_users,
            seed: self.seed,
            profile,
        })
    }
}
