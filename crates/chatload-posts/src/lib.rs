//! Post fabrication and bulk-insert pipeline.
//!
//! For a population already provisioned on a live server, this crate
//! fetches the authoritative membership through the platform's paged API,
//! fabricates synthetic posts with reply threading per channel, and
//! writes them to the database in fixed-size multi-row INSERT batches
//! across a fixed worker pool. Each channel is owned end-to-end by one
//! worker with its own seeded random source, so a run is reproducible for
//! a given seed regardless of scheduling.

pub mod api;
pub mod args;
pub mod client;
pub mod error;
pub mod fabricate;
pub mod insert;
pub mod loader;
pub mod pool;

pub use api::{
    fetch_all_teams, fetch_team_channels, fetch_team_users, ApiChannel, ApiTeam, ApiUser,
    MembershipApi, PAGE_SIZE,
};
pub use args::PostsArgs;
pub use client::HttpMembershipApi;
pub use error::{ApiError, PostLoadError};
pub use fabricate::{ChannelFabricator, FabricateConfig, Post};
pub use insert::{build_insert_sql, insert_posts, DEFAULT_BATCH_SIZE};
pub use loader::{load_posts, PostLoadConfig, PostLoadReport};
pub use pool::{run_indexed, Progress, DEFAULT_WORKERS};
