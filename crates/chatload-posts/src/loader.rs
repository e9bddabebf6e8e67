//! Post load orchestration: fetch membership, fabricate, bulk-insert.

use crate::api::{fetch_all_teams, fetch_team_channels, fetch_team_users, MembershipApi};
use crate::error::PostLoadError;
use crate::fabricate::{ChannelFabricator, FabricateConfig};
use crate::insert::{build_insert_sql, insert_posts};
use crate::pool::{run_indexed, Progress};
use chatload_core::derive_seed;
use chrono::Utc;
use mysql_async::Pool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Parameters for a post load run.
#[derive(Debug, Clone)]
pub struct PostLoadConfig {
    pub fabricate: FabricateConfig,
    /// Team/channel counts the population was generated with; the post
    /// budget splits evenly across `num_teams * num_channels_per_team`
    /// slots.
    pub num_teams: usize,
    pub num_channels_per_team: usize,
    /// Only teams with this name prefix take part in the run.
    pub team_prefix: String,
    /// Upper bound on users fetched per team.
    pub max_users_per_team: usize,
    pub workers: usize,
    pub seed: u64,
}

/// Outcome of a post load run.
#[derive(Debug, Clone, Default)]
pub struct PostLoadReport {
    pub teams_processed: usize,
    pub teams_failed: usize,
    pub channels_processed: usize,
    pub posts_inserted: u64,
    pub batches_failed: u64,
    pub duration: Duration,
}

impl PostLoadReport {
    pub fn posts_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.posts_inserted as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Fabricate and insert synthetic posts for every provisioned channel.
///
/// A fetch failure aborts only the team it happened in; fabrication moves
/// on to the next team with everything already inserted left intact.
/// Failed insert batches are logged and skipped. Nothing is retried.
pub async fn load_posts<A>(
    api: &A,
    db: &Pool,
    config: &PostLoadConfig,
) -> Result<PostLoadReport, PostLoadError>
where
    A: MembershipApi + ?Sized,
{
    let start = Instant::now();
    let mut report = PostLoadReport::default();

    let channel_slots = config.num_teams * config.num_channels_per_team;
    if channel_slots == 0 {
        return Err(PostLoadError::Config(
            "post budget needs at least one team and one channel per team".to_string(),
        ));
    }
    let posts_per_channel = config.fabricate.num_posts / channel_slots;

    let teams = fetch_all_teams(api).await?;
    let target_teams: Vec<_> = teams
        .into_iter()
        .filter(|team| team.name.starts_with(&config.team_prefix))
        .collect();

    info!(
        "post load: {} matching teams, {} posts per channel",
        target_teams.len(),
        posts_per_channel
    );

    // Statement text for a full batch, shared by every worker; the
    // driver's per-connection statement cache prepares it once per
    // worker.
    let insert_sql = Arc::new(build_insert_sql(config.fabricate.batch_size));
    let now_ms = Utc::now().timestamp_millis();

    let inserted = Arc::new(AtomicU64::new(0));
    let failed_batches = Arc::new(AtomicU64::new(0));

    for (team_index, team) in target_teams.iter().enumerate() {
        info!("fetching channels for {}", team.name);
        let channels = match fetch_team_channels(api, &team.id).await {
            Ok(channels) => channels,
            Err(e) => {
                error!("could not fetch channels for team {}: {e}", team.name);
                report.teams_failed += 1;
                continue;
            }
        };

        info!("fetching users for {}", team.name);
        let users = match fetch_team_users(api, &team.id, config.max_users_per_team).await {
            Ok(users) => users,
            Err(e) => {
                error!("could not fetch users for team {}: {e}", team.name);
                report.teams_failed += 1;
                continue;
            }
        };

        if channels.is_empty() || users.is_empty() {
            warn!("team {} has no channels or members, skipping", team.name);
            continue;
        }

        let channels = Arc::new(channels);
        let users = Arc::new(users);
        let team_seed = derive_seed(config.seed, team_index as u64);

        let progress = Arc::new(Progress::with_callback(channels.len(), {
            let team_name = team.name.clone();
            move |done, total| info!("{team_name}: fabricated {done}/{total} channels")
        }));

        // Each worker owns a channel end-to-end: fabricate, batch,
        // insert, with its own connection and its own seeded source.
        let task = {
            let channels = Arc::clone(&channels);
            let users = Arc::clone(&users);
            let insert_sql = Arc::clone(&insert_sql);
            let inserted = Arc::clone(&inserted);
            let failed_batches = Arc::clone(&failed_batches);
            let fabricate = config.fabricate.clone();
            let db = db.clone();
            move |channel_index: usize| {
                let channels = Arc::clone(&channels);
                let users = Arc::clone(&users);
                let insert_sql = Arc::clone(&insert_sql);
                let inserted = Arc::clone(&inserted);
                let failed_batches = Arc::clone(&failed_batches);
                let fabricate = fabricate.clone();
                let db = db.clone();
                async move {
                    let channel = &channels[channel_index];
                    let mut conn = match db.get_conn().await {
                        Ok(conn) => conn,
                        Err(e) => {
                            error!("no connection for channel {}: {e}", channel.name);
                            return;
                        }
                    };

                    let mut fabricator = ChannelFabricator::new(
                        derive_seed(team_seed, channel_index as u64),
                        &channel.id,
                        &users,
                        &fabricate,
                        posts_per_channel,
                        now_ms,
                    );

                    while let Some(batch) = fabricator.next_batch() {
                        let result = if batch.len() == fabricate.batch_size {
                            insert_posts(&mut conn, &insert_sql, &batch).await
                        } else {
                            let tail_sql = build_insert_sql(batch.len());
                            insert_posts(&mut conn, &tail_sql, &batch).await
                        };
                        match result {
                            Ok(count) => {
                                inserted.fetch_add(count, Ordering::Relaxed);
                            }
                            Err(e) => {
                                error!("insert batch failed for channel {}: {e}", channel.name);
                                failed_batches.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    }
                }
            }
        };

        run_indexed(channels.len(), config.workers, progress, task).await;

        report.teams_processed += 1;
        report.channels_processed += channels.len();
    }

    report.posts_inserted = inserted.load(Ordering::Relaxed);
    report.batches_failed = failed_batches.load(Ordering::Relaxed);
    report.duration = start.elapsed();

    info!(
        "post load complete: {} posts into {} channels across {} teams in {:?}",
        report.posts_inserted, report.channels_processed, report.teams_processed, report.duration
    );

    Ok(report)
}
