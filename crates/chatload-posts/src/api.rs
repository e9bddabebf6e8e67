//! Membership API seam: paged reads of the provisioned population.

use crate::error::ApiError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Page size for all membership listings; a short page ends pagination.
pub const PAGE_SIZE: usize = 200;

/// A team as reported by the platform API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTeam {
    pub id: String,
    pub name: String,
}

/// A channel as reported by the platform API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiChannel {
    pub id: String,
    pub name: String,
}

/// A user as reported by the platform API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub id: String,
    pub username: String,
}

/// Paged read access to the provisioned teams, channels and users.
#[async_trait]
pub trait MembershipApi {
    async fn teams(&self, page: usize, per_page: usize) -> Result<Vec<ApiTeam>, ApiError>;

    async fn public_channels(
        &self,
        team_id: &str,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<ApiChannel>, ApiError>;

    async fn users_in_team(
        &self,
        team_id: &str,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<ApiUser>, ApiError>;
}

/// Fetch every team, page by page.
pub async fn fetch_all_teams<A: MembershipApi + ?Sized>(api: &A) -> Result<Vec<ApiTeam>, ApiError> {
    let mut teams = Vec::new();
    let mut page = 0;
    loop {
        let batch = api.teams(page, PAGE_SIZE).await?;
        let received = batch.len();
        teams.extend(batch);
        if received < PAGE_SIZE {
            break;
        }
        page += 1;
    }
    Ok(teams)
}

/// Fetch every public channel of a team, page by page.
pub async fn fetch_team_channels<A: MembershipApi + ?Sized>(
    api: &A,
    team_id: &str,
) -> Result<Vec<ApiChannel>, ApiError> {
    let mut channels = Vec::new();
    let mut page = 0;
    loop {
        let batch = api.public_channels(team_id, page, PAGE_SIZE).await?;
        let received = batch.len();
        channels.extend(batch);
        if received < PAGE_SIZE {
            break;
        }
        page += 1;
    }
    Ok(channels)
}

/// Fetch the users of a team, stopping after a short page or once at
/// least `max_users` have accumulated (the cap bounds memory; the last
/// fetched page is kept whole).
pub async fn fetch_team_users<A: MembershipApi + ?Sized>(
    api: &A,
    team_id: &str,
    max_users: usize,
) -> Result<Vec<ApiUser>, ApiError> {
    let mut users = Vec::new();
    let mut page = 0;
    loop {
        debug!("fetching users page {page} for team {team_id}");
        let batch = api.users_in_team(team_id, page, PAGE_SIZE).await?;
        let received = batch.len();
        users.extend(batch);
        if received < PAGE_SIZE || users.len() >= max_users {
            break;
        }
        page += 1;
    }
    Ok(users)
}
