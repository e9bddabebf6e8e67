//! HTTP client for the collaboration platform's REST API.

use crate::api::{ApiChannel, ApiTeam, ApiUser, MembershipApi};
use crate::error::ApiError;
use async_trait::async_trait;
use tracing::info;

/// Membership API over the platform's v4 REST endpoints.
///
/// Holds the session token obtained at login; every listing request is
/// authenticated with it.
pub struct HttpMembershipApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpMembershipApi {
    /// Log in with admin credentials and keep the session token.
    pub async fn login(server_url: &str, email: &str, password: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::new();
        let base_url = server_url.trim_end_matches('/').to_string();

        let response = client
            .post(format!("{base_url}/api/v4/users/login"))
            .json(&serde_json::json!({ "login_id": email, "password": password }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::Login(e.to_string()))?;

        let token = response
            .headers()
            .get("Token")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Login("no session token in login response".to_string()))?
            .to_string();

        info!("logged in to {base_url} as {email}");
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: String) -> Result<T, ApiError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl MembershipApi for HttpMembershipApi {
    async fn teams(&self, page: usize, per_page: usize) -> Result<Vec<ApiTeam>, ApiError> {
        self.get_json(format!("/api/v4/teams?page={page}&per_page={per_page}"))
            .await
    }

    async fn public_channels(
        &self,
        team_id: &str,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<ApiChannel>, ApiError> {
        self.get_json(format!(
            "/api/v4/teams/{team_id}/channels?page={page}&per_page={per_page}"
        ))
        .await
    }

    async fn users_in_team(
        &self,
        team_id: &str,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<ApiUser>, ApiError> {
        self.get_json(format!(
            "/api/v4/users?in_team={team_id}&page={page}&per_page={per_page}"
        ))
        .await
    }
}
