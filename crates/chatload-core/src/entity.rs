//! Population entities and membership records.
//!
//! Entities are created once per generation run, mutated only while the
//! distributor populates memberships and choice tables, and treated as
//! read-only afterwards. The choice tables index into the owning
//! membership lists and are not part of the import format.

use crate::choice::{weighted_choice, Choice, ChoiceError};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

/// A generated team. Identity is the name, derived from its index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub team_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub allow_open_invite: bool,
}

/// A generated channel. Identity is the (team, name) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    pub team: String,
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub channel_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub header: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub purpose: String,
}

/// A user's membership in one channel of a team they belong to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelMembership {
    pub name: String,
    pub roles: String,
}

/// A user's membership in one team, with their channel memberships and
/// the weighted table used to pick an active channel inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMembership {
    pub name: String,
    pub roles: String,
    pub channels: Vec<ChannelMembership>,
    /// Indices into `channels`, weighted by the channel's tier.
    #[serde(skip)]
    pub channel_choice: Vec<Choice<usize>>,
}

/// A generated user with memberships and activity choice tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password: String,
    pub roles: String,
    pub teams: Vec<TeamMembership>,
    /// Indices into `teams`, weighted by the team's tier.
    #[serde(skip)]
    pub team_choice: Vec<Choice<usize>>,
}

/// Errors from picking a user's active team and channel.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickError {
    #[error(transparent)]
    Choice(#[from] ChoiceError),

    /// A choice table references a membership index that does not exist.
    #[error("choice table references membership index {0} out of range")]
    BadIndex(usize),
}

impl User {
    /// Pick where this user acts next: a weighted team choice, then a
    /// weighted channel choice within it.
    ///
    /// Returns `Ok(None)` when the user belongs to no team, or the chosen
    /// team membership has no channels; both are valid outcomes for a
    /// sparsely distributed population. A malformed table (zero weight,
    /// dangling index) is a distribution defect and surfaces as an error.
    pub fn pick_active_team_and_channel<R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<Option<(&TeamMembership, &ChannelMembership)>, PickError> {
        if self.team_choice.is_empty() {
            return Ok(None);
        }

        let team_index = *weighted_choice(rng, &self.team_choice)?;
        let team = self
            .teams
            .get(team_index)
            .ok_or(PickError::BadIndex(team_index))?;

        if team.channel_choice.is_empty() {
            return Ok(None);
        }

        let channel_index = *weighted_choice(rng, &team.channel_choice)?;
        let channel = team
            .channels
            .get(channel_index)
            .ok_or(PickError::BadIndex(channel_index))?;

        Ok(Some((team, channel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bare_user() -> User {
        User {
            username: "user0".to_string(),
            email: "success+user0@simulator.amazonses.com".to_string(),
            password: "Loadtestpassword1".to_string(),
            roles: "system_user".to_string(),
            teams: Vec::new(),
            team_choice: Vec::new(),
        }
    }

    fn membership(channels: usize) -> TeamMembership {
        TeamMembership {
            name: "loadtestteam0".to_string(),
            roles: "team_user".to_string(),
            channels: (0..channels)
                .map(|i| ChannelMembership {
                    name: format!("loadtestchannel{i}"),
                    roles: "channel_user".to_string(),
                })
                .collect(),
            channel_choice: (0..channels).map(|i| Choice::new(i, 2)).collect(),
        }
    }

    #[test]
    fn test_pick_without_memberships_is_none() {
        let user = bare_user();
        let mut rng = StdRng::seed_from_u64(29);
        assert_eq!(user.pick_active_team_and_channel(&mut rng), Ok(None));
    }

    #[test]
    fn test_pick_without_channels_is_none() {
        let mut user = bare_user();
        user.teams.push(membership(0));
        user.team_choice.push(Choice::new(0, 4));

        let mut rng = StdRng::seed_from_u64(29);
        assert_eq!(user.pick_active_team_and_channel(&mut rng), Ok(None));
    }

    #[test]
    fn test_pick_returns_owned_membership() {
        let mut user = bare_user();
        user.teams.push(membership(3));
        user.team_choice.push(Choice::new(0, 4));

        let mut rng = StdRng::seed_from_u64(29);
        let (team, channel) = user
            .pick_active_team_and_channel(&mut rng)
            .unwrap()
            .expect("user has a full membership");
        assert_eq!(team.name, "loadtestteam0");
        assert!(team.channels.iter().any(|c| c.name == channel.name));
    }

    #[test]
    fn test_dangling_choice_index_is_a_defect() {
        let mut user = bare_user();
        user.teams.push(membership(1));
        user.team_choice.push(Choice::new(7, 4));

        let mut rng = StdRng::seed_from_u64(29);
        assert_eq!(
            user.pick_active_team_and_channel(&mut rng),
            Err(PickError::BadIndex(7))
        );
    }

    #[test]
    fn test_choice_tables_stay_out_of_the_import_format() {
        let mut user = bare_user();
        user.teams.push(membership(1));
        user.team_choice.push(Choice::new(0, 4));

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("team_choice").is_none());
        assert!(json["teams"][0].get("channel_choice").is_none());
        assert_eq!(json["teams"][0]["channels"][0]["name"], "loadtestchannel0");
    }
}
