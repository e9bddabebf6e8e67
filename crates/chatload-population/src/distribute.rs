//! The tiered population distributor.
//!
//! One seeded random source drives the whole distribution, so identical
//! configuration and seed reproduce the population and every choice table
//! bit for bit. Degenerate configurations (zero counts, tier fractions
//! summing above 1.0) are not rejected: memberships come out empty or
//! capped instead.

use chatload_core::{
    Channel, ChannelMembership, Choice, GenerationConfig, Team, TeamMembership, Tier, User,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

/// A fully distributed population, read-only once returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    pub teams: Vec<Team>,
    pub channels: Vec<Channel>,
    pub users: Vec<User>,
    /// Indices into `channels`, grouped by owning team index.
    pub channels_by_team: Vec<Vec<usize>>,
}

/// Classify a position in a tier permutation against cumulative counts:
/// positions below `high` are high volume, below `high + mid` mid volume,
/// the rest low.
fn classify(position: usize, high: usize, mid: usize) -> Tier {
    if position < high {
        Tier::High
    } else if position < high + mid {
        Tier::Mid
    } else {
        Tier::Low
    }
}

fn fraction_of(total: usize, fraction: f64) -> usize {
    (total as f64 * fraction).floor() as usize
}

fn permutation(rng: &mut StdRng, len: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    indices
}

fn generate_teams(num_teams: usize) -> Vec<Team> {
    (0..num_teams)
        .map(|i| Team {
            name: format!("loadtestteam{i}"),
            display_name: format!("Loadtest Team {i}"),
            team_type: "O".to_string(),
            description: format!("This is loadtest team {i}"),
            allow_open_invite: true,
        })
        .collect()
}

fn generate_users(num_users: usize) -> Vec<User> {
    (0..num_users)
        .map(|i| User {
            username: format!("user{i}"),
            email: format!("success+user{i}@simulator.amazonses.com"),
            password: "Loadtestpassword1".to_string(),
            roles: "system_user".to_string(),
            teams: Vec::new(),
            team_choice: Vec::new(),
        })
        .collect()
}

/// Generate and distribute the full population for `config`.
pub fn distribute(config: &GenerationConfig) -> Population {
    let profile = &config.profile;

    let teams = generate_teams(config.num_teams);

    let mut channels = Vec::with_capacity(config.num_teams * config.num_channels_per_team);
    let mut channels_by_team = Vec::with_capacity(config.num_teams);
    for team_num in 0..config.num_teams {
        let mut in_team = Vec::with_capacity(config.num_channels_per_team);
        for channel_num in 0..config.num_channels_per_team {
            channels.push(Channel {
                team: teams[team_num].name.clone(),
                name: format!("loadtestchannel{channel_num}"),
                display_name: format!("Loadtest Channel {channel_num}"),
                channel_type: "O".to_string(),
                header: format!("Hea: This is loadtest channel {channel_num} on team {team_num}"),
                purpose: format!("Pur: This is loadtest channel {channel_num} on team {team_num}"),
            });
            in_team.push(channels.len() - 1);
        }
        channels_by_team.push(in_team);
    }

    let mut users = generate_users(config.num_users);

    let num_high_teams = fraction_of(config.num_teams, profile.team_tiers.high);
    let num_mid_teams = fraction_of(config.num_teams, profile.team_tiers.mid);

    let mut rng = StdRng::seed_from_u64(config.seed);

    // Walk a permutation of the teams; the position in the permutation,
    // not the team index, decides the tier.
    let team_permutation = permutation(&mut rng, teams.len());
    for (position, &team_num) in team_permutation.iter().enumerate() {
        let tier = classify(position, num_high_teams, num_mid_teams);
        let num_members = fraction_of(config.num_users, profile.team_members.fraction(tier))
            .min(users.len());
        let team_weight = profile.team_weights.weight(tier);
        let team_name = teams[team_num].name.clone();
        debug!(
            "team {team_name} classified {tier:?} at position {position}, {num_members} members"
        );

        let user_permutation = permutation(&mut rng, users.len());
        let members = &user_permutation[..num_members];
        for &user_num in members {
            let user = &mut users[user_num];
            user.teams.push(TeamMembership {
                name: team_name.clone(),
                roles: "team_user".to_string(),
                channels: Vec::new(),
                channel_choice: Vec::new(),
            });
            user.team_choice
                .push(Choice::new(user.teams.len() - 1, team_weight));
        }

        // Channel tiering inside the team mirrors the team pass, drawing
        // members only from this team's membership.
        let channels_in_team = &channels_by_team[team_num];
        let num_high_channels = fraction_of(channels_in_team.len(), profile.channel_tiers.high);
        let num_mid_channels = fraction_of(channels_in_team.len(), profile.channel_tiers.mid);

        let channel_permutation = permutation(&mut rng, channels_in_team.len());
        for (channel_position, &slot) in channel_permutation.iter().enumerate() {
            let channel_tier = classify(channel_position, num_high_channels, num_mid_channels);
            let num_channel_members =
                fraction_of(members.len(), profile.channel_members.fraction(channel_tier))
                    .min(members.len());
            let channel_weight = profile.channel_weights.weight(channel_tier);
            let channel_name = channels[channels_in_team[slot]].name.clone();

            let member_permutation = permutation(&mut rng, members.len());
            for &member_slot in &member_permutation[..num_channel_members] {
                let user = &mut users[members[member_slot]];
                // The membership appended for this team is always the
                // user's last one.
                if let Some(membership) = user.teams.last_mut() {
                    membership.channels.push(ChannelMembership {
                        name: channel_name.clone(),
                        roles: "channel_user".to_string(),
                    });
                    membership
                        .channel_choice
                        .push(Choice::new(membership.channels.len() - 1, channel_weight));
                }
            }
        }
    }

    info!(
        "distributed population: {} teams, {} channels, {} users",
        teams.len(),
        channels.len(),
        users.len()
    );

    Population {
        teams,
        channels,
        users,
        channels_by_team,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatload_core::{TierSplit, TierWeights, VolumeProfile};
    use std::collections::HashMap;

    fn test_config() -> GenerationConfig {
        GenerationConfig {
            num_teams: 4,
            num_channels_per_team: 5,
            num_users: 40,
            seed: 29,
            profile: VolumeProfile::default(),
        }
    }

    #[test]
    fn test_population_shape() {
        let pop = distribute(&test_config());
        assert_eq!(pop.teams.len(), 4);
        assert_eq!(pop.channels.len(), 20);
        assert_eq!(pop.users.len(), 40);
        assert_eq!(pop.channels_by_team.len(), 4);
        for in_team in &pop.channels_by_team {
            assert_eq!(in_team.len(), 5);
        }
    }

    #[test]
    fn test_names_are_index_derived() {
        let pop = distribute(&test_config());
        assert_eq!(pop.teams[2].name, "loadtestteam2");
        assert_eq!(pop.channels[7].team, "loadtestteam1");
        assert_eq!(pop.channels[7].name, "loadtestchannel2");
        assert_eq!(pop.users[13].username, "user13");
        assert_eq!(pop.users[13].email, "success+user13@simulator.amazonses.com");
    }

    #[test]
    fn test_distribution_is_deterministic() {
        let config = test_config();
        assert_eq!(distribute(&config), distribute(&config));
    }

    #[test]
    fn test_seed_changes_the_distribution() {
        let mut other = test_config();
        other.seed = 30;
        let a = distribute(&test_config());
        let b = distribute(&other);
        // Entities are identical; memberships should not be.
        assert_eq!(a.teams, b.teams);
        assert_ne!(a.users, b.users);
    }

    #[test]
    fn test_choice_tables_reference_valid_memberships() {
        let pop = distribute(&test_config());
        let weights = [4u32, 2, 1];
        for user in &pop.users {
            assert_eq!(user.team_choice.len(), user.teams.len());
            for choice in &user.team_choice {
                assert!(choice.item < user.teams.len());
                assert!(weights.contains(&choice.weight));
            }
            for membership in &user.teams {
                assert_eq!(membership.channel_choice.len(), membership.channels.len());
                for choice in &membership.channel_choice {
                    assert!(choice.item < membership.channels.len());
                    assert!(weights.contains(&choice.weight));
                }
            }
        }
    }

    #[test]
    fn test_channel_memberships_never_exceed_team_membership() {
        // Oversubscribed fractions must cap, not overflow.
        let mut config = test_config();
        config.profile = VolumeProfile {
            team_tiers: TierSplit {
                high: 0.5,
                mid: 0.5,
                low: 0.5,
            },
            team_members: TierSplit {
                high: 0.9,
                mid: 0.9,
                low: 0.9,
            },
            team_weights: TierWeights {
                high: 4,
                mid: 2,
                low: 1,
            },
            channel_tiers: TierSplit {
                high: 0.5,
                mid: 0.5,
                low: 0.5,
            },
            channel_members: TierSplit {
                high: 1.5,
                mid: 1.5,
                low: 1.5,
            },
            channel_weights: TierWeights {
                high: 4,
                mid: 2,
                low: 1,
            },
        };
        let pop = distribute(&config);

        // Members per team, then members per (team, channel).
        let mut team_members: HashMap<&str, usize> = HashMap::new();
        let mut channel_members: HashMap<(&str, &str), usize> = HashMap::new();
        for user in &pop.users {
            for membership in &user.teams {
                *team_members.entry(membership.name.as_str()).or_default() += 1;
                for channel in &membership.channels {
                    *channel_members
                        .entry((membership.name.as_str(), channel.name.as_str()))
                        .or_default() += 1;
                }
            }
        }

        for ((team, _), &count) in &channel_members {
            assert!(count <= team_members[team]);
        }
    }

    #[test]
    fn test_degenerate_configs_degrade_gracefully() {
        let mut config = test_config();
        config.num_users = 0;
        let pop = distribute(&config);
        assert!(pop.users.is_empty());
        assert_eq!(pop.teams.len(), 4);

        let mut config = test_config();
        config.num_teams = 0;
        let pop = distribute(&config);
        assert!(pop.teams.is_empty());
        assert!(pop.channels.is_empty());
        assert!(pop.users.iter().all(|u| u.teams.is_empty()));
    }

    #[test]
    fn test_high_tier_attracts_more_members() {
        // With a wide gap between tier fractions, the busiest team must
        // have more members than the quietest.
        let mut config = test_config();
        config.num_users = 200;
        config.profile.team_tiers = TierSplit {
            high: 0.25,
            mid: 0.25,
            low: 0.5,
        };
        config.profile.team_members = TierSplit {
            high: 0.9,
            mid: 0.4,
            low: 0.05,
        };
        let pop = distribute(&config);

        let mut members: HashMap<&str, usize> = HashMap::new();
        for user in &pop.users {
            for membership in &user.teams {
                *members.entry(membership.name.as_str()).or_default() += 1;
            }
        }
        let max = members.values().max().copied().unwrap_or(0);
        let min = members.values().min().copied().unwrap_or(0);
        assert!(max >= 180, "high tier team should be near 0.9 * 200, got {max}");
        assert!(min <= 10, "low tier team should be near 0.05 * 200, got {min}");
    }
}
