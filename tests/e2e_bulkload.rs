//! End-to-end checks over the generate-then-encode pipeline.

use chatload_bulk::encode_population;
use chatload_core::{GenerationConfig, TierSplit, TierWeights, VolumeProfile};
use chatload_population::distribute;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Config from the reference scenario: 2 teams, 3 channels each, 10
/// users, 20/30/50 tier splits summing to 1.0.
fn reference_config() -> GenerationConfig {
    let split = TierSplit {
        high: 0.2,
        mid: 0.3,
        low: 0.5,
    };
    let weights = TierWeights {
        high: 4,
        mid: 2,
        low: 1,
    };
    GenerationConfig {
        num_teams: 2,
        num_channels_per_team: 3,
        num_users: 10,
        seed: 29,
        profile: VolumeProfile {
            team_tiers: split,
            team_members: TierSplit {
                high: 0.5,
                mid: 0.25,
                low: 0.1,
            },
            team_weights: weights,
            channel_tiers: split,
            channel_members: TierSplit {
                high: 0.3,
                mid: 0.2,
                low: 0.1,
            },
            channel_weights: weights,
        },
    }
}

fn parse_lines(data: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8(data.to_vec())
        .expect("stream is valid UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is one JSON record"))
        .collect()
}

#[tokio::test]
async fn bulkload_stream_has_the_contractual_order() {
    let population = distribute(&reference_config());
    let stream = encode_population(&population).await.unwrap();

    let lines = parse_lines(&stream.data);
    assert_eq!(lines.len(), 1 + 2 + 6 + 10);

    assert_eq!(lines[0]["type"], "version");
    assert_eq!(lines[0]["version"], 1);
    assert!(lines[1..3].iter().all(|l| l["type"] == "team"));
    assert!(lines[3..9].iter().all(|l| l["type"] == "channel"));
    assert!(lines[9..].iter().all(|l| l["type"] == "user"));
}

#[tokio::test]
async fn every_user_record_has_a_bounded_team_list() {
    let population = distribute(&reference_config());
    let stream = encode_population(&population).await.unwrap();

    for line in parse_lines(&stream.data) {
        if line["type"] == "user" {
            let teams = line["user"]["teams"].as_array().expect("teams is a list");
            assert!(teams.len() <= 2);
        }
    }
}

#[tokio::test]
async fn bulkload_stream_is_reproducible() {
    let config = reference_config();

    let first = encode_population(&distribute(&config)).await.unwrap();
    let second = encode_population(&distribute(&config)).await.unwrap();

    assert_eq!(first.data, second.data);
}

#[tokio::test]
async fn distributed_users_can_pick_an_active_channel() {
    let mut config = reference_config();
    config.num_users = 50;
    // Everyone joins everything, so every pick must land.
    config.profile.team_members = TierSplit {
        high: 1.0,
        mid: 1.0,
        low: 1.0,
    };
    config.profile.channel_members = TierSplit {
        high: 1.0,
        mid: 1.0,
        low: 1.0,
    };
    let population = distribute(&config);

    let mut rng = StdRng::seed_from_u64(7);
    for user in &population.users {
        let (team, channel) = user
            .pick_active_team_and_channel(&mut rng)
            .expect("choice tables are well formed")
            .expect("fully joined users always have a pick");
        assert!(team.channels.iter().any(|c| c.name == channel.name));
    }
}
