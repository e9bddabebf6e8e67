//! Synthetic post fabrication for one channel.

use crate::api::ApiUser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Alphabet of generated post identifiers.
const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ID_LEN: usize = 26;

/// Filler vocabulary for message bodies. Content realism is a non-goal;
/// messages only need plausible length and variety.
const FILLER_WORDS: &[&str] = &[
    "sync", "deploy", "review", "meeting", "update", "release", "ticket", "branch", "merge",
    "standup", "retro", "blocked", "shipped", "testing", "staging", "rollback", "incident",
    "metrics", "dashboard", "oncall",
];

/// Fabrication parameters shared by every channel of a run.
#[derive(Debug, Clone)]
pub struct FabricateConfig {
    /// Total posts for the whole run, split evenly across channel slots.
    pub num_posts: usize,
    /// Look-back window for creation timestamps, in seconds.
    pub post_time_range: i64,
    /// Probability that a non-root post replies to an existing thread root.
    pub reply_chance: f64,
    /// Rows per INSERT statement.
    pub batch_size: usize,
}

impl Default for FabricateConfig {
    fn default() -> Self {
        Self {
            num_posts: 10_000,
            post_time_range: 86_400,
            reply_chance: 0.3,
            batch_size: crate::insert::DEFAULT_BATCH_SIZE,
        }
    }
}

/// One fabricated post, shaped for the Posts insert statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub create_at: i64,
    pub user_id: String,
    pub channel_id: String,
    /// Empty for a thread root or standalone post.
    pub root_id: String,
    pub message: String,
}

/// Generate a fresh post identifier from the channel's random source.
pub fn new_post_id(rng: &mut StdRng) -> String {
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

fn filler_message(rng: &mut StdRng) -> String {
    let words = rng.gen_range(6..14);
    let mut message = String::from("PL");
    for _ in 0..words {
        message.push(' ');
        message.push_str(FILLER_WORDS[rng.gen_range(0..FILLER_WORDS.len())]);
    }
    message
}

/// Fabricates one channel's allocation of posts, batch by batch.
///
/// The first post of every batch starts a new thread root; later posts
/// reply to a uniformly chosen existing root with `reply_chance`,
/// otherwise they stand alone. Authors rotate through the member list
/// from a random starting offset. All randomness comes from the
/// fabricator's own seeded source, so a channel's posts are reproducible
/// independent of worker scheduling.
pub struct ChannelFabricator<'a> {
    rng: StdRng,
    channel_id: &'a str,
    authors: &'a [ApiUser],
    config: &'a FabricateConfig,
    target: usize,
    now_ms: i64,
    author_offset: usize,
    root_posts: Vec<String>,
    produced: usize,
}

impl<'a> ChannelFabricator<'a> {
    pub fn new(
        seed: u64,
        channel_id: &'a str,
        authors: &'a [ApiUser],
        config: &'a FabricateConfig,
        target: usize,
        now_ms: i64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let author_offset = if authors.is_empty() {
            0
        } else {
            rng.gen_range(0..authors.len())
        };
        Self {
            rng,
            channel_id,
            authors,
            config,
            target,
            now_ms,
            author_offset,
            root_posts: Vec::new(),
            produced: 0,
        }
    }

    /// Posts fabricated so far.
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Produce the next batch of at most `batch_size` posts, or `None`
    /// once the channel's allocation is exhausted. The final batch may be
    /// short; it is still meant to be inserted.
    pub fn next_batch(&mut self) -> Option<Vec<Post>> {
        if self.produced >= self.target || self.authors.is_empty() || self.config.batch_size == 0 {
            return None;
        }

        let size = self.config.batch_size.min(self.target - self.produced);
        let range_ms = (self.config.post_time_range * 1000).max(1);
        let base = self.produced;

        let mut posts = Vec::with_capacity(size);
        for j in 0..size {
            let id = new_post_id(&mut self.rng);
            let create_at = self.now_ms - self.rng.gen_range(0..range_ms);

            let root_id = if j == 0 {
                self.root_posts.push(id.clone());
                String::new()
            } else if !self.root_posts.is_empty()
                && self.rng.gen::<f64>() < self.config.reply_chance
            {
                self.root_posts[self.rng.gen_range(0..self.root_posts.len())].clone()
            } else {
                String::new()
            };

            let author = &self.authors[(self.author_offset + base + j) % self.authors.len()];
            let message = filler_message(&mut self.rng);

            posts.push(Post {
                id,
                create_at,
                user_id: author.id.clone(),
                channel_id: self.channel_id.to_string(),
                root_id,
                message,
            });
        }

        self.produced += size;
        Some(posts)
    }
}
