//! Bulk-import record format.

use chatload_core::{Channel, Team, User};
use serde::Serialize;

/// Schema version stamped on every bulk-import record.
pub const IMPORT_VERSION: u32 = 1;

/// A message in import form, threaded under its channel and author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostImport {
    pub team: String,
    pub channel: String,
    pub user: String,
    pub message: String,
    pub create_at: i64,
}

/// One line of the bulk-import stream.
///
/// Tagged union over the record types the import format understands. The
/// bulkload stream emits version, team, channel and user records; the
/// post variant belongs to the same format for import files carrying
/// message history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BulkRecord {
    Version { version: u32 },
    Team { team: Team, version: u32 },
    Channel { channel: Channel, version: u32 },
    User { user: User, version: u32 },
    Post { post: PostImport, version: u32 },
}

impl BulkRecord {
    pub fn version() -> Self {
        BulkRecord::Version {
            version: IMPORT_VERSION,
        }
    }

    pub fn team(team: Team) -> Self {
        BulkRecord::Team {
            team,
            version: IMPORT_VERSION,
        }
    }

    pub fn channel(channel: Channel) -> Self {
        BulkRecord::Channel {
            channel,
            version: IMPORT_VERSION,
        }
    }

    pub fn user(user: User) -> Self {
        BulkRecord::User {
            user,
            version: IMPORT_VERSION,
        }
    }

    pub fn post(post: PostImport) -> Self {
        BulkRecord::Post {
            post,
            version: IMPORT_VERSION,
        }
    }
}
