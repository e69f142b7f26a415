use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{AggregateStats, History};

/// Single local player; every profile on a device shares this id.
pub const LOCAL_USER_ID: u32 = 1;

/// Name used when signing in with an empty username.
pub const GUEST_USERNAME: &str = "Guest";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u32,
    pub username: String,
    pub email: String,
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub history: History,
    #[serde(default)]
    pub stats: AggregateStats,
}

impl UserProfile {
    pub fn new(username: &str, email: &str, joined_at: DateTime<Utc>) -> Self {
        let username = match username.trim() {
            "" => GUEST_USERNAME,
            name => name,
        };
        Self {
            id: LOCAL_USER_ID,
            username: username.to_string(),
            email: email.trim().to_string(),
            joined_at,
            history: History::new(),
            stats: AggregateStats::default(),
        }
    }
}
