use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Friends,
    You,
}

/// One instance of a fasting session, as stored in `scheduled_fasts` or
/// `community_fasts`. Timestamps are epoch milliseconds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledFast {
    pub id: String,
    pub creator_id: String,
    pub label: String,
    pub duration: u32,
    pub is_active: bool,
    pub participants: Vec<String>,
    pub visibility: Visibility,
    pub created: i64,
    pub join_deadline: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FriendStatus {
    Friends,
    RequestSent,
    RequestReceived,
}

impl FriendStatus {
    /// The status as seen from the other side of the relationship.
    pub fn mirrored(self) -> Self {
        match self {
            FriendStatus::RequestSent => FriendStatus::RequestReceived,
            FriendStatus::RequestReceived => FriendStatus::RequestSent,
            FriendStatus::Friends => FriendStatus::Friends,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: String,
    pub name: String,
    pub status: FriendStatus,
    pub active_fast_id: String,
    pub friends_since: i64,
}
