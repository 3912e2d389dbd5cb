//! Seeds fake friend relationships for a test account. Unrelated to the
//! session refresh.

use crate::error::StoreError;
use crate::models::{Friend, FriendStatus};
use crate::store::{DocumentStore, WriteBatch};

pub const FAKE_FRIEND_NAMES: [&str; 4] = [
    "Strict Rod",
    "Dry Pride",
    "Blank Flood",
    "Golf Purse",
];

const USERS: &str = "users";

pub fn fake_friend_id(name: &str) -> String {
    format!("fake-id-{}", name.to_lowercase().replacen(' ', "-", 1))
}

fn friends_of(user_id: &str) -> String {
    format!("{}/{}/friends", USERS, user_id)
}

pub fn generate_fake_friends() -> Vec<Friend> {
    FAKE_FRIEND_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| Friend {
            id: fake_friend_id(name),
            name: name.to_string(),
            status: if i % 2 == 0 {
                FriendStatus::RequestSent
            } else {
                FriendStatus::RequestReceived
            },
            active_fast_id: String::new(),
            friends_since: 0,
        })
        .collect()
}

/// Removes every fake user document and its entry in the recipient's
/// friend list.
pub fn clean_up_fake_friends(
    store: &dyn DocumentStore,
    recipient_id: &str,
) -> Result<usize, StoreError> {
    let mut batch = WriteBatch::new();
    for name in FAKE_FRIEND_NAMES {
        let fake_id = fake_friend_id(name);
        batch.delete(USERS, &fake_id);
        batch.delete(&friends_of(recipient_id), &fake_id);
    }

    let count = batch.len();
    store.commit(batch)?;
    Ok(count)
}

/// Writes both sides of each fake relationship. The recipient's copy carries
/// the mirrored status.
pub fn add_fake_friends(
    store: &dyn DocumentStore,
    recipient_id: &str,
) -> Result<usize, StoreError> {
    let mut batch = WriteBatch::new();
    for friend in generate_fake_friends() {
        batch.set(
            &friends_of(&friend.id),
            recipient_id,
            serde_json::to_value(&friend)?,
        );

        let recipient_copy = Friend {
            status: friend.status.mirrored(),
            ..friend.clone()
        };
        batch.set(
            &friends_of(recipient_id),
            &friend.id,
            serde_json::to_value(&recipient_copy)?,
        );
    }

    let count = batch.len();
    store.commit(batch)?;
    Ok(count)
}

/// Cleans up, then seeds. Failures are logged and do not stop the next step.
pub fn run(store: &dyn DocumentStore, recipient_id: &str) {
    tracing::info!("Cleaning up fake friends");
    match clean_up_fake_friends(store, recipient_id) {
        Ok(count) => tracing::info!(count, "Cleaned up fake friends"),
        Err(e) => tracing::error!(error = %e, "Error cleaning up fake friends"),
    }

    tracing::info!(recipient = recipient_id, "Generating fake friend requests");
    match add_fake_friends(store, recipient_id) {
        Ok(count) => tracing::info!(count, "Added fake friends"),
        Err(e) => tracing::error!(error = %e, "Error adding fake friends"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, Filter};
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_fake_friend_id() {
        assert_eq!(fake_friend_id("Strict Rod"), "fake-id-strict-rod");
        assert_eq!(fake_friend_id("A B C"), "fake-id-a-b c");
    }

    #[test]
    fn test_generate_fake_friends_alternates_status() {
        let friends = generate_fake_friends();
        assert_eq!(friends.len(), 4);
        assert_eq!(friends[0].status, FriendStatus::RequestSent);
        assert_eq!(friends[1].status, FriendStatus::RequestReceived);
        assert_eq!(friends[2].status, FriendStatus::RequestSent);
        assert!(friends.iter().all(|f| f.active_fast_id.is_empty() && f.friends_since == 0));
    }

    #[test]
    fn test_seed_and_clean() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = FileStore::from_path(dir.path().join("db.json"));

        assert_eq!(add_fake_friends(&store, "me")?, 8);

        let mine = store.query("users/me/friends", &Filter::All)?;
        assert_eq!(mine.len(), 4);
        let rod = mine.iter().find(|d| d.id == "fake-id-strict-rod").unwrap();
        assert_eq!(rod.data["status"], json!("request_received"));

        let theirs = store.query("users/fake-id-strict-rod/friends", &Filter::All)?;
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].id, "me");
        assert_eq!(theirs[0].data["status"], json!("request_sent"));

        // Running twice keeps one entry per fake.
        run(&store, "me");
        assert_eq!(store.query("users/me/friends", &Filter::All)?.len(), 4);

        clean_up_fake_friends(&store, "me")?;
        assert!(store.query("users/me/friends", &Filter::All)?.is_empty());

        Ok(())
    }

    #[test]
    fn test_empty_recipient_is_rejected() {
        let dir = tempdir().unwrap();
        let store = FileStore::from_path(dir.path().join("db.json"));

        let err = add_fake_friends(&store, "").unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
    }
}
