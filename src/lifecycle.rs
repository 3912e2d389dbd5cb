use crate::catalog::{SessionTemplate, SESSION_CATALOG};
use crate::error::StoreError;
use crate::models::{ScheduledFast, Visibility};
use crate::store::{DocumentStore, Filter, WriteBatch, COMMUNITY_FASTS, SCHEDULED_FASTS};
use crate::utils::epoch_millis;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Creator id stamped on every system-generated session.
pub const SERVICE_CREATOR_ID: &str = "admin";

/// Flips every active scheduled session to inactive. Returns how many were
/// flipped.
pub fn deactivate_active(store: &dyn DocumentStore) -> Result<usize, StoreError> {
    let docs = store.query(SCHEDULED_FASTS, &Filter::eq("isActive", true))?;
    let mut batch = WriteBatch::new();

    for doc in docs {
        let mut data = doc.data;
        match data.as_object_mut() {
            Some(fields) => {
                fields.insert("isActive".to_string(), Value::Bool(false));
            }
            None => {
                return Err(StoreError::InvalidDocument {
                    collection: SCHEDULED_FASTS.to_string(),
                    id: doc.id,
                    reason: "not a JSON object".to_string(),
                })
            }
        }
        batch.set(SCHEDULED_FASTS, &doc.id, data);
    }

    let count = batch.len();
    store.commit(batch)?;
    Ok(count)
}

/// Deletes every inactive scheduled session. Nothing is archived.
pub fn reap_inactive(store: &dyn DocumentStore) -> Result<usize, StoreError> {
    let docs = store.query(SCHEDULED_FASTS, &Filter::eq("isActive", false))?;
    let mut batch = WriteBatch::new();
    for doc in &docs {
        batch.delete(SCHEDULED_FASTS, &doc.id);
    }

    let count = batch.len();
    store.commit(batch)?;
    Ok(count)
}

/// Builds one live session per catalog entry. All sessions share `now` as
/// their creation time and `now + join_window` as their join deadline.
pub fn build_daily_fasts(
    catalog: &[SessionTemplate],
    now: DateTime<Utc>,
    join_window: Duration,
) -> Result<Vec<ScheduledFast>, StoreError> {
    let created = epoch_millis(now);
    let join_deadline = now
        .checked_add_signed(join_window)
        .map(epoch_millis)
        .ok_or_else(|| StoreError::OutOfRange(format!("{} + {}", now, join_window)))?;

    let fasts = catalog
        .iter()
        .map(|template| ScheduledFast {
            id: Uuid::new_v4().to_string(),
            creator_id: SERVICE_CREATOR_ID.to_string(),
            label: template.label.to_string(),
            duration: template.duration,
            is_active: true,
            participants: Vec::new(),
            visibility: Visibility::Public,
            created,
            join_deadline,
        })
        .collect();
    Ok(fasts)
}

/// Writes today's sessions. No dedup against what is already stored.
pub fn generate_daily(
    store: &dyn DocumentStore,
    now: DateTime<Utc>,
    join_window: Duration,
) -> Result<usize, StoreError> {
    let fasts = build_daily_fasts(&SESSION_CATALOG, now, join_window)?;
    let mut batch = WriteBatch::new();
    for fast in &fasts {
        batch.set(SCHEDULED_FASTS, &fast.id, serde_json::to_value(fast)?);
    }

    let count = batch.len();
    store.commit(batch)?;
    Ok(count)
}

pub fn is_expired(join_deadline: i64, now: i64) -> bool {
    now >= join_deadline
}

fn join_deadline_of(data: &Value) -> Option<i64> {
    let raw = data.get("joinDeadline")?;
    raw.as_i64().or_else(|| raw.as_f64().map(|ms| ms as i64))
}

/// Deletes community sessions whose join deadline has been reached. Scans
/// the whole collection.
pub fn expire_community(
    store: &dyn DocumentStore,
    now: DateTime<Utc>,
) -> Result<usize, StoreError> {
    let now_ms = epoch_millis(now);
    let docs = store.query(COMMUNITY_FASTS, &Filter::All)?;
    let mut batch = WriteBatch::new();

    for doc in &docs {
        match join_deadline_of(&doc.data) {
            Some(deadline) if is_expired(deadline, now_ms) => {
                batch.delete(COMMUNITY_FASTS, &doc.id);
            }
            Some(_) => {}
            None => {
                tracing::warn!(id = %doc.id, "Community session has no joinDeadline, skipping")
            }
        }
    }

    let count = batch.len();
    store.commit(batch)?;
    Ok(count)
}
