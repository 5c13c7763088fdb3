use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use herald_shared::errors::{AppError, AppResult};

use super::{NotificationRepository, PreferenceRepository};
use crate::models::{Notification, NotificationPreference, PreferenceUpsert};

fn poisoned<T>(_: PoisonError<T>) -> AppError {
    AppError::internal("in-memory store lock poisoned")
}

/// Preferences keyed by user id. The write lock makes `upsert` atomic.
#[derive(Default)]
pub struct InMemoryPreferenceRepository {
    records: RwLock<HashMap<Uuid, NotificationPreference>>,
}

impl InMemoryPreferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceRepository for InMemoryPreferenceRepository {
    fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<NotificationPreference>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.get(&user_id).cloned())
    }

    fn upsert(&self, upsert: PreferenceUpsert, now: DateTime<Utc>) -> AppResult<NotificationPreference> {
        let mut records = self.records.write().map_err(poisoned)?;

        match records.entry(upsert.user_id) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.channel_type = upsert.channel_type;
                existing.contact_info = upsert.contact_info;
                existing.enabled = upsert.enabled;
                existing.updated_on = now;
                Ok(existing.clone())
            }
            Entry::Vacant(entry) => Ok(entry.insert(upsert.into_new_preference(now)).clone()),
        }
    }
}

/// Notification records in insertion order.
#[derive(Default)]
pub struct InMemoryNotificationRepository {
    records: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationRepository for InMemoryNotificationRepository {
    fn save(&self, notification: Notification) -> AppResult<Notification> {
        let mut records = self.records.write().map_err(poisoned)?;
        records.push(notification.clone());
        Ok(notification)
    }

    fn find_active_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|n| n.user_id == user_id && !n.deleted)
            .cloned()
            .collect())
    }
}
