//! Persistence collaborators for preferences and notification records.
//!
//! Both traits are synchronous, matching diesel. The PostgreSQL implementations
//! are used in production; the in-memory ones back local development and tests.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use herald_shared::errors::AppResult;

use crate::models::{Notification, NotificationPreference, PreferenceUpsert};

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryNotificationRepository, InMemoryPreferenceRepository};
pub use postgres::{PgNotificationRepository, PgPreferenceRepository};

pub trait PreferenceRepository: Send + Sync {
    fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<NotificationPreference>>;

    /// Atomically insert a preference for `upsert.user_id`, or overwrite the channel
    /// type, contact info, enabled flag and `updated_on` of the existing one.
    /// `id` and `created_on` of an existing record are never changed.
    fn upsert(&self, upsert: PreferenceUpsert, now: DateTime<Utc>) -> AppResult<NotificationPreference>;

    /// Cheap reachability probe used by the health endpoint.
    fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

pub trait NotificationRepository: Send + Sync {
    fn save(&self, notification: Notification) -> AppResult<Notification>;

    /// Non-deleted notifications of one user, in insertion order.
    fn find_active_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<Notification>>;
}
