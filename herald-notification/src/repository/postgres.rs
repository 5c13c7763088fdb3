use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use uuid::Uuid;

use herald_shared::clients::db::{checkout, DbPool};
use herald_shared::errors::{AppError, AppResult};

use super::{NotificationRepository, PreferenceRepository};
use crate::models::{Notification, NotificationPreference, PreferenceUpsert};
use crate::schema::{notification_preferences, notifications};

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = notification_preferences)]
struct PreferenceRow {
    id: Uuid,
    user_id: Uuid,
    channel_type: String,
    contact_info: String,
    enabled: bool,
    created_on: DateTime<Utc>,
    updated_on: DateTime<Utc>,
}

impl From<NotificationPreference> for PreferenceRow {
    fn from(p: NotificationPreference) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            channel_type: p.channel_type.as_str().to_string(),
            contact_info: p.contact_info,
            enabled: p.enabled,
            created_on: p.created_on,
            updated_on: p.updated_on,
        }
    }
}

impl TryFrom<PreferenceRow> for NotificationPreference {
    type Error = AppError;

    fn try_from(row: PreferenceRow) -> AppResult<Self> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            channel_type: row.channel_type.parse().map_err(AppError::internal)?,
            contact_info: row.contact_info,
            enabled: row.enabled,
            created_on: row.created_on,
            updated_on: row.updated_on,
        })
    }
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = notifications)]
struct NotificationRow {
    id: Uuid,
    user_id: Uuid,
    subject: String,
    body: String,
    channel_type: String,
    status: String,
    created_on: DateTime<Utc>,
    deleted: bool,
}

impl From<Notification> for NotificationRow {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            subject: n.subject,
            body: n.body,
            channel_type: n.channel_type.as_str().to_string(),
            status: n.status.as_str().to_string(),
            created_on: n.created_on,
            deleted: n.deleted,
        }
    }
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> AppResult<Self> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            subject: row.subject,
            body: row.body,
            channel_type: row.channel_type.parse().map_err(AppError::internal)?,
            status: row.status.parse().map_err(AppError::internal)?,
            created_on: row.created_on,
            deleted: row.deleted,
        })
    }
}

pub struct PgPreferenceRepository {
    pool: DbPool,
}

impl PgPreferenceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl PreferenceRepository for PgPreferenceRepository {
    fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<NotificationPreference>> {
        let mut conn = checkout(&self.pool)?;

        notification_preferences::table
            .filter(notification_preferences::user_id.eq(user_id))
            .first::<PreferenceRow>(&mut conn)
            .optional()?
            .map(NotificationPreference::try_from)
            .transpose()
    }

    fn upsert(&self, upsert: PreferenceUpsert, now: DateTime<Utc>) -> AppResult<NotificationPreference> {
        let mut conn = checkout(&self.pool)?;
        let row = PreferenceRow::from(upsert.into_new_preference(now));

        // Relies on the UNIQUE constraint on user_id; id and created_on of the
        // conflicting row are left untouched.
        let saved = diesel::insert_into(notification_preferences::table)
            .values(&row)
            .on_conflict(notification_preferences::user_id)
            .do_update()
            .set((
                notification_preferences::channel_type
                    .eq(excluded(notification_preferences::channel_type)),
                notification_preferences::contact_info
                    .eq(excluded(notification_preferences::contact_info)),
                notification_preferences::enabled.eq(excluded(notification_preferences::enabled)),
                notification_preferences::updated_on
                    .eq(excluded(notification_preferences::updated_on)),
            ))
            .get_result::<PreferenceRow>(&mut conn)?;

        saved.try_into()
    }

    fn ping(&self) -> AppResult<()> {
        let mut conn = checkout(&self.pool)?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }
}

pub struct PgNotificationRepository {
    pool: DbPool,
}

impl PgNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl NotificationRepository for PgNotificationRepository {
    fn save(&self, notification: Notification) -> AppResult<Notification> {
        let mut conn = checkout(&self.pool)?;

        let saved = diesel::insert_into(notifications::table)
            .values(&NotificationRow::from(notification))
            .get_result::<NotificationRow>(&mut conn)?;

        saved.try_into()
    }

    fn find_active_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let mut conn = checkout(&self.pool)?;

        // Ids are UUIDv7, so (created_on, id) is insertion order.
        notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::deleted.eq(false))
            .order((notifications::created_on.asc(), notifications::id.asc()))
            .load::<NotificationRow>(&mut conn)?
            .into_iter()
            .map(Notification::try_from)
            .collect()
    }
}
