use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use uuid::Uuid;

use herald_shared::clients::email::MailTransport;
use herald_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{DeliveryStatus, Notification, NotificationPreference, PreferenceUpsert};
use crate::repository::{NotificationRepository, PreferenceRepository};

/// Preference management, email dispatch and history over pluggable storage and transport.
#[derive(Clone)]
pub struct NotificationService {
    preferences: Arc<dyn PreferenceRepository>,
    notifications: Arc<dyn NotificationRepository>,
    mailer: Arc<dyn MailTransport>,
}

impl NotificationService {
    pub fn new(
        preferences: Arc<dyn PreferenceRepository>,
        notifications: Arc<dyn NotificationRepository>,
        mailer: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            preferences,
            notifications,
            mailer,
        }
    }

    /// Create the user's preference, or overwrite the existing one in place.
    pub fn upsert_preference(&self, upsert: PreferenceUpsert) -> AppResult<NotificationPreference> {
        let preference = self.preferences.upsert(upsert, Utc::now())?;

        tracing::info!(
            preference_id = %preference.id,
            user_id = %preference.user_id,
            channel_type = %preference.channel_type,
            enabled = preference.enabled,
            "notification preference saved"
        );

        Ok(preference)
    }

    /// Absence of a preference is an error, not an empty result.
    pub fn get_preference(&self, user_id: Uuid) -> AppResult<NotificationPreference> {
        self.preferences.find_by_user_id(user_id)?.ok_or_else(|| {
            AppError::new(
                ErrorCode::PreferenceNotFound,
                format!("Notification preference for user id {user_id} was not found."),
            )
        })
    }

    /// Make exactly one delivery attempt and persist its outcome.
    ///
    /// Fails only when the user has no preference or has opted out; in both cases
    /// nothing is sent and nothing is stored. A transport failure is recorded as a
    /// `FAILED` notification and the call still succeeds.
    pub async fn send_notification(
        &self,
        user_id: Uuid,
        subject: &str,
        body: &str,
    ) -> AppResult<Notification> {
        let preference = self.get_preference(user_id)?;

        if !preference.enabled {
            return Err(AppError::new(
                ErrorCode::NotificationsDisabled,
                format!("User with id {user_id} does not allow to receive notifications."),
            ));
        }

        let outcome = self.mailer.send(&preference.contact_info, subject, body).await;
        if let Err(e) = &outcome {
            tracing::warn!(
                user_id = %user_id,
                recipient = %preference.contact_info,
                error = %e,
                "failed to deliver notification email"
            );
        }

        let status = DeliveryStatus::from_outcome(&outcome);
        counter!("notifications_dispatched_total", "status" => status.as_str()).increment(1);

        let notification = self
            .notifications
            .save(Notification::email(user_id, subject, body, status))?;

        tracing::info!(
            notification_id = %notification.id,
            user_id = %user_id,
            status = %notification.status,
            "notification dispatched"
        );

        Ok(notification)
    }

    pub fn notification_history(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        self.notifications.find_active_by_user_id(user_id)
    }

    pub fn storage_ready(&self) -> AppResult<()> {
        self.preferences.ping()
    }
}
