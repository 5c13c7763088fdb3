use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use herald_shared::errors::AppResult;

use super::preferences::UserIdQuery;
use crate::models::{ChannelType, DeliveryStatus, Notification};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    pub user_id: Uuid,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub subject: String,
    pub status: DeliveryStatus,
    pub created_on: DateTime<Utc>,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            subject: n.subject,
            status: n.status,
            created_on: n.created_on,
            channel_type: n.channel_type,
        }
    }
}

/// POST /api/v1/notifications
/// Attempt delivery once and return the stored record. A failed delivery still
/// answers 201 with status FAILED.
pub async fn send_notification(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendNotificationRequest>,
) -> AppResult<(StatusCode, Json<NotificationResponse>)> {
    let notification = state
        .service
        .send_notification(req.user_id, &req.subject, &req.body)
        .await?;

    Ok((StatusCode::CREATED, Json(notification.into())))
}

/// GET /api/v1/notifications?userId=
pub async fn notification_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserIdQuery>,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let history = state
        .service
        .notification_history(query.user_id)?
        .into_iter()
        .map(NotificationResponse::from)
        .collect();

    Ok(Json(history))
}
