use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use herald_shared::errors::AppResult;

use crate::models::{ChannelType, NotificationPreference, PreferenceUpsert};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPreferenceRequest {
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub contact_info: String,
    pub notification_enabled: bool,
}

impl From<UpsertPreferenceRequest> for PreferenceUpsert {
    fn from(req: UpsertPreferenceRequest) -> Self {
        Self {
            user_id: req.user_id,
            channel_type: req.channel_type,
            contact_info: req.contact_info,
            enabled: req.notification_enabled,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub contact_info: String,
    pub enabled: bool,
}

impl From<NotificationPreference> for PreferenceResponse {
    fn from(p: NotificationPreference) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            channel_type: p.channel_type,
            contact_info: p.contact_info,
            enabled: p.enabled,
        }
    }
}

/// POST /api/v1/notifications/preferences
/// Create or overwrite the caller's notification preference.
pub async fn upsert_preference(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpsertPreferenceRequest>,
) -> AppResult<(StatusCode, Json<PreferenceResponse>)> {
    let preference = state.service.upsert_preference(req.into())?;

    Ok((StatusCode::CREATED, Json(preference.into())))
}

/// GET /api/v1/notifications/preferences?userId=
pub async fn get_preference(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserIdQuery>,
) -> AppResult<Json<PreferenceResponse>> {
    let preference = state.service.get_preference(query.user_id)?;

    Ok(Json(preference.into()))
}
