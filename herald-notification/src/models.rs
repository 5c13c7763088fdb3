use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use herald_shared::clients::email::EmailError;

/// Delivery channel for a user's notifications. Email is the only channel today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelType {
    Email,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMAIL" => Ok(Self::Email),
            other => Err(format!("unknown channel type: {other}")),
        }
    }
}

/// Outcome of the single delivery attempt made for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Succeeded,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        }
    }

    /// Transport errors become data: any `Err` is a `Failed` record, never a request failure.
    pub fn from_outcome(outcome: &Result<(), EmailError>) -> Self {
        match outcome {
            Ok(()) => Self::Succeeded,
            Err(_) => Self::Failed,
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCEEDED" => Ok(Self::Succeeded),
            "FAILED" => Ok(Self::Failed),
            other => Err(format!("unknown delivery status: {other}")),
        }
    }
}

/// A user's notification preference. At most one exists per `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPreference {
    pub id: Uuid,
    pub user_id: Uuid,
    pub channel_type: ChannelType,
    pub contact_info: String,
    pub enabled: bool,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// Values written by a preference upsert.
#[derive(Debug, Clone)]
pub struct PreferenceUpsert {
    pub user_id: Uuid,
    pub channel_type: ChannelType,
    pub contact_info: String,
    pub enabled: bool,
}

impl PreferenceUpsert {
    /// The record to insert when the user has no preference yet.
    pub fn into_new_preference(self, now: DateTime<Utc>) -> NotificationPreference {
        NotificationPreference {
            id: Uuid::now_v7(),
            user_id: self.user_id,
            channel_type: self.channel_type,
            contact_info: self.contact_info,
            enabled: self.enabled,
            created_on: now,
            updated_on: now,
        }
    }
}

/// Persisted record of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub body: String,
    pub channel_type: ChannelType,
    pub status: DeliveryStatus,
    pub created_on: DateTime<Utc>,
    pub deleted: bool,
}

impl Notification {
    /// A fresh, non-deleted email notification with the given outcome.
    pub fn email(user_id: Uuid, subject: &str, body: &str, status: DeliveryStatus) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            subject: subject.to_string(),
            body: body.to_string(),
            channel_type: ChannelType::Email,
            status,
            created_on: Utc::now(),
            deleted: false,
        }
    }
}
