pub mod config;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use herald_shared::clients::db::create_pool;
use herald_shared::clients::email::{EmailClient, LogTransport, MailTransport};
use herald_shared::clients::smtp::{SmtpClient, SmtpSettings};

use crate::config::{AppConfig, MailTransportKind, StorageBackend};
use crate::repository::{
    InMemoryNotificationRepository, InMemoryPreferenceRepository, NotificationRepository,
    PgNotificationRepository, PgPreferenceRepository, PreferenceRepository,
};
use crate::services::NotificationService;

pub struct AppState {
    pub config: AppConfig,
    pub service: NotificationService,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire storage and mail transport according to `config`.
    pub fn from_config(
        config: AppConfig,
        metrics_handle: Option<PrometheusHandle>,
    ) -> anyhow::Result<Self> {
        let (preferences, notifications) = build_storage(&config)?;
        let mailer = build_mailer(&config)?;

        Ok(Self {
            service: NotificationService::new(preferences, notifications, mailer),
            config,
            metrics_handle,
        })
    }
}

fn build_storage(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn PreferenceRepository>, Arc<dyn NotificationRepository>)> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url, config.db_pool_size)?;
            Ok((
                Arc::new(PgPreferenceRepository::new(pool.clone())),
                Arc::new(PgNotificationRepository::new(pool)),
            ))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, data is lost on restart");
            Ok((
                Arc::new(InMemoryPreferenceRepository::new()),
                Arc::new(InMemoryNotificationRepository::new()),
            ))
        }
    }
}

fn build_mailer(config: &AppConfig) -> anyhow::Result<Arc<dyn MailTransport>> {
    let mailer: Arc<dyn MailTransport> = match config.mail_transport {
        MailTransportKind::Resend => {
            let mut client = EmailClient::new(
                &config.resend_api_key,
                &config.mail_from_email,
                &config.mail_from_name,
                config.mail_timeout(),
            )?;
            if let Some(url) = &config.resend_api_url {
                client = client.with_api_url(url.clone());
            }
            Arc::new(client)
        }
        MailTransportKind::Smtp => Arc::new(SmtpClient::new(&SmtpSettings {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            username: config.smtp_username.clone(),
            password: config.smtp_password.clone(),
            from_email: config.mail_from_email.clone(),
            from_name: config.mail_from_name.clone(),
            timeout: config.mail_timeout(),
        })?),
        MailTransportKind::Log => Arc::new(LogTransport),
    };

    tracing::info!(transport = ?config.mail_transport, "mail transport configured");
    Ok(mailer)
}
