use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_directives(service_name: &str) -> String {
    // Cargo package names use dashes, tracing targets use underscores.
    let target = service_name.replace('-', "_");
    format!("info,{target}=debug,herald_shared=debug,tower_http=debug")
}

fn is_production() -> bool {
    std::env::var("HERALD_ENV")
        .map(|v| v == "production")
        .unwrap_or(false)
}

pub fn init_tracing(service_name: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name)));

    if is_production() {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    tracing::info!(service = service_name, production = is_production(), "tracing initialized");
}
