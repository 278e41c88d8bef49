use std::net::Ipv4Addr;
use std::sync::Arc;

use anyhow::Context as _;
use courier::MailDispatcher;

mod error;
mod routes;
mod settings;

use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Arc::new(Settings::load().context("loading settings")?);
    tracing::info!(profile = %settings.profile, "settings loaded");

    let mailer = MailDispatcher::from_config(&settings.mail).context("configuring mail")?;

    let port = settings.port;
    let routes = routes::api_router(settings, mailer);
    courier::serve((Ipv4Addr::UNSPECIFIED, port), routes)
        .await
        .context("error running HTTP server")?;
    Ok(())
}
