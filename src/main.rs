use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::MissedTickBehavior;
use together_bot::config::Config;
use together_bot::control::Controller;
use together_bot::engine::Engine;
use together_bot::notify::{LogNotifier, Notifier, Webhook};
use together_bot::store::Store;
use together_bot::together::TogetherRest;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries control responses, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("together_bot=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(Path::new("config.toml"))?;
    let store = Arc::new(Store::open(&config.store.path)?);
    let rest = Arc::new(TogetherRest::new(&config.together));

    // --- Phase 1: Probe the platform session ---
    match rest.session_ok().await {
        Ok(true) => tracing::info!("platform session is live"),
        Ok(false) => tracing::warn!(
            "not signed in; likes and comments will be rejected until a session cookie is provided"
        ),
        Err(e) => tracing::warn!(error = %e, "session probe failed"),
    }

    let notifier: Arc<dyn Notifier> = match &config.notify.webhook_url {
        Some(url) => Arc::new(Webhook::new(url.clone())),
        None => Arc::new(LogNotifier),
    };

    let engine = Arc::new(Engine::new(
        rest,
        store,
        notifier,
        config.discovery.clone(),
        config.pacing.clone(),
    ));
    let controller = Controller::new(engine.clone());

    // --- Phase 2: Spawn the periodic run loop ---
    let interval_minutes = config.schedule.interval_minutes;
    tracing::info!(interval_minutes, "scheduler armed");
    let engine_timer = engine.clone();
    let scheduler = tokio::spawn(async move {
        let mut timer = tokio::time::interval(Duration::from_secs(interval_minutes * 60));
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            // First tick fires immediately, so startup gets a sweep.
            timer.tick().await;
            let result = engine_timer.run().await;
            tracing::info!(
                success = result.success,
                processed = result.processed_count,
                "scheduled run finished"
            );
        }
    });

    // --- Phase 3: Serve control requests over stdin, one JSON object per line ---
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = controller.handle_line(&line).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    tracing::info!("control stream closed, shutting down");
    scheduler.abort();
    Ok(())
}
