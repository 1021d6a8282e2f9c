//! Command-line entry point for the scan-to-subscribe dialog
//!
//! Feeds a QR payload, a QR image or a typed topic into the dialog, prompts
//! for credentials when the server asks for them and saves the subscription.

mod cli;
mod image_input;
mod session;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use qr_subscribe_app::{AppConfig, AppStateBuilder};
use qr_subscribe_core::scanner::RqrrScanner;
use qr_subscribe_core::traits::QrScanner;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;
use session::{Input, LoginArgs, PrintListener};

#[tokio::main]
async fn main() -> ExitCode {
    // 日志输出到 stderr，stdout 留给结果
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.config_path();
    let mut config = AppConfig::load(&config_path)
        .await
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    cli.config.apply(&mut config);

    let state = AppStateBuilder::new()
        .config(config)
        .build()
        .context("Failed to initialize")?;

    let (input, scanner) = input_from(&cli);
    let handle = state
        .open_dialog(Arc::new(PrintListener), scanner)
        .await
        .context("Failed to open subscribe dialog")?;

    let login = LoginArgs {
        username: cli.username,
        password: cli.password,
    };
    let outcome = session::drive(&handle, input, cli.instant, login).await?;
    // 等待扫描线程退出
    handle.closed().await;

    match state.record_outcome(&outcome).await? {
        Some(subscription) => {
            tracing::debug!("Recorded {subscription:?}");
            Ok(())
        }
        None => anyhow::bail!("Subscription cancelled"),
    }
}

fn input_from(cli: &Cli) -> (Input, Option<Box<dyn QrScanner>>) {
    if let Some(path) = &cli.input.image {
        let input = Input::Image {
            path: path.clone(),
            timeout: Duration::from_secs(cli.scan_timeout),
        };
        return (input, Some(Box::new(RqrrScanner::new())));
    }
    if let Some(topic) = &cli.input.topic {
        let input = Input::Manual {
            topic: topic.clone(),
            server: cli.server.clone(),
        };
        return (input, None);
    }
    // clap 保证三者之一存在
    (Input::Payload(cli.input.payload.clone().unwrap_or_default()), None)
}
