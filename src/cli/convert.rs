use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use super::ui::{self, StyleType, TerminalPresenter};
use crate::core::config::AppConfig;
use crate::core::currency::PLACEHOLDER;
use crate::core::{ConversionController, ConversionRequest, Presenter, RateFetcher, Session};
use crate::providers::ApiLayerFetcher;

/// Builds a controller backed by the configured quote provider.
pub fn build_controller(config: &AppConfig) -> Result<ConversionController> {
    let api_key = config.access_key()?;
    let fetcher: Arc<dyn RateFetcher> = Arc::new(ApiLayerFetcher::new(&config.provider)?);
    Ok(ConversionController::new(fetcher, &api_key))
}

/// Turns typed-in codes into what a currency picker would hand over.
fn request_from(config: &AppConfig, amount: &str, from: &str, to: &str) -> ConversionRequest {
    let select = |input: &str| {
        config
            .select(input)
            .map_or_else(|| PLACEHOLDER.to_string(), |code| code.to_string())
    };
    ConversionRequest {
        amount: amount.to_string(),
        source: select(from),
        target: select(to),
    }
}

/// Reads `<amount> <from> <to>` lines until EOF or `quit`, feeding one
/// session so repeated pairs are served from its cache.
pub async fn run_lines<R, P>(
    config: &AppConfig,
    controller: ConversionController,
    presenter: P,
    reader: R,
) -> Result<P>
where
    R: AsyncBufRead + Unpin,
    P: Presenter + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    let session = tokio::spawn(Session::new(controller, presenter).run(rx));

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        let mut parts = line.split_whitespace();
        let amount = parts.next().unwrap_or_default();
        let from = parts.next().unwrap_or_default();
        let to = parts.next().unwrap_or_default();
        debug!(amount, from, to, "Read conversion request");

        if tx.send(request_from(config, amount, from, to)).await.is_err() {
            break;
        }
    }
    drop(tx);

    session.await.context("Conversion session stopped unexpectedly")
}

/// Runs a single conversion. A failed conversion is an error, so the process
/// exits non-zero.
pub async fn convert(config: &AppConfig, amount: &str, from: &str, to: &str) -> Result<()> {
    let controller = build_controller(config)?;
    let presenter = convert_with(config, controller, TerminalPresenter::new(), amount, from, to)
        .await;
    if let Some(failure) = presenter.last_failure() {
        bail!("Conversion failed: {failure}");
    }
    Ok(())
}

async fn convert_with<P: Presenter>(
    config: &AppConfig,
    controller: ConversionController,
    presenter: P,
    amount: &str,
    from: &str,
    to: &str,
) -> P {
    let (tx, rx) = mpsc::channel(1);
    let session = Session::new(controller, presenter);
    // Capacity 1 and a fresh channel, so this send never waits.
    let _ = tx.send(request_from(config, amount, from, to)).await;
    drop(tx);
    session.run(rx).await
}

pub async fn interactive(config: &AppConfig) -> Result<()> {
    let controller = build_controller(config)?;
    println!(
        "{}",
        ui::style_text("Enter <amount> <from> <to>, or quit", StyleType::Subtle)
    );
    run_lines(
        config,
        controller,
        TerminalPresenter::new(),
        BufReader::new(tokio::io::stdin()),
    )
    .await?;
    Ok(())
}

pub fn list_currencies(config: &AppConfig) {
    println!("{}", ui::style_text("Currencies", StyleType::Title));
    if config.currencies.is_empty() {
        println!(
            "{}",
            ui::style_text("Any currency code is accepted", StyleType::Subtle)
        );
    }
    for code in &config.currencies {
        println!("  {code}");
    }
}
