use anyhow::Context as _;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use url::Url;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use backend_bridge::runtime::spawn_backend_thread;
use controller::events::UiEvent;
use ui::{CatalogApp, StartupConfig};

const DEFAULT_SERVER_URL: &str = "http://localhost:3001";
const SERVER_URL_ENV_VAR: &str = "CATALOG_SERVER_URL";

#[derive(Debug, Parser)]
#[command(
    name = "catalog-desktop",
    about = "Desktop client for the product catalog service"
)]
struct CliArgs {
    /// Base URL of the catalog REST service. Falls back to the
    /// CATALOG_SERVER_URL environment variable, then the local default.
    #[arg(long)]
    server_url: Option<String>,
}

fn resolve_server_url(cli_value: Option<&str>) -> anyhow::Result<String> {
    let raw = cli_value
        .map(str::to_string)
        .or_else(|| {
            std::env::var(SERVER_URL_ENV_VAR)
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    let parsed = Url::parse(raw.trim())
        .with_context(|| format!("invalid catalog server URL '{raw}'"))?;
    Ok(parsed.to_string().trim_end_matches('/').to_string())
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = CliArgs::parse();
    let server_url = match resolve_server_url(args.server_url.as_deref()) {
        Ok(url) => url,
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(2);
        }
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    spawn_backend_thread(server_url.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Product Catalog")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([800.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Product Catalog",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(CatalogApp::new(
                cmd_tx,
                ui_rx,
                StartupConfig { server_url },
            )))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::resolve_server_url;

    #[test]
    fn explicit_url_wins_and_is_normalized() {
        let url = resolve_server_url(Some("http://catalog.internal:8080/")).expect("valid");
        assert_eq!(url, "http://catalog.internal:8080");
    }

    #[test]
    fn malformed_url_is_rejected_before_startup() {
        let err = resolve_server_url(Some("not a url")).expect_err("must fail");
        assert!(err.to_string().contains("invalid catalog server URL"));
    }
}
