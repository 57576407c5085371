mod app;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::Parser;
use ledger_bubbles::{ChartConfig, LoadFilter, telemetry};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Ledger export to load (.csv or .json). Repeat to merge several sources.
    #[arg(long = "source", required = true)]
    sources: Vec<PathBuf>,

    /// Earliest row date kept (YYYY-MM-DD), or `none`.
    #[arg(long, default_value = "2016-01-01")]
    cutoff: String,

    /// Voucher type code rows must carry, or `any`.
    #[arg(long, default_value = "AP")]
    voucher_type: String,

    /// Keep rows regardless of their revenue sign.
    #[arg(long)]
    any_sign: bool,

    /// JSON file overriding chart defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial grouping: all, month, area or account.
    #[arg(long, default_value = "all")]
    mode: String,
}

impl Args {
    fn load_filter(&self) -> Result<LoadFilter> {
        let cutoff = match self.cutoff.trim() {
            "none" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .with_context(|| format!("invalid --cutoff {raw:?}; expected YYYY-MM-DD"))?,
            ),
        };
        let voucher_type = match self.voucher_type.trim() {
            "any" => None,
            code => Some(code.to_owned()),
        };

        Ok(LoadFilter {
            cutoff,
            voucher_type,
            require_positive_sign: !self.any_sign,
        })
    }

    fn chart_config(&self) -> Result<ChartConfig> {
        match &self.config {
            Some(path) => ChartConfig::load(path),
            None => Ok(ChartConfig::default()),
        }
    }
}

fn main() -> Result<()> {
    let _ = telemetry::init_default_tracing();
    let args = Args::parse();

    let request = app::LoadRequest {
        filter: args.load_filter()?,
        config: args.chart_config()?,
        sources: args.sources.clone(),
        initial_mode: args.mode.clone(),
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1560.0, 900.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ledger-bubbles",
        options,
        Box::new(move |cc| Ok(Box::new(app::BubbleChartApp::new(cc, request)))),
    )
    .map_err(|error| anyhow!("ledger-bubbles window failed: {error}"))?;
    Ok(())
}
