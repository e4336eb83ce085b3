//! `stockcast` command: one forecasting session driven from a JSON history file.
//!
//! Prints a JSON report with the forecast and, when stock figures are given,
//! the depletion trace and alert outcome for one item. Alerts go to the log
//! transport.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Serialize;

use stockcast_core::{ItemName, SessionId, TimeSeriesTable};
use stockcast_forecast::ForecastRun;
use stockcast_notify::LogTransport;
use stockcast_session::{ForecastSession, SessionConfig, StockCheck, StockParams};

pub const USAGE: &str = "usage: stockcast <history.json> [<item> <initial-stock> [<threshold>]]";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub history: PathBuf,
    pub stock: Option<(ItemName, StockParams)>,
}

impl Request {
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let (history, rest) = match args.split_first() {
            Some((path, rest)) => (PathBuf::from(path), rest),
            None => bail!("missing history file"),
        };

        let stock = match rest {
            [] => None,
            [item, stock, threshold @ ..] if threshold.len() <= 1 => {
                let item = ItemName::new(item.as_str())?;
                let initial_stock: f64 = stock
                    .parse()
                    .with_context(|| format!("initial stock `{stock}` is not a number"))?;
                let threshold: f64 = match threshold.first() {
                    Some(raw) => raw
                        .parse()
                        .with_context(|| format!("threshold `{raw}` is not a number"))?,
                    None => StockParams::DEFAULT_THRESHOLD,
                };
                Some((item, StockParams::new(initial_stock, threshold)))
            }
            _ => bail!("expected <item> <initial-stock> [<threshold>] after the history file"),
        };

        Ok(Self { history, stock })
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub session: SessionId,
    pub forecast: ForecastRun,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_check: Option<StockCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

pub fn load_history(path: &Path) -> anyhow::Result<TimeSeriesTable> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_history(&raw).with_context(|| format!("invalid history in {}", path.display()))
}

pub fn parse_history(raw: &str) -> anyhow::Result<TimeSeriesTable> {
    Ok(serde_json::from_str(raw)?)
}

pub fn run(request: &Request, config: SessionConfig) -> anyhow::Result<Report> {
    let history = load_history(&request.history)?;
    execute(history, request.stock.as_ref(), config)
}

/// Run a session over an already-loaded history.
pub fn execute(
    history: TimeSeriesTable,
    stock: Option<&(ItemName, StockParams)>,
    config: SessionConfig,
) -> anyhow::Result<Report> {
    let mut session = ForecastSession::new(config, Arc::new(LogTransport))?;
    let forecast = session.load(history)?.clone();

    for failure in &forecast.failures {
        tracing::warn!(item = %failure.item, error = %failure.error, "no forecast for item");
    }

    let stock_check = match stock {
        Some((item, params)) => Some(session.check_stock(item, *params)?),
        None => None,
    };
    let status = stock_check.as_ref().map(StockCheck::status);

    Ok(Report {
        session: session.id(),
        forecast,
        stock_check,
        status,
    })
}
