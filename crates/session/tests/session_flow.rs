//! Black-box session flow: load a table document, forecast, check stock, alert.

use std::sync::Arc;

use chrono::NaiveDate;
use stockcast_core::{Horizon, ItemName, TimeSeriesTable};
use stockcast_notify::{DeliveryError, DeliveryOutcome, InMemoryTransport, MailIdentity};
use stockcast_session::{ForecastSession, SessionConfig, SessionError, StockCheck, StockParams};

fn item(name: &str) -> ItemName {
    ItemName::new(name).unwrap()
}

fn identity() -> MailIdentity {
    MailIdentity::new("pharmacy@example.org", "buyer@example.org").unwrap()
}

/// Twelve weeks of sales ending 2024-01-07, one healthy and one unusable item.
fn document() -> TimeSeriesTable {
    let json = serde_json::json!({
        "periodicity": "weekly",
        "index": [
            "2023-10-22", "2023-10-29", "2023-11-05", "2023-11-12",
            "2023-11-19", "2023-11-26", "2023-12-03", "2023-12-10",
            "2023-12-17", "2023-12-24", "2023-12-31", "2024-01-07"
        ],
        "columns": [
            {
                "name": "Paracetamol",
                "values": [40, 46, 41, 45, 42, 47, 41, 46, 43, 48, 42, 47]
            },
            {
                "name": "Cough Syrup",
                "values": [5, null, 6, 5, 7, 6, 5, 6, 7, 5, 6, 5]
            }
        ]
    });
    serde_json::from_value(json).unwrap()
}

#[test]
fn forecast_covers_the_weeks_after_the_last_observation() {
    let mut session =
        ForecastSession::new(SessionConfig::default(), Arc::new(InMemoryTransport::new())).unwrap();

    let run = session.load(document()).unwrap();

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    assert_eq!(
        run.table.index(),
        &[
            date(2024, 1, 14),
            date(2024, 1, 21),
            date(2024, 1, 28),
            date(2024, 2, 4)
        ]
    );
    assert_eq!(session.items(), vec![&item("Paracetamol")]);
    assert_eq!(session.fit_failures()[0].item, item("Cough Syrup"));
}

#[test]
fn alert_is_sent_once_and_session_survives_delivery_failure() {
    let healthy = Arc::new(InMemoryTransport::new());
    let mut session = ForecastSession::new(
        SessionConfig::default().with_identity(identity()),
        healthy.clone(),
    )
    .unwrap();
    session.load(document()).unwrap();

    // ~45 units a week against 150 on hand: below 50 by week 3 at the latest,
    // and every later week stays below.
    let params = StockParams::new(150.0, 50.0);
    let check = session.check_stock(&item("Paracetamol"), params).unwrap();
    let simulation = check.simulation().unwrap();
    let week = simulation.crossing_week().unwrap();
    assert!(week <= 3);
    assert_eq!(healthy.sent().len(), 1);
    assert!(healthy.sent()[0].body.contains(&format!("Week {week}")));

    let broken = Arc::new(InMemoryTransport::failing(DeliveryError::Unavailable(
        "smtp down".to_string(),
    )));
    let mut degraded = ForecastSession::new(
        SessionConfig::default().with_identity(identity()),
        broken,
    )
    .unwrap();
    degraded.load(document()).unwrap();

    let check = degraded.check_stock(&item("Paracetamol"), params).unwrap();
    match check {
        StockCheck::Simulated {
            delivery: Some(DeliveryOutcome::Failed { reason, .. }),
            ..
        } => assert!(reason.contains("smtp down")),
        other => panic!("expected failed delivery, got {other:?}"),
    }

    // The session keeps working after the failed delivery.
    degraded.set_horizon(Horizon::new(8).unwrap()).unwrap();
    assert_eq!(degraded.forecast_table().unwrap().horizon(), 8);
}

#[test]
fn invalid_parameters_are_rejected_without_touching_state() {
    let mut session =
        ForecastSession::new(SessionConfig::default(), Arc::new(InMemoryTransport::new())).unwrap();
    session.load(document()).unwrap();

    let err = session
        .check_stock(&item("Paracetamol"), StockParams::new(100.0, 5.0))
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidParams(_)));
    assert_eq!(session.forecast_table().unwrap().horizon(), 4);
}

#[test]
fn stock_check_report_serializes() {
    let mut session =
        ForecastSession::new(SessionConfig::default(), Arc::new(InMemoryTransport::new())).unwrap();
    session.load(document()).unwrap();

    let check = session
        .check_stock(&item("Paracetamol"), StockParams::new(1_000.0, 50.0))
        .unwrap();
    let json = serde_json::to_value(&check).unwrap();

    assert_eq!(json["state"], "simulated");
    assert_eq!(json["simulation"]["trace"]["levels"][0], 1_000.0);
    assert!(json["simulation"]["alert"].is_null());
    assert!(json["delivery"].is_null());
}
