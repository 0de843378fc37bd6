//! Local stand-in for the advisory service. Replies are fixed fixtures in the chat wire
//! format; nothing here computes a portfolio.

use axum::{routing::get, routing::post, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use advisor_core::domain::contract::ChatRequest;

const PORTFOLIO_KEYWORDS: [&str; 2] = ["portfolio", "invest"];

pub fn router() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/chat", post(chat))
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn chat(Json(req): Json<ChatRequest>) -> Json<Value> {
    tracing::info!(session_id = %req.session_id, "chat turn");

    let lowered = req.message.to_lowercase();
    if PORTFOLIO_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return Json(sample_portfolio_reply());
    }

    Json(json!({
        "response_type": "text",
        "content": format!(
            "You said: \"{}\". How much would you like to invest, and for how many years?",
            req.message.trim()
        ),
        "portfolio_data": null,
    }))
}

fn sample_portfolio_reply() -> Value {
    json!({
        "response_type": "portfolio",
        "content": "Based on your goals, here is a balanced portfolio.",
        "portfolio_data": {
            "risk_profile": "Moderate",
            "projected_return_estimate": "9-11% p.a.",
            "lump_sum_allocation": [
                {
                    "asset_class": "Equity",
                    "percentage": 0.6,
                    "amount": 60000,
                    "recommendations": [
                        {"name": "Nifty 50 Index Fund", "weight": 0.5},
                        {"name": "Flexi Cap Fund", "details": "Diversified across market caps"}
                    ]
                },
                {
                    "asset_class": "Debt",
                    "percentage": 0.3,
                    "amount": 30000,
                    "recommendations": [
                        {"name": "Short Duration Fund", "details": "Low interest-rate risk"}
                    ]
                },
                {
                    "asset_class": "Gold",
                    "percentage": 0.1,
                    "amount": 10000,
                    "recommendations": []
                }
            ],
            "monthly_sip_allocation": [
                {
                    "asset_class": "Equity",
                    "percentage": 0.7,
                    "amount": 3500,
                    "recommendations": [{"name": "Nifty 50 Index Fund", "weight": 1.0}]
                },
                {
                    "asset_class": "Debt",
                    "percentage": 0.3,
                    "amount": 1500,
                    "recommendations": []
                }
            ]
        }
    })
}
