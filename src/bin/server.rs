use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use panel_cutlist::config::{CostRates, OptimizerConfig};
use panel_cutlist::cutlist::{RipCut, derive_cut_sequence};
use panel_cutlist::solver::Solver;
use panel_cutlist::summary::{CostSummary, PieceGroup, piece_summary};
use panel_cutlist::types::{Panel, Piece, Solution};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeRequest {
    #[serde(flatten)]
    config: OptimizerConfig,
    pieces: Vec<Piece>,
    #[serde(default)]
    rates: CostRates,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeResponse<'a> {
    panels: &'a [Panel],
    pieces: Vec<PieceGroup>,
    unplaced: Vec<&'a str>,
    cut_lists: Vec<Vec<RipCut<'a>>>,
    panel_count: usize,
    waste_percent: f64,
    cost: CostSummary,
}

fn build_response<'a>(solution: &'a Solution, rates: &CostRates) -> OptimizeResponse<'a> {
    OptimizeResponse {
        panels: &solution.panels,
        pieces: piece_summary(&solution.panels),
        unplaced: solution.unplaced_ids(),
        cut_lists: solution.panels.iter().map(derive_cut_sequence).collect(),
        panel_count: solution.panel_count(),
        waste_percent: solution.total_waste_percent(),
        cost: CostSummary::compute(solution, rates),
    }
}

async fn optimize(Json(req): Json<OptimizeRequest>) -> Result<Response, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );

    let solution = Solver::new(req.config, req.pieces)
        .solve()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let response = build_response(&solution, &req.rates);
    Ok(Json(response).into_response())
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.expect("server error");
}
