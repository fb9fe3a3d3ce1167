use sesh_match::config::Settings;
use sesh_match::core::{AliasResolver, MatchEngine};
use sesh_match::models::{MatchRequest, MatchResponse, MatchThresholds, ScoringWeights};
use std::io::{self, Read, Write};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use validator::Validate;

/// Failures at the process boundary. The engine itself never fails; by the
/// time it runs, the request is decoded and validated.
#[derive(Debug, Error)]
enum BoundaryError {
    #[error("failed to read request: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

fn main() {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging on stderr; stdout carries the response payload.
    let log_level =
        std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format =
        std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .with_writer(io::stderr);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    if let Err(e) = run(&settings) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Read one JSON request from stdin, solve it, write one JSON response to
/// stdout.
fn run(settings: &Settings) -> Result<(), BoundaryError> {
    let mut payload = String::new();
    io::stdin().read_to_string(&mut payload)?;

    let request: MatchRequest = serde_json::from_str(&payload)?;
    request.validate()?;

    let mut resolver = AliasResolver::default();
    resolver.extend(settings.matching.aliases.clone());

    let t = &settings.matching.thresholds;
    let thresholds = MatchThresholds {
        skill_exact: t.skill_exact,
        skill_relaxed: t.skill_relaxed,
        location_exact: t.location_exact,
        location_relaxed: t.location_relaxed,
        trait_exact: t.trait_exact,
        trait_relaxed: t.trait_relaxed,
        trait_coverage_exact: t.trait_coverage_exact,
        trait_coverage_relaxed: t.trait_coverage_relaxed,
        years_window: t.years_window,
    };

    let w = &settings.scoring.weights;
    let weights = ScoringWeights {
        skill: w.skill,
        years: w.years,
        location: w.location,
        traits: w.traits,
        years_decay: w.years_decay,
        balance_bonus: w.balance_bonus,
        cohesion_bonus: w.cohesion_bonus,
        fallback_years_score: w.fallback_years_score,
        fallback_years_weight: w.fallback_years_weight,
    };

    let engine = MatchEngine::new(resolver, thresholds, weights);

    let band = request.preferences.roles.is_some();
    let default_limit = if band {
        settings.matching.default_band_limit
    } else {
        settings.matching.default_limit
    };
    let limit = request
        .max_results
        .unwrap_or(default_limit)
        .min(settings.matching.max_limit) as usize;

    info!(
        candidates = request.candidates.len(),
        band, limit, "solving match request"
    );

    let report = engine.solve(&request.candidates, &request.preferences, limit);

    info!(results = report.results.len(), "request solved");

    let response = MatchResponse {
        results: report.results,
        total_candidates: report.total_candidates,
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer(&mut handle, &response)?;
    writeln!(handle)?;

    Ok(())
}
