//! AWS Lambda handler for single-household estimates
//!
//! Accepts an `EstimateRequest` as the JSON event and returns the estimate,
//! or an error body when the input is rejected. The tariff is loaded once per
//! cold start and shared by every invocation.

use std::sync::Arc;

use autonomy_allowance::{Estimate, EstimateRequest, EstimateRunner, LoadedTariff};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Serialize;

/// Output of one invocation
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<Estimate>,
    /// Set when defaults replaced the configured tariff
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

async fn handle(
    runner: &EstimateRunner,
    config_warning: Option<String>,
    event: LambdaEvent<EstimateRequest>,
) -> Result<EstimateResponse, Error> {
    let (request, _context) = event.into_parts();

    let response = match runner.run(&request) {
        Ok(estimate) => EstimateResponse {
            estimate: Some(estimate),
            config_warning,
            error: None,
        },
        Err(e) => {
            log::warn!("Rejected request: {}", e);
            EstimateResponse {
                estimate: None,
                config_warning,
                error: Some(e.to_string()),
            }
        }
    };

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let loaded = match std::env::var("TARIFF_CONFIG") {
        Ok(path) => LoadedTariff::load_from(std::path::Path::new(&path)),
        Err(_) => LoadedTariff::load_default(),
    };
    let config_warning = loaded.outcome.is_fallback().then(|| loaded.outcome.to_string());
    let runner = Arc::new(EstimateRunner::from_loaded(&loaded));

    run(service_fn(move |event: LambdaEvent<EstimateRequest>| {
        let runner = Arc::clone(&runner);
        let config_warning = config_warning.clone();
        async move { handle(&runner, config_warning, event).await }
    }))
    .await
}
