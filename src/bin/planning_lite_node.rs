use anyhow::{Context, Result};
use planning_lite::planning::polynomial::PolynomialCoefficients;
use planning_lite::planning::trajectory::{Clock, SystemClock};
use planning_lite::planning::PlanningStack;
use planning_lite::PlanningCore;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Planning cycle period
const CYCLE_PERIOD_MS: u64 = 100;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Default parameters
    let path_length = 80.0;
    let speed = 5.0;
    info!(path_length, speed, "using parameters");

    let mut core = PlanningCore::new();
    let mut stack = PlanningStack::new();

    let mut params = HashMap::new();
    params.insert("path_length".to_string(), path_length);
    params.insert("speed".to_string(), speed);
    stack
        .configure(&params)
        .context("failed to configure planning stack")?;

    core.register(stack);
    core.init().context("failed to initialize core")?;
    info!("core initialized");

    // Stand-in for the upstream curve-fit stage: a fixed gentle curve. In
    // deployment the coefficients arrive from the perception/fitting module
    // each cycle.
    let coefficients = vec![0.0, 0.05, 0.01];

    let clock = SystemClock;
    let mut ticker = tokio::time::interval(Duration::from_millis(CYCLE_PERIOD_MS));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let start_timestamp = clock.now();
                let coefficients = match PolynomialCoefficients::new(coefficients.clone()) {
                    Ok(c) => c,
                    Err(e) => {
                        error!(error = %e, "invalid path polynomial, skipping cycle");
                        continue;
                    }
                };

                let stack = core
                    .planning_stack_mut()
                    .context("planning stack not registered")?;
                match stack.plan_cycle(coefficients, start_timestamp) {
                    Ok(trajectory) => {
                        info!(
                            points = trajectory.points.len(),
                            latency_ms = trajectory.latency_ms,
                            "planned trajectory"
                        );
                        // Publication layer stand-in: emit the wire form on stdout
                        println!("{}", serde_json::to_string(&trajectory)?);
                    }
                    Err(e) => {
                        // Skip publication for this cycle rather than send a
                        // corrupt trajectory downstream
                        error!(error = %e, "planning cycle failed");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    core.shutdown().context("failed to shutdown core")?;
    Ok(())
}
