use planning_lite::planning::polynomial::PolynomialCoefficients;
use planning_lite::planning::trajectory::{Clock, SystemClock};
use planning_lite::planning::PlanningStack;
use planning_lite::PlanningCore;
use std::collections::HashMap;

fn main() -> anyhow::Result<()> {
    println!("Initializing planning core...");

    let mut core = PlanningCore::new();
    let mut stack = PlanningStack::new();

    // Configure the planning cycle
    let mut params = HashMap::new();
    params.insert("path_length".to_string(), 20.0);
    params.insert("speed".to_string(), 2.5);

    if let Err(e) = stack.configure(&params) {
        println!("Failed to configure planning stack: {}", e);
    }

    core.register(stack);

    match core.init() {
        Ok(_) => println!("Core initialized successfully!"),
        Err(e) => {
            println!("Failed to initialize core: {}", e);
            return Ok(());
        }
    }

    // A gentle left-curving path from a pretend upstream curve fit
    let coefficients = PolynomialCoefficients::new(vec![0.0, 0.1, 0.02])?;
    let start_timestamp = SystemClock.now();

    let stack = core
        .planning_stack_mut()
        .ok_or_else(|| anyhow::anyhow!("planning stack not registered"))?;
    let trajectory = stack.plan_cycle(coefficients, start_timestamp)?;

    println!(
        "Generated {} points in {:.3} ms",
        trajectory.points.len(),
        trajectory.latency_ms
    );
    for point in trajectory.points.iter().take(5) {
        println!(
            "x={:.1} y={:.3} theta={:.4} s={:.3} t={:.3}",
            point.path_point.x,
            point.path_point.y,
            point.path_point.theta,
            point.path_point.s,
            point.relative_time
        );
    }

    match core.shutdown() {
        Ok(_) => println!("Core shutdown successfully!"),
        Err(e) => println!("Failed to shutdown core: {}", e),
    }

    Ok(())
}
