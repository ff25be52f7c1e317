//! Planning module: polynomial paths in, trajectories out
pub mod polynomial;
pub mod trajectory;

use self::polynomial::PolynomialCoefficients;
use self::trajectory::{SampleRequest, Trajectory, TrajectorySampler};
use crate::lifecycle::{LifecycleError, LifecycleNode, LifecycleNodeBase, State};
use std::any::Any;
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced by the planning pipeline
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("polynomial has no coefficients")]
    EmptyCoefficients,
    #[error("coefficient {index} is not finite (got {value})")]
    NonFiniteCoefficient { index: usize, value: f64 },
    #[error("speed must be positive and finite (got {speed})")]
    InvalidSpeed { speed: f64 },
    #[error("sample length must be at least 1")]
    InvalidLength,
    #[error("planning stack is not active (state {state:?})")]
    StackNotActive { state: State },
}

/// Configuration for the planning cycle
#[derive(Debug, Clone)]
pub struct PlanningConfig {
    /// Number of longitudinal samples per trajectory
    pub path_length: usize,
    /// Constant tracking speed handed to the control subsystem
    pub speed: f64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        PlanningConfig {
            path_length: 80,
            speed: 5.0,
        }
    }
}

/// Planning stack for the vehicle
///
/// Owns the trajectory sampler and the cycle configuration, and gates
/// planning on the lifecycle state.
pub struct PlanningStack {
    base: LifecycleNodeBase,
    sampler: TrajectorySampler,
    config: PlanningConfig,
}

impl PlanningStack {
    /// Create a new planning stack with default configuration
    pub fn new() -> Self {
        PlanningStack {
            base: LifecycleNodeBase::new("planning_stack"),
            sampler: TrajectorySampler::new(),
            config: PlanningConfig::default(),
        }
    }

    /// Create a planning stack with a specific sampler
    pub fn with_sampler(sampler: TrajectorySampler) -> Self {
        PlanningStack {
            base: LifecycleNodeBase::new("planning_stack"),
            sampler,
            config: PlanningConfig::default(),
        }
    }

    /// Configure the planning cycle with parameters
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), LifecycleError> {
        if let Some(&path_length) = params.get("path_length") {
            if path_length < 1.0 || !path_length.is_finite() {
                return Err(LifecycleError::ConfigureFailed {
                    node: self.base.name.clone(),
                    reason: format!("path_length must be at least 1, got {}", path_length),
                });
            }
            self.config.path_length = path_length as usize;
        }
        if let Some(&speed) = params.get("speed") {
            if speed <= 0.0 || !speed.is_finite() {
                return Err(LifecycleError::ConfigureFailed {
                    node: self.base.name.clone(),
                    reason: format!("speed must be positive, got {}", speed),
                });
            }
            self.config.speed = speed;
        }
        Ok(())
    }

    /// The active configuration
    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// Run one planning cycle on a freshly fitted polynomial.
    ///
    /// `start_timestamp` is the time captured at the start of the cycle and
    /// feeds the latency stats on the produced trajectory.
    pub fn plan_cycle(
        &self,
        coefficients: PolynomialCoefficients,
        start_timestamp: f64,
    ) -> Result<Trajectory, PlanningError> {
        if self.base.get_state() != State::Active {
            return Err(PlanningError::StackNotActive {
                state: self.base.get_state(),
            });
        }

        let request = SampleRequest {
            coefficients,
            length: self.config.path_length,
            speed: self.config.speed,
            start_timestamp,
        };
        let trajectory = self.sampler.generate(&request)?;
        tracing::debug!(
            points = trajectory.points.len(),
            latency_ms = trajectory.latency_ms,
            "planning cycle complete"
        );
        Ok(trajectory)
    }
}

impl Default for PlanningStack {
    fn default() -> Self {
        PlanningStack::new()
    }
}

impl LifecycleNode for PlanningStack {
    fn on_configure(&mut self) -> Result<(), LifecycleError> {
        tracing::info!("configuring planning stack");
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<(), LifecycleError> {
        tracing::info!("activating planning stack");
        self.base.set_state(State::Active);
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<(), LifecycleError> {
        tracing::info!("deactivating planning stack");
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<(), LifecycleError> {
        tracing::info!("cleaning up planning stack");
        self.base.set_state(State::Unconfigured);
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_stack() -> PlanningStack {
        let mut stack = PlanningStack::new();
        stack.on_configure().unwrap();
        stack.on_activate().unwrap();
        stack
    }

    #[test]
    fn plan_cycle_uses_configured_length_and_speed() {
        let mut stack = active_stack();
        let mut params = HashMap::new();
        params.insert("path_length".to_string(), 15.0);
        params.insert("speed".to_string(), 2.0);
        stack.configure(&params).unwrap();

        let coefficients = PolynomialCoefficients::new(vec![0.0, 0.5]).unwrap();
        let trajectory = stack.plan_cycle(coefficients, 0.0).unwrap();
        assert_eq!(trajectory.points.len(), 15);
        assert_eq!(trajectory.points[0].v, 2.0);
    }

    #[test]
    fn configure_rejects_bad_parameters() {
        let mut stack = PlanningStack::new();
        let mut params = HashMap::new();
        params.insert("speed".to_string(), 0.0);
        assert!(stack.configure(&params).is_err());

        params.clear();
        params.insert("path_length".to_string(), 0.0);
        assert!(stack.configure(&params).is_err());
    }

    #[test]
    fn planning_requires_active_state() {
        let stack = PlanningStack::new();
        let coefficients = PolynomialCoefficients::new(vec![1.0]).unwrap();
        let err = stack.plan_cycle(coefficients, 0.0).unwrap_err();
        assert!(matches!(err, PlanningError::StackNotActive { .. }));
    }

    #[test]
    fn deactivated_stack_stops_planning() {
        let mut stack = active_stack();
        stack.on_deactivate().unwrap();
        let coefficients = PolynomialCoefficients::new(vec![1.0]).unwrap();
        assert!(stack.plan_cycle(coefficients, 0.0).is_err());
    }
}
