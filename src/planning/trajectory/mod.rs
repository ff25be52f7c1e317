//! Trajectory sampling
//!
//! Discretizes a polynomial path into a sequence of timestamped trajectory
//! points. The curve is sampled at unit spacing along the longitudinal axis;
//! each point carries position, heading, cumulative arc-length, speed, and
//! time since the first point. The finished trajectory is stamped with
//! header and latency metadata for the downstream control consumer.

use nalgebra::distance;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::polynomial::PolynomialCoefficients;
use super::PlanningError;
use crate::common::types::{RawPoint, Seconds};

/// Module identifier stamped into every trajectory header
pub const MODULE_NAME: &str = "planning";

/// Source of wall-clock time, injected so the sampler stays testable
pub trait Clock: Send + Sync {
    /// Current time in seconds
    fn now(&self) -> Seconds;
}

/// Clock backed by the system wall clock
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Seconds {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Transmission state attached to a trajectory for the control consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gear {
    Drive,
    Neutral,
    Reverse,
    Parking,
}

/// Trajectory header metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub timestamp_sec: Seconds,
    pub module_name: String,
}

/// A 2D position plus heading and cumulative arc-length along the route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    /// Lateral offset in the output frame; the polynomial's vertical axis
    /// is inverted relative to this frame, so y = -f(x)
    pub y: f64,
    /// Heading in radians, measured against the curve's start point
    pub theta: f64,
    /// Cumulative arc-length from the first sample, non-decreasing
    pub s: f64,
}

/// A path point annotated with speed and time since the first point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub path_point: PathPoint,
    pub v: f64,
    pub relative_time: Seconds,
}

/// A discretized trajectory, the wire contract with the control subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub header: Header,
    pub gear: Gear,
    pub latency_ms: f64,
    pub points: Vec<TrajectoryPoint>,
}

/// Inputs for one sampling pass
#[derive(Debug, Clone)]
pub struct SampleRequest {
    pub coefficients: PolynomialCoefficients,
    /// Number of longitudinal samples, taken at x = 0, 1, …, length-1
    pub length: usize,
    /// Constant tracking speed, must be positive
    pub speed: f64,
    /// Time captured at the start of the planning cycle, for latency stats
    pub start_timestamp: Seconds,
}

/// Converts polynomial paths into discretized trajectories
pub struct TrajectorySampler {
    clock: Box<dyn Clock>,
}

impl TrajectorySampler {
    /// Create a sampler that reads the system clock
    pub fn new() -> Self {
        TrajectorySampler {
            clock: Box::new(SystemClock),
        }
    }

    /// Create a sampler with an injected clock
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        TrajectorySampler { clock }
    }

    /// Sample the polynomial path into a trajectory.
    ///
    /// Walks x from 0 to length-1, evaluating the polynomial at each step
    /// and accumulating arc-length and relative time from the distance
    /// between consecutive raw samples. Rejects requests that would put
    /// NaN or infinity into the output.
    pub fn generate(&self, request: &SampleRequest) -> Result<Trajectory, PlanningError> {
        if !request.speed.is_finite() || request.speed <= 0.0 {
            return Err(PlanningError::InvalidSpeed {
                speed: request.speed,
            });
        }
        if request.length == 0 {
            return Err(PlanningError::InvalidLength);
        }

        let coef = &request.coefficients;
        let base = RawPoint::new(0.0, coef.eval(0.0));
        let mut points = Vec::with_capacity(request.length);
        let mut s = 0.0;
        let mut relative_time = 0.0;

        for x in 0..request.length {
            let x = x as f64;
            let y = coef.eval(x);

            if x > 0.0 {
                let current = RawPoint::new(x, y);
                let previous = RawPoint::new(x - 1.0, coef.eval(x - 1.0));
                let dist = distance(&current, &previous);
                s += dist;
                relative_time += dist / request.speed;
            }

            let next = RawPoint::new(x + 1.0, coef.eval(x + 1.0));
            points.push(TrajectoryPoint {
                path_point: PathPoint {
                    x,
                    y: -y,
                    theta: heading_from_start(&next, &base),
                    s,
                },
                v: request.speed,
                relative_time,
            });
        }

        let now = self.clock.now();
        Ok(Trajectory {
            header: Header {
                timestamp_sec: now,
                module_name: MODULE_NAME.to_string(),
            },
            gear: Gear::Drive,
            latency_ms: (now - request.start_timestamp) * 1000.0,
            points,
        })
    }
}

impl Default for TrajectorySampler {
    fn default() -> Self {
        TrajectorySampler::new()
    }
}

/// Heading of the vector from the curve's start to `point`, relative to a
/// fixed reference direction.
///
/// Mirrors the upstream planner: x is the first atan2 argument and the base
/// is always the start sample, so this is not a local tangent and is
/// insensitive to curvature away from the start.
fn heading_from_start(point: &RawPoint, base: &RawPoint) -> f64 {
    (point.x - base.x).atan2(point.y - base.y) - 1.0_f64.atan2(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_4, SQRT_2};

    /// Clock pinned to a fixed instant
    struct FixedClock(f64);

    impl Clock for FixedClock {
        fn now(&self) -> Seconds {
            self.0
        }
    }

    fn request(coefficients: Vec<f64>, length: usize, speed: f64) -> SampleRequest {
        SampleRequest {
            coefficients: PolynomialCoefficients::new(coefficients).unwrap(),
            length,
            speed,
            start_timestamp: 0.0,
        }
    }

    fn sampler_at(now: f64) -> TrajectorySampler {
        TrajectorySampler::with_clock(Box::new(FixedClock(now)))
    }

    #[test]
    fn straight_line_arc_length_and_timing() {
        // y = x, three samples at unit speed: each step moves by (1, 1)
        let trajectory = sampler_at(1.0).generate(&request(vec![0.0, 1.0], 3, 1.0)).unwrap();
        assert_eq!(trajectory.points.len(), 3);

        let expected_y = [0.0, -1.0, -2.0];
        let expected_s = [0.0, SQRT_2, 2.0 * SQRT_2];
        for (i, point) in trajectory.points.iter().enumerate() {
            assert_relative_eq!(point.path_point.x, i as f64);
            assert_relative_eq!(point.path_point.y, expected_y[i]);
            assert_relative_eq!(point.path_point.s, expected_s[i], epsilon = 1e-12);
            assert_relative_eq!(point.relative_time, expected_s[i], epsilon = 1e-12);
            assert_relative_eq!(point.v, 1.0);
        }
    }

    #[test]
    fn constant_polynomial_unit_steps() {
        // y = 5 everywhere: only x advances, one unit of distance per step
        let trajectory = sampler_at(1.0).generate(&request(vec![5.0], 4, 2.0)).unwrap();
        assert_eq!(trajectory.points.len(), 4);

        let expected_s = [0.0, 1.0, 2.0, 3.0];
        let expected_t = [0.0, 0.5, 1.0, 1.5];
        for (i, point) in trajectory.points.iter().enumerate() {
            assert_relative_eq!(point.path_point.y, -5.0);
            assert_relative_eq!(point.path_point.s, expected_s[i], epsilon = 1e-12);
            assert_relative_eq!(point.relative_time, expected_t[i], epsilon = 1e-12);
            assert_relative_eq!(point.v, 2.0);
        }
    }

    #[test]
    fn first_point_starts_at_zero() {
        let trajectory = sampler_at(1.0)
            .generate(&request(vec![1.0, -0.5, 0.25], 10, 3.0))
            .unwrap();
        assert_relative_eq!(trajectory.points[0].path_point.s, 0.0);
        assert_relative_eq!(trajectory.points[0].relative_time, 0.0);
    }

    #[test]
    fn arc_length_and_time_are_non_decreasing() {
        let trajectory = sampler_at(1.0)
            .generate(&request(vec![2.0, -1.0, 0.1, 0.01], 25, 4.0))
            .unwrap();
        for pair in trajectory.points.windows(2) {
            assert!(pair[1].path_point.s >= pair[0].path_point.s);
            assert!(pair[1].relative_time >= pair[0].relative_time);
            assert_relative_eq!(pair[1].v, 4.0);
        }
    }

    #[test]
    fn heading_measured_from_start_point() {
        // y = x: the vector from (0, 0) to (x+1, x+1) has equal components,
        // so atan2(dx, dy) - atan2(1, 0) = pi/4 - pi/2 for every index
        let trajectory = sampler_at(1.0).generate(&request(vec![0.0, 1.0], 5, 1.0)).unwrap();
        for point in &trajectory.points {
            assert_relative_eq!(point.path_point.theta, -FRAC_PI_4, epsilon = 1e-12);
        }
    }

    #[test]
    fn heading_on_flat_path_is_zero() {
        // y constant: start-to-next vectors point straight along x
        let trajectory = sampler_at(1.0).generate(&request(vec![5.0], 4, 1.0)).unwrap();
        for point in &trajectory.points {
            assert_relative_eq!(point.path_point.theta, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn zero_speed_is_rejected() {
        let err = sampler_at(1.0).generate(&request(vec![0.0, 1.0], 3, 0.0)).unwrap_err();
        assert!(matches!(err, PlanningError::InvalidSpeed { .. }));
    }

    #[test]
    fn negative_and_non_finite_speed_rejected() {
        let sampler = sampler_at(1.0);
        assert!(sampler.generate(&request(vec![1.0], 3, -2.0)).is_err());
        assert!(sampler.generate(&request(vec![1.0], 3, f64::NAN)).is_err());
    }

    #[test]
    fn zero_length_is_rejected() {
        let err = sampler_at(1.0).generate(&request(vec![1.0], 0, 1.0)).unwrap_err();
        assert!(matches!(err, PlanningError::InvalidLength));
    }

    #[test]
    fn identical_requests_give_identical_points() {
        let req = request(vec![0.3, 0.2, -0.05], 12, 2.5);
        let a = sampler_at(1.0).generate(&req).unwrap();
        let b = sampler_at(99.0).generate(&req).unwrap();
        assert_eq!(a.points, b.points);
        assert_ne!(a.header.timestamp_sec, b.header.timestamp_sec);
    }

    #[test]
    fn header_and_latency_metadata() {
        let mut req = request(vec![1.0], 2, 1.0);
        req.start_timestamp = 10.0;
        let trajectory = sampler_at(10.25).generate(&req).unwrap();
        assert_eq!(trajectory.header.module_name, MODULE_NAME);
        assert_eq!(trajectory.gear, Gear::Drive);
        assert_relative_eq!(trajectory.header.timestamp_sec, 10.25);
        assert_relative_eq!(trajectory.latency_ms, 250.0, epsilon = 1e-9);
    }

    #[test]
    fn trajectory_round_trips_through_json() {
        let trajectory = sampler_at(1.0).generate(&request(vec![0.0, 1.0], 3, 1.0)).unwrap();
        let json = serde_json::to_string(&trajectory).unwrap();
        let decoded: Trajectory = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, trajectory);
    }
}
