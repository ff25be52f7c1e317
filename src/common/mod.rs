//! Common utilities and types for the planning crate

/// Common types and utilities used across the codebase
pub mod types {
    /// A raw 2D curve sample (x, f(x)) before any frame conversion
    pub type RawPoint = nalgebra::Point2<f64>;

    /// A timestamp in seconds
    pub type Seconds = f64;
}
