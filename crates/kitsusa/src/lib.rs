//! Composite 3K workplace risk scoring.
//!
//! Four independent scorers (physical, mental, environmental, hazard) turn
//! structured observations into factor scores in `1..=10`; the aggregator
//! multiplies the worst of them by a work-time factor and classifies the
//! result into the A to D 3K index.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod scoring;
pub mod standards;
pub mod telemetry;
