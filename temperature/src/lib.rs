//! Parallel multi-source fetch-and-score pipeline that turns a topic into a
//! 0-100 trend temperature report.
//!
//! Overview
//! - Selects registered `Source` adapters by tier, API-key availability,
//!   general availability, and topic relevance (`temperature_core::select`).
//! - Fans the selection out in parallel with dual per-source/global timeout
//!   budgets, isolating each provider's failure from the rest
//!   (`temperature_core::execute`).
//! - Normalizes, scores, and aggregates the collected signals into a
//!   [`Report`] with a convergence classification and sparklines
//!   (`temperature_core::build_report`).
//!
//! This crate is the wiring between those three stages and
//! `temperature_sources`' adapter set; it owns no algorithm of its own.
//!
//! Key behaviors and trade-offs
//! - `quick` restricts the run to Tier 1 (free, unauthenticated) sources —
//!   fastest and most reproducible, but caps the report's ceiling at
//!   whatever dimensions Tier 1 covers.
//! - `premium` additionally allows Tier 3 sources whose credentials are
//!   configured — broader coverage, at the cost of the extra latency and
//!   quota spend those sources carry.
//! - A report is produced even when every source fails or times out: the
//!   pipeline's only hard failure mode is an adapter registry that failed
//!   to construct (see [`Pipeline::with_default_sources`]).
//!
//! Examples
//! - Default sources, Tier 1 + 2, 30-day window: see
//!   `./demos/basic_report.rs`.
#![warn(missing_docs)]

mod pipeline;

pub use pipeline::{Pipeline, PipelineBuilder, RunOptions, RunOutcome};

pub use temperature_core::{ExecutorConfig, ScoringConfig};
pub use temperature_types::{
    Confidence, DataPoint, Dimension, DimensionScore, Direction, ErrorKind, Report, Signal, TemperatureError,
};
