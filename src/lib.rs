//! Core library for the `bulkfetch` CLI.
//!
//! The centerpiece is [`pool::WorkerPool`], a bounded-concurrency worker pool
//! with backpressure and live counters. Around it sit the workload feeder
//! (identifier file to HTTP GET tasks), the metrics listener, and the CLI and
//! configuration layers the binary is built from.
pub mod args;
pub mod config;
pub mod error;
pub mod feeder;
pub mod metrics;
pub mod pool;
pub mod shutdown;
pub mod shutdown_handlers;
