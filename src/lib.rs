//! sbench: Sustainability Benchmark
//!
//! Ingests sustainability indicator frameworks from spreadsheets, validates
//! them, and benchmarks the confirmed set against legal frameworks.

pub mod cli;
pub mod core;
pub mod entities;
pub mod ingest;
pub mod report;
pub mod services;
