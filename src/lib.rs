//! `mboxGraph` — per-sender activity charts from MBOX archives.
//!
//! This crate provides the core library for scanning MBOX files, collecting
//! per-sender timestamps, bucketing them onto a shared time axis, and
//! exporting the result as an HTML chart, CSV matrix, or line-protocol points.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod stats;
