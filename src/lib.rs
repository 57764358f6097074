//! # productdb-rs
//!
//! Product lifecycle database: browse vendor products, run bulk end-of-life
//! checks against the catalog, and keep lifecycle dates in sync with the
//! Cisco EoX API through a pgmq-backed worker.

pub mod cisco;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod telemetry;
pub mod web;
pub mod worker;
