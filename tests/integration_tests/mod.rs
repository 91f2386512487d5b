//! Integration tests module
//!
//! End-to-end runs of the surfatlas pipeline against a wiremock catalog:
//! - Complete walk → aggregate → export pipeline
//! - Partial failures, retries and fatal root errors

pub mod error_scenarios;
pub mod pipeline_test;
