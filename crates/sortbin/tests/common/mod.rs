//! Shared test utilities for sortbin integration tests.
//!
//! This module provides:
//! - `TestHarness` for building pipelines and orchestrators around scripted detectors
//! - Builders and image helpers for creating test inputs programmatically

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{ScriptedDetector, TestHarness};
