// crates/sanity-cli/src/lib.rs
// ============================================================================
// Module: LitecoinCash Sanity CLI Library
// Description: Configuration layers and the LitecoinCash scenario catalog.
// Purpose: Share runner setup between the `lcc-sanity` binary and its tests.
// Dependencies: sanity-harness, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! [`config`] resolves where the subject binaries live and how long each
//! check may take, layering command-line flags over `LCC_SANITY_*`
//! environment variables over an optional TOML settings file. [`catalog`]
//! turns that configuration into the registered smoke-test suites.

pub mod catalog;
pub mod config;
