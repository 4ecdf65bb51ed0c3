//! Repository Comprehensive Test Suite
//!
//! End-to-end tests of the public `memrepo` API.
//!
//! ## Test Tiers
//!
//! - **Tier 1**: Filter semantics on a realistic data set
//! - **Tier 2**: Copy policy isolation
//! - **Tier 3**: Write operations (remove, modify, assign, batch ingest)
//! - **Tier 4**: Concurrency (producers and readers)
//! - **Tier 5**: Property-based invariants
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test repository_comprehensive
//! ```

// Test modules
mod test_utils;

// Tier 1: Filter Semantics
mod tier1_cat_scenario;




// Tier 5: Properties
mod tier5_properties;
