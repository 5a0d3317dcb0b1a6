//! Property-based tests for propagation.
//!
//! Uses proptest to check that settling random acyclic arithmetic graphs agrees
//! with direct evaluation.
