//! Property-based tests

pub mod debounce_proptest;
