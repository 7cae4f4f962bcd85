//! Property-based tests

pub mod protocol_proptest;
