//! Property-based tests for identifier and ordering guarantees
