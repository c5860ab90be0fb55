//! Property-based tests for the merge policy guarantees
