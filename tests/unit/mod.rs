/// Crate-level unit tests against the public API
mod basic_tests;
mod properties;
mod scenarios;
