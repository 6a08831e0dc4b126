//! Test modules for the shared crate

mod status_tests;
