//! Test modules for the exporter crate

mod test_utils;
