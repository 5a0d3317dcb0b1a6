//! Test suites and shared fixtures.


#[cfg(test)]
pub mod unit;
