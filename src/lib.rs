//! Multi-perspective decision analysis: five expert assessments from one
//! structured-generation call, then a weighted synthesis from a second.

pub mod analysis;
pub mod config;
pub mod error;
pub mod history;
pub mod output;
pub mod parser;
pub mod provider;
pub mod runner;
pub mod schema;
pub mod session;
pub mod share;

#[cfg(test)]
pub(crate) mod testing;
