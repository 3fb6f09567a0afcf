// ABOUTME: Root module for scout - a tool-assisted question answering agent.
// ABOUTME: Re-exports all public types from submodules.

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod prelude;
pub mod tool;
pub mod tools;

pub use error::ScoutError;
