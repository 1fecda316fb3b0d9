//! The central module for duels: state, combat resolution, the engine that
//! drives a duel's lifecycle, and outcome propagation.

pub mod engine;
pub mod log;
pub mod outcome;
pub mod resolver;
pub mod state;
