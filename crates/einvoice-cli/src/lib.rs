//! CLI library components for the e-invoice field engine.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod render;
