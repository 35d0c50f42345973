//! Monte Carlo points prediction for fantasy football squads.
//!
//! Player signals and fixtures are resolved up front through a
//! [`source::PlayerSource`]; sampling then runs purely in memory.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod player_model;
pub mod predict;
pub mod sampler;
pub mod selection;
pub mod signals;
pub mod source;
pub mod sqlite_store;
pub mod team;
pub mod variance;

pub use error::{EngineError, Result};
