// src/mc/mod.rs
pub mod mc_engine;
pub mod payoffs;

pub use mc_engine::{SdeSimulationEngine, SimulationConfig};
pub use payoffs::{black_scholes_percentage_error, price_payoff, Payoff};
