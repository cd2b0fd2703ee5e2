//! Merchant signup: a multi-step onboarding form with persisted state.

pub mod cli;
pub mod config;
pub mod error;
pub mod services;
pub mod signup;
pub mod store;
