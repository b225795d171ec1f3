//! Urban traffic analytics dashboard.
//!
//! Loads three pre-computed CSV outputs (merged weather/traffic data, Monte
//! Carlo congestion-risk runs, factor loadings) and computes the statistics
//! shown on the dashboard's three panes.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
