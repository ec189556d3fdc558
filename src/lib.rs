//! MCDA Input - Manual performance input for benefit-risk analysis
//!
//! This crate turns user-entered measurements (point estimates, standard
//! errors, confidence intervals, event counts) into validated performances
//! and distributions for a multi-criteria decision problem, and renders
//! stored performances back into effects-table labels.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
