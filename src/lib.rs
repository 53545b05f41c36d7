//! # Overview
//! "clsim" provides a discrete event simulation engine for construction and
//! logistics operations, such as dredging and offshore installation
//! projects: vessels sail between sites and shift material from one
//! container to another.
//!
//! This repository contains:
//!
//! * Concepts, for composing simulation entities (sites, vessels,
//! equipment) from capabilities: location, containers, resources,
//! movement and processing.
//! * Pre-built activities, for moving, shifting amounts and waiting, and
//! for sequencing, repeating and parallelizing other activities.
//! * Plugins, for delaying activities, and for holding activities until
//! the weather or their operational limits allow them.
//! * Random variable framework, for easy specification of stochastic
//! delays.
//! * Output analysis, for turning activity and concept logs into tables
//! and series.
//! * Simulator engine, for managing and executing simulations, configured
//! in code or from YAML/JSON scenarios.
//!
//! clsim is compatible with a wide variety of compilation targets,
//! including WASM. clsim does not require nightly Rust.
pub mod activities;
pub mod concepts;
pub mod input_modeling;
pub mod output_analysis;
pub mod plugins;
pub mod simulator;
pub mod utils;
