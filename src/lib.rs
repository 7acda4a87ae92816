//! # Overview
//! "Simlab" provides stochastic grid simulations and random-variate
//! generation, for Rust- and npm-based teaching tools and visualizations.
//!
//! This repository contains:
//!
//! * Random variable framework, with a `VariateGenerator` for the common
//! continuous and discrete distributions, selectable by name.
//! * Grid engines: a stochastic SIR-D epidemic, Conway's Game of Life, and
//! elementary one-dimensional cellular automata with a rendering history.
//! * Output analysis framework, for summarizing samples and binning them
//! into histograms.
//! * Simulator controller, for stepping engines with cancellation, plus
//! JS/WASM interfaces for browser front ends.
//!
//! Every engine owns its random number stream, so a fixed seed replays a
//! run exactly.  Simlab is compatible with a wide variety of compilation
//! targets, including WASM. Simlab does not require nightly Rust.
pub mod input_modeling;
pub mod models;
pub mod output_analysis;
pub mod simulator;
pub mod utils;
