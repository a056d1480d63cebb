//! PAYE Engine for South African payroll
//!
//! This crate computes a month's PAYE tax, UIF contribution and nett salary
//! from salary components supplied by a User Input Service and tax brackets
//! supplied by a Tax Table Service, and serves the result over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
