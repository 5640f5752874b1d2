//! fdi-equilibria: closed-form equilibria for vertical and horizontal FDI.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
