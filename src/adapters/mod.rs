//! Infrastructure adapters. Implement ports.
//!
//! Schedule sources, calendar file output, terminal UI. Map errors to DomainError.

pub mod persistence;
pub mod source;
pub mod ui;
