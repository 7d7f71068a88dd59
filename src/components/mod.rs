//! UI components.

pub mod connections;
