//! Shared configuration and task payload types

pub mod config;
pub mod payload;
