//! # Core Module
//!
//! Shared-ownership primitives used across the world and the worker pipeline.
//!
//! ## Key Components
//! - `MtResource`: thread-safe reference-counted value with read-write locking,
//!   used for chunks and for the world's internal tables.

pub mod mt_resource;

pub use mt_resource::MtResource;
