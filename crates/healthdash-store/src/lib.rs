//! HealthDash Store - Dataset cache adapters
//!
//! This crate provides adapter implementations of the `DatasetCache` port
//! and the `CachedLoader` decorator that memoizes the load pipeline.

pub mod cached;
pub mod file;
pub mod memory;

pub use cached::CachedLoader;
pub use file::FileCache;
pub use memory::SingleSlotCache;
