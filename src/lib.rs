//! Subject measurement service: storage, filtered listing, soft
//! deletes, storage statistics, and a Redis-backed list cache.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
