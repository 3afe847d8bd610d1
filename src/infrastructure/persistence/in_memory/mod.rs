//! # In-Memory Repositories
//!
//! Process-local storage backed by [`dashmap::DashMap`].

pub mod job_repository;

pub use job_repository::InMemoryJobRepository;
