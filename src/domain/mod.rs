//! # Domain Layer
//!
//! Entities, value objects and domain services for delivery-order
//! analytics. Nothing in this layer performs I/O.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
