//! Movie recommendations from three favorite titles.
//!
//! Two interchangeable engines, content-based and collaborative-based, score
//! the catalog against the seeds and share one ranking step. All stores are
//! loaded once into a read-only [`store::StoreSnapshot`].

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
