//! Bookshelf Core - Shared types library.
//!
//! This crate provides the types used across the Bookshelf components:
//! - `client` - Cart, session, API client and views
//! - `cli` - The `bookshelf` terminal storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. The wire schemas of the bookstore REST API live here so
//! that every response is decoded into a typed value at the client boundary.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, ratings and statuses
//! - [`models`] - Response and request schemas of the REST API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
