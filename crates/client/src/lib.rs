//! Bookshelf Client - Storefront logic for the bookstore REST API.
//!
//! This crate holds everything the `bookshelf` binary does except argument
//! parsing and printing:
//! - [`cart`] - The client-side cart and its reconciliation with the catalog
//! - [`checkout`] - Turning the cart into an order
//! - [`session`] - Bearer token and current user
//! - [`api`] - Typed REST client
//! - [`views`] - Per-page commands, handlers and text templates
//! - [`storefront`] - The context that owns all of the above
//!
//! # Architecture
//!
//! A command is dispatched through [`Storefront::dispatch`]. The view
//! handler calls the API and/or mutates the cart; cart mutations are
//! persisted through a [`storage::DurableStore`] before the handler returns.
//! The handler answers with an [`views::Outcome`] holding notices, the
//! rendered page and an optional next page.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod notice;
pub mod session;
pub mod storage;
pub mod storefront;
pub mod views;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use error::ActionError;
pub use notice::{Notice, Severity};
pub use storefront::{StartupError, Storefront};
