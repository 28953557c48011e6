//! Ventalink Core - Shared domain library.
//!
//! This crate provides the domain types and business logic shared across all
//! Ventalink components:
//! - `storefront` - Public storefront and merchant dashboard API
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and in-memory logic - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere, including embedded shopper clients.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, order status, and phone normalization
//! - [`cart`] - The shopper cart state container with write-through persistence
//! - [`whatsapp`] - Order message composition and `wa.me` deep links

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;
pub mod whatsapp;

pub use types::*;
