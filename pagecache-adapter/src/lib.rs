//! In-memory providers and synchronous drivers for the `pagecache` crate.
//!
//! The `pagecache` caches are sans-IO: they emit fetch requests and wait for responses. This
//! crate provides the plumbing commonly needed around them:
//!
//! - [`MemoryStore`], a mutable in-memory provider that answers requests on demand
//! - [`ListController`], which drives a `PagedListEngine` to a settled page after every call
//! - [`Navigator`], which turns a `FixedSlidingCache` into "next/previous" navigation
//!
//! This crate is framework-agnostic (no UI bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod navigator;
mod store;

#[cfg(test)]
mod tests;

pub use controller::{ListController, pump_list};
pub use navigator::{Navigator, pump_sliding};
pub use store::{MemoryStore, StoreStats};
