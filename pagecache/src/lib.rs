//! Windowed paging caches over asynchronously fetched record collections.
//!
//! For in-memory providers and drivers, see the `pagecache-adapter` crate.
//!
//! A consumer (a scrollable list, a playback "next/previous" control) reads from a small,
//! in-memory window while the caches keep that window in sync with a much larger backing
//! sequence that can only be fetched asynchronously:
//! - [`FixedSlidingCache`] keeps a fixed-capacity window around a "current" record and slides
//!   it when the record nears an edge.
//! - [`PagedListEngine`] fills a viewport with exactly the records that fit, pages in either
//!   direction, preserves focus across refreshes, and queues rebuilds while a fetch is in
//!   flight.
//!
//! Both are single-threaded and never block. They issue [`FetchRequest`]s to a
//! [`RecordProvider`]; the driver later hands the matching [`Response`] to `on_response`.
//! Every request carries a [`Ticket`] and responses for anything but the outstanding request
//! are dropped.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod engine;
mod key;
mod observer;
mod options;
mod provider;
mod queue;
mod sliding;
mod state;
mod types;
mod window;


pub use engine::PagedListEngine;
pub use key::RecordKey;
pub use observer::{ListEvent, ListObserver, ScrollSetup, ScrollUpdate};
pub use options::{
    DEFAULT_CAPACITY, DEFAULT_EDGE_THRESHOLD, GetKey, ItemSize, ListEngineOptions,
    SlidingCacheOptions,
};
pub use provider::RecordProvider;
pub use queue::RebuildQueue;
pub use sliding::{FixedSlidingCache, RefreshAction};
pub use state::ViewportState;
pub use types::{
    Boundaries, Direction, FetchRequest, FetchType, Orientation, Page, Phase, RebuildError,
    RebuildOutcome, RebuildRequest, RebuildType, Response, Step, Ticket,
};
pub use window::CacheWindow;
