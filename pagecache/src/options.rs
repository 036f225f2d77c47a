use alloc::sync::Arc;

use crate::{Boundaries, FetchType, Orientation};

pub const DEFAULT_CAPACITY: usize = 30;
pub const DEFAULT_EDGE_THRESHOLD: usize = 10;

/// Maps a record to the key used for lookups inside a cache window.
pub type GetKey<T, K> = Arc<dyn Fn(&T) -> K + Send + Sync>;

/// Size of a rendered record in the scroll axis.
pub type ItemSize<T> = Arc<dyn Fn(&T) -> u32 + Send + Sync>;

/// Configuration for [`crate::FixedSlidingCache`].
pub struct SlidingCacheOptions<T, K> {
    /// Maximum number of records held in the window.
    pub capacity: usize,
    /// Distance from either window edge at which a slide is triggered. Must be below `capacity`.
    pub edge_threshold: usize,
    pub get_key: GetKey<T, K>,
}

impl<T, K> Clone for SlidingCacheOptions<T, K> {
    fn clone(&self) -> Self {
        Self {
            capacity: self.capacity,
            edge_threshold: self.edge_threshold,
            get_key: Arc::clone(&self.get_key),
        }
    }
}

impl<T, K> SlidingCacheOptions<T, K> {
    pub fn new(get_key: impl Fn(&T) -> K + Send + Sync + 'static) -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            get_key: Arc::new(get_key),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_edge_threshold(mut self, edge_threshold: usize) -> Self {
        self.edge_threshold = edge_threshold;
        self
    }

    /// Returns `(capacity, edge_threshold)` with `0 < capacity` and `edge_threshold < capacity`.
    pub(crate) fn normalized(&self) -> (usize, usize) {
        let capacity = self.capacity.max(1);
        if self.edge_threshold >= capacity {
            pwarn!(
                capacity,
                edge_threshold = self.edge_threshold,
                "SlidingCacheOptions: edge_threshold clamped below capacity"
            );
        }
        (capacity, self.edge_threshold.min(capacity - 1))
    }
}

impl<T, K> core::fmt::Debug for SlidingCacheOptions<T, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlidingCacheOptions")
            .field("capacity", &self.capacity)
            .field("edge_threshold", &self.edge_threshold)
            .finish_non_exhaustive()
    }
}

/// Configuration for [`crate::PagedListEngine`].
///
/// Cheap to clone: the sizing closure is stored in an `Arc`.
pub struct ListEngineOptions<T> {
    /// Size of the viewport in the scroll axis.
    pub viewport_size: u32,
    /// Smallest size any record can take; drives page-capacity estimates. Must be non-zero.
    pub minimal_item_space: u32,
    /// Per-record size. When unset every record takes `minimal_item_space`.
    pub item_size: Option<ItemSize<T>>,
    pub orientation: Orientation,
    pub boundaries: Boundaries,
    pub fetch_type: FetchType,
}

impl<T> Clone for ListEngineOptions<T> {
    fn clone(&self) -> Self {
        Self {
            viewport_size: self.viewport_size,
            minimal_item_space: self.minimal_item_space,
            item_size: self.item_size.clone(),
            orientation: self.orientation,
            boundaries: self.boundaries,
            fetch_type: self.fetch_type,
        }
    }
}

impl<T> ListEngineOptions<T> {
    pub fn new(viewport_size: u32, minimal_item_space: u32) -> Self {
        debug_assert!(minimal_item_space > 0, "minimal_item_space must be non-zero");
        Self {
            viewport_size,
            minimal_item_space,
            item_size: None,
            orientation: Orientation::TopBottom,
            boundaries: Boundaries::Fixed,
            fetch_type: FetchType::Fixed,
        }
    }

    pub fn with_item_size(mut self, item_size: impl Fn(&T) -> u32 + Send + Sync + 'static) -> Self {
        self.item_size = Some(Arc::new(item_size));
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_boundaries(mut self, boundaries: Boundaries) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn with_fetch_type(mut self, fetch_type: FetchType) -> Self {
        self.fetch_type = fetch_type;
        self
    }

    pub(crate) fn size_of(&self, record: &T) -> u32 {
        match &self.item_size {
            Some(f) => f(record),
            None => self.minimal_item_space,
        }
    }

    /// Number of records that fit in the viewport at their minimal size.
    pub fn max_items_on_page(&self) -> usize {
        (self.viewport_size / self.minimal_item_space.max(1)) as usize
    }
}

impl<T> core::fmt::Debug for ListEngineOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListEngineOptions")
            .field("viewport_size", &self.viewport_size)
            .field("minimal_item_space", &self.minimal_item_space)
            .field("orientation", &self.orientation)
            .field("boundaries", &self.boundaries)
            .field("fetch_type", &self.fetch_type)
            .finish_non_exhaustive()
    }
}
