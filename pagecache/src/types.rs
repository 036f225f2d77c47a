use alloc::vec::Vec;
use core::fmt;

/// Which edge of the list is being extended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Top,
    #[default]
    Bottom,
}

/// Whether paging past the first/last element is rejected or wraps around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Boundaries {
    #[default]
    Fixed,
    Continuous,
}

/// From which end of the list elements start to load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    TopBottom,
    BottomTop,
}

/// How the page preceding a wrap from the head to the tail is sized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchType {
    /// The final page is a full page ending at the last element.
    #[default]
    Fixed,
    /// The final page holds the remainder left after paging from the top.
    BestFit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RebuildType {
    /// Resets the list and requests data from the beginning (or the end for `BottomTop`).
    Full,
    /// Keeps the start index and restores focus to the previously focused element.
    InPlace,
    /// Shows the page containing the given element and focuses it.
    OnPageElement,
    /// Resets the list and requests data from the given offset.
    OnOffset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RebuildRequest {
    pub rebuild_type: RebuildType,
    pub offset: usize,
}

impl RebuildRequest {
    pub const fn new(rebuild_type: RebuildType, offset: usize) -> Self {
        Self {
            rebuild_type,
            offset,
        }
    }
}

impl Default for RebuildRequest {
    fn default() -> Self {
        Self::new(RebuildType::Full, 0)
    }
}

/// Neighbor lookup direction for [`crate::FixedSlidingCache::neighbor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    Next,
    Previous,
}

/// Generation id attached to every outgoing fetch.
///
/// Tickets grow monotonically per cache instance; a response is only applied when it carries
/// the ticket of the fetch that is currently outstanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticket(pub u64);

impl Ticket {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchRequest {
    pub ticket: Ticket,
    pub offset: usize,
    pub limit: usize,
}

impl FetchRequest {
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.limit)
    }
}

/// A slice of the backing sequence plus the provider's view of its total size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total_count: usize,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, total_count: usize) -> Self {
        Self {
            records,
            total_count,
        }
    }
}

/// Completion of a [`FetchRequest`].
///
/// `page` is `None` when the provider produced something it could not interpret; caches treat
/// that as a no-op and keep their current window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response<T> {
    pub ticket: Ticket,
    pub page: Option<Page<T>>,
}

impl<T> Response<T> {
    pub fn new(ticket: Ticket, records: Vec<T>, total_count: usize) -> Self {
        Self {
            ticket,
            page: Some(Page::new(records, total_count)),
        }
    }

    pub fn malformed(ticket: Ticket) -> Self {
        Self { ticket, page: None }
    }
}

/// Why a rebuild request was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebuildError {
    OffsetOutOfRange { offset: usize, elements_count: usize },
}

impl fmt::Display for RebuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffsetOutOfRange {
                offset,
                elements_count,
            } => write!(
                f,
                "rebuild offset {offset} is out of range for {elements_count} elements"
            ),
        }
    }
}

impl core::error::Error for RebuildError {}

/// What happened to a rebuild request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// A fetch was issued.
    Issued(Ticket),
    /// A fetch is outstanding; the request waits in the rebuild queue.
    Queued,
    /// The request was dropped and the engine state is untouched.
    Rejected(RebuildError),
}

impl RebuildOutcome {
    pub fn is_issued(&self) -> bool {
        matches!(self, Self::Issued(_))
    }
}

/// Coarse engine state, as seen between event-loop turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Idle,
    FetchPending,
}
