use crate::{Boundaries, Direction};

/// A lightweight, serializable snapshot of a list engine's viewport bookkeeping.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    /// Global index of the first displayed record.
    pub start_index: usize,
    /// Number of records actually rendered.
    pub current_page_size: usize,
    pub direction: Direction,
    pub boundary: Boundaries,
    /// Page-relative index focus returns to after the next render.
    pub stored_focus_index: Option<usize>,
}
