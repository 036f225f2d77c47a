/// Identity used to find a record inside a cache window.
///
/// Blanket-implemented for every `PartialEq + Clone` type (paths, primary keys, ...).
pub trait RecordKey: PartialEq + Clone {}
impl<K: PartialEq + Clone> RecordKey for K {}
