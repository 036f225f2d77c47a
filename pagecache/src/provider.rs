use crate::FetchRequest;

/// The asynchronous backing store a cache reads from.
///
/// `request_records` must return immediately. The provider answers later, on the same logical
/// thread, by handing a [`crate::Response`] carrying the request's ticket to the cache's
/// `on_response`. A provider that cannot serve a request answers with
/// [`crate::Response::malformed`] (or not at all); it never fails the call itself.
pub trait RecordProvider<T> {
    /// Best-known size of the whole sequence, available synchronously.
    fn records_count(&self) -> usize;

    /// Starts fetching `[request.offset, request.offset + request.limit)`.
    fn request_records(&mut self, request: FetchRequest);
}

impl<T, P: RecordProvider<T> + ?Sized> RecordProvider<T> for &mut P {
    fn records_count(&self) -> usize {
        (**self).records_count()
    }

    fn request_records(&mut self, request: FetchRequest) {
        (**self).request_records(request);
    }
}
