//! Adapters from plain iterators to async streams.

use futures::stream::{self, Stream};

/// Yield the items of `iterable` as a stream, in order.
pub fn to_async_stream<I>(iterable: I) -> impl Stream<Item = I::Item>
where
    I: IntoIterator,
{
    stream::iter(iterable)
}
