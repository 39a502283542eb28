//! Concurrent fan-out with order restoration.
//!
//! Lookups complete in any order; results are put back into input order
//! before they are returned.

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;

/// Default cap on requests in flight for a single fan-out
pub const DEFAULT_MAX_CONCURRENT: usize = 16;

type IndexedFuture<T> = Pin<Box<dyn Future<Output = (usize, T)> + Send>>;

/// Run `fetch` for every input concurrently and return the outputs in input
/// order.
///
/// Up to `max_concurrent` futures are in flight at once. With the default cap
/// and the small batches this crate issues, every request is launched before
/// any is awaited.
///
/// # Example
///
/// ```ignore
/// let repos = fetch_all_ordered(ids, move |id| {
///     let client = client.clone();
///     async move { client.get_repository(&id).await.ok() }
/// }, DEFAULT_MAX_CONCURRENT).await;
/// ```
pub async fn fetch_all_ordered<I, T, F, Fut>(
    inputs: Vec<I>,
    fetch: F,
    max_concurrent: usize,
) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
{
    if inputs.is_empty() {
        return Vec::new();
    }

    let total = inputs.len();
    let max_concurrent = max_concurrent.max(1);
    debug!(
        "Fetching {} items with max {} concurrent",
        total, max_concurrent
    );

    let make_future = |index: usize, input: I| -> IndexedFuture<T> {
        let fut = fetch(input);
        Box::pin(async move { (index, fut.await) })
    };

    let mut pending = inputs.into_iter().enumerate();
    let mut in_flight: FuturesUnordered<IndexedFuture<T>> = FuturesUnordered::new();

    for (index, input) in pending.by_ref().take(max_concurrent) {
        in_flight.push(make_future(index, input));
    }

    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();

    while let Some((index, output)) = in_flight.next().await {
        slots[index] = Some(output);

        if let Some((next_index, next_input)) = pending.next() {
            in_flight.push(make_future(next_index, next_input));
        }
    }

    slots.into_iter().flatten().collect()
}
