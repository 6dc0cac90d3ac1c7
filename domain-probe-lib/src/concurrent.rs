//! Bounded fan-out with ordered results.
//!
//! Work items run at most `concurrency` at a time. Each result is written into
//! the slot of its input index, so the output order matches the input order
//! no matter which item finishes first.

use futures::stream::{self, StreamExt};
use std::future::Future;

/// Run `task` over `items` with at most `concurrency` in flight.
pub async fn run_ordered<T, R, F, Fut>(items: &[T], concurrency: usize, task: F) -> Vec<R>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = R>,
{
    let mut slots: Vec<Option<R>> = Vec::with_capacity(items.len());
    slots.resize_with(items.len(), || None);

    let mut completions = stream::iter(0..items.len())
        .map(|index| {
            let fut = task(&items[index]);
            async move { (index, fut.await) }
        })
        .buffer_unordered(concurrency.max(1));

    while let Some((index, result)) = completions.next().await {
        slots[index] = Some(result);
    }

    slots.into_iter().flatten().collect()
}
