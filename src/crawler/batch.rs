//! Batched concurrent fan-out
//!
//! Items are split into contiguous groups of at most `batch_width`. The
//! members of a group run concurrently on the current task and the whole
//! group completes before the next one starts, so no more than `batch_width`
//! operations are ever in flight.

use futures::future::join_all;
use std::future::Future;
use std::num::NonZeroUsize;

/// Runs `work` over `items` in sequential groups of concurrent operations
///
/// Results come back in the order of `items`, whatever order the operations
/// completed in. `work` is expected to turn its own failures into values; a
/// failing item never stops its siblings or the following groups.
///
/// # Example
///
/// ```
/// use lot_harvest::crawler::run_batched;
/// use std::num::NonZeroUsize;
///
/// # async fn example() {
/// let width = NonZeroUsize::new(2).unwrap();
/// let doubled = run_batched(vec![1, 2, 3], width, |n| async move { n * 2 }).await;
/// assert_eq!(doubled, vec![2, 4, 6]);
/// # }
/// ```
pub async fn run_batched<I, F, Fut>(
    items: impl IntoIterator<Item = I>,
    batch_width: NonZeroUsize,
    work: F,
) -> Vec<Fut::Output>
where
    F: Fn(I) -> Fut,
    Fut: Future,
{
    let mut items = items.into_iter();
    let mut results = Vec::with_capacity(items.size_hint().0);
    let mut group = 0usize;

    loop {
        let batch: Vec<Fut> = items.by_ref().take(batch_width.get()).map(&work).collect();
        if batch.is_empty() {
            break;
        }

        group += 1;
        tracing::trace!("Running batch {} with {} operations", group, batch.len());
        results.extend(join_all(batch).await);
    }

    results
}
