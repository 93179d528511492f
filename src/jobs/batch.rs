use std::future::Future;

use log::warn;

use crate::errors::Result;

/// Runs `op` over every item, capturing failures per item instead of
/// aborting the batch. The partial-failure contract is the return value:
/// callers decide what a failed entry means.
pub fn for_each_isolated<T, R, F>(label: &str, items: Vec<T>, mut op: F) -> Vec<(T, Result<R>)>
where
    F: FnMut(&T) -> Result<R>,
{
    let mut results = Vec::with_capacity(items.len());
    for item in items {
        let outcome = op(&item);
        if let Err(e) = &outcome {
            warn!("{}: entity failed, continuing batch: {}", label, e);
        }
        results.push((item, outcome));
    }
    results
}

/// Async flavor of [`for_each_isolated`]. Entities are processed one at a
/// time so each one's writes commit as their own unit.
pub async fn for_each_isolated_async<T, R, F, Fut>(
    label: &str,
    items: Vec<T>,
    mut op: F,
) -> Vec<(T, Result<R>)>
where
    T: Clone,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let mut results = Vec::with_capacity(items.len());
    for item in items {
        let outcome = op(item.clone()).await;
        if let Err(e) = &outcome {
            warn!("{}: entity failed, continuing batch: {}", label, e);
        }
        results.push((item, outcome));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn one_failure_does_not_stop_the_batch() {
        let results = for_each_isolated("test-batch", vec![1, 2, 3, 4], |n| {
            if *n == 2 {
                Err(Error::Unexpected("boom".to_string()))
            } else {
                Ok(n * 10)
            }
        });

        assert_eq!(results.len(), 4);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        assert!(results[2].1.is_ok());
        assert_eq!(*results[3].1.as_ref().unwrap(), 40);
    }

    #[tokio::test]
    async fn async_batch_isolates_failures_too() {
        let results = for_each_isolated_async("test-batch", vec!["a", "b"], |s| async move {
            if s == "a" {
                Err(Error::Unexpected("down".to_string()))
            } else {
                Ok(s.len())
            }
        })
        .await;

        assert!(results[0].1.is_err());
        assert_eq!(*results[1].1.as_ref().unwrap(), 1);
    }
}
