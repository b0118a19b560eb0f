//! Copy-on-first-difference rewriting of shared sequences.

use std::sync::Arc;

use tracing::trace;

/// Reference identity for shared handles.
pub trait SharedRef {
    fn same_ref(&self, other: &Self) -> bool;
}

impl<T: ?Sized> SharedRef for Arc<T> {
    #[inline]
    fn same_ref(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

/// Rewrites every element of `items` in order and returns the resulting sequence.
///
/// The result is the same `Arc` as `items` if and only if every element
/// rewrote to itself. Nothing is allocated until the first element whose
/// rewrite differs; at that point one new sequence is started with the
/// untouched prefix, and every later element is pushed into it whether it
/// changed or not.
///
/// Both levels of an `In` expression go through this function: the argument
/// list and each value row directly, and the list of rows with a rewrite step
/// that is itself `rewrite_seq` on the row.
pub fn rewrite_seq<T, F>(items: &Arc<[T]>, mut rewrite: F) -> Arc<[T]>
where
    T: SharedRef + Clone,
    F: FnMut(&T) -> T,
{
    let mut materialized: Option<Vec<T>> = None;
    for (index, item) in items.iter().enumerate() {
        let rewritten = rewrite(item);
        match materialized.as_mut() {
            Some(out) => out.push(rewritten),
            None if !item.same_ref(&rewritten) => {
                trace!(index, len = items.len(), "materializing rewritten sequence");
                let mut out = Vec::with_capacity(items.len());
                out.extend_from_slice(&items[..index]);
                out.push(rewritten);
                materialized = Some(out);
            }
            None => {}
        }
    }
    match materialized {
        Some(out) => Arc::from(out),
        None => Arc::clone(items),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(values: &[i32]) -> Arc<[Arc<i32>]> {
        values.iter().map(|v| Arc::new(*v)).collect::<Vec<_>>().into()
    }

    #[test]
    fn test_unchanged_sequence_is_returned_as_is() {
        let items = seq(&[1, 2, 3]);
        let mut calls = 0;
        let result = rewrite_seq(&items, |item| {
            calls += 1;
            Arc::clone(item)
        });
        assert!(Arc::ptr_eq(&items, &result));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_empty_sequence() {
        let items = seq(&[]);
        let result = rewrite_seq(&items, |item| Arc::new(**item + 1));
        assert!(Arc::ptr_eq(&items, &result));
    }

    #[test]
    fn test_first_difference_copies_prefix_and_carries_suffix() {
        let items = seq(&[1, 2, 3, 4, 5]);
        let result = rewrite_seq(&items, |item| {
            if **item == 4 { Arc::new(40) } else { Arc::clone(item) }
        });
        assert!(!Arc::ptr_eq(&items, &result));
        assert_eq!(result.len(), 5);
        for i in 0..3 {
            assert!(Arc::ptr_eq(&items[i], &result[i]));
        }
        assert_eq!(*result[3], 40);
        assert!(Arc::ptr_eq(&items[4], &result[4]));
    }

    #[test]
    fn test_equal_but_distinct_element_counts_as_changed() {
        let items = seq(&[7]);
        let result = rewrite_seq(&items, |item| Arc::new(**item));
        assert!(!Arc::ptr_eq(&items, &result));
        assert!(!Arc::ptr_eq(&items[0], &result[0]));
        assert_eq!(*result[0], 7);
    }
}
