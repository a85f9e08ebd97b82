//! Capacity growth for column buffers.
//!
//! Every column buffer is a `Vec` whose capacity is raised explicitly and
//! fallibly: when a write would not fit, the capacity jumps to
//! `max(required, current * GROWTH_FACTOR, MIN_CAPACITY)`. Doubling keeps the
//! number of reallocations over N appends at O(log N), and reserving through
//! `try_reserve_exact` turns allocator exhaustion into
//! `TipError::Allocation` instead of an abort.

use crate::config::{GROWTH_FACTOR, MIN_CAPACITY};
use crate::error::{Result, TipError};

/// Capacity to grow to so that at least `required` elements fit.
///
/// Returns `current` unchanged when it already suffices.
pub fn next_capacity(current: usize, required: usize) -> usize {
    if required <= current {
        return current;
    }
    required
        .max(current.saturating_mul(GROWTH_FACTOR))
        .max(MIN_CAPACITY)
}

/// Reserve exactly enough for `target` total elements.
///
/// Returns `true` if the buffer was reallocated.
pub(crate) fn reserve_total<T>(buf: &mut Vec<T>, target: usize, unit: &'static str) -> Result<bool> {
    if target <= buf.capacity() {
        return Ok(false);
    }
    let additional = target - buf.len();
    buf.try_reserve_exact(additional)
        .map_err(|e| TipError::allocation(additional, unit, e))?;
    Ok(true)
}

/// Make room for `additional` more elements, growing geometrically.
///
/// Returns `true` if the buffer was reallocated.
pub(crate) fn grow_for<T>(buf: &mut Vec<T>, additional: usize, unit: &'static str) -> Result<bool> {
    let required = buf.len().saturating_add(additional);
    let target = next_capacity(buf.capacity(), required);
    reserve_total(buf, target, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_capacity_no_growth_needed() {
        assert_eq!(next_capacity(100, 50), 100);
        assert_eq!(next_capacity(100, 100), 100);
    }

    #[test]
    fn test_next_capacity_doubles() {
        assert_eq!(next_capacity(100, 101), 200);
        assert_eq!(next_capacity(1000, 1500), 2000);
    }

    #[test]
    fn test_next_capacity_large_request_wins() {
        assert_eq!(next_capacity(100, 1000), 1000);
    }

    #[test]
    fn test_next_capacity_minimum() {
        assert_eq!(next_capacity(0, 1), MIN_CAPACITY);
        assert_eq!(next_capacity(2, 3), MIN_CAPACITY);
    }

    #[test]
    fn test_next_capacity_saturates() {
        assert_eq!(next_capacity(usize::MAX - 1, usize::MAX), usize::MAX);
    }

    #[test]
    fn test_grow_for_logarithmic_reallocations() {
        let mut buf: Vec<u64> = Vec::new();
        let mut reallocations = 0;
        for i in 0..100_000u64 {
            if buf.len() == buf.capacity() && grow_for(&mut buf, 1, "rows").unwrap() {
                reallocations += 1;
            }
            buf.push(i);
        }
        assert_eq!(buf.len(), 100_000);
        // 16 -> 32 -> ... -> 131072 is 14 steps.
        assert!(reallocations <= 15, "too many reallocations: {}", reallocations);
    }

    #[test]
    fn test_grow_for_preserves_contents() {
        let mut buf: Vec<u8> = b"abc".to_vec();
        grow_for(&mut buf, 1000, "bytes").unwrap();
        assert!(buf.capacity() >= 1003);
        assert_eq!(buf, b"abc");
    }

    #[test]
    fn test_reserve_total_overflow_is_allocation_error() {
        let mut buf: Vec<u64> = Vec::new();
        let err = reserve_total(&mut buf, usize::MAX, "rows").unwrap_err();
        assert_eq!(err.code(), "ALLOCATION_ERROR");
        assert_eq!(buf.capacity(), 0);
    }
}
