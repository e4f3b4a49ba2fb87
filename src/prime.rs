//! Prime sizing for bucket arrays.
//!
//! Both maps keep their bucket count prime. With a prime modulus the quadratic
//! sequence `home + i²` reaches `(capacity + 1) / 2` distinct slots, which is what
//! lets the probing map stop after at most `capacity` steps.

/// Returns true if `n` is prime, using trial division by odd factors up to `√n`
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n <= 1 || n.is_multiple_of(2) {
        return false;
    }

    let mut factor: usize = 3;
    while factor.saturating_mul(factor) <= n {
        if n.is_multiple_of(factor) {
            return false;
        }
        factor += 2;
    }
    true
}

/// Rounds `n` up to the next odd number and then to the next prime.
///
/// Note that even inputs are bumped first, so `next_prime(2)` is `3` and
/// `next_prime(0)` is `3` as well. Inputs above the largest prime that fits in a
/// `usize` saturate at `usize::MAX`, which is not prime.
#[must_use]
pub fn next_prime(n: usize) -> usize {
    let mut candidate = if n.is_multiple_of(2) { n.saturating_add(1) } else { n };
    while candidate < usize::MAX && !is_prime(candidate) {
        candidate = candidate.saturating_add(2);
    }
    candidate
}

/// The capacity a table grows to once its load threshold is reached
#[must_use]
pub fn grow_capacity(capacity: usize) -> usize {
    next_prime(capacity.saturating_mul(2))
}

/// Smallest prime capacity at or above `requested` that keeps `live` entries
/// within `fits`, doubling the candidate until it does.
pub(crate) fn fitting_capacity(
    requested: usize,
    live: usize,
    fits: impl Fn(usize, usize) -> bool,
) -> usize {
    let mut capacity = next_prime(requested);
    while !fits(live, capacity) {
        capacity = grow_capacity(capacity);
    }
    capacity
}
