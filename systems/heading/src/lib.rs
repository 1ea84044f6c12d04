#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure heading filter that rejects 180 degree reversals.
//!
//! The filter keeps no memory of its own. The world passes the heading its
//! previous step applied as `current`, so a reversal can never be queued
//! behind a perpendicular request that has not yet been consumed.

use joyful_snake_core::Heading;

/// Reports whether `requested` points exactly against `current`.
#[must_use]
pub const fn is_reversal(current: Heading, requested: Heading) -> bool {
    matches!(
        (current, requested),
        (Heading::Up, Heading::Down)
            | (Heading::Down, Heading::Up)
            | (Heading::Left, Heading::Right)
            | (Heading::Right, Heading::Left)
    )
}

/// Returns `requested` unless it reverses `current`, in which case `current` wins.
#[must_use]
pub const fn resolve(current: Heading, requested: Heading) -> Heading {
    if is_reversal(current, requested) {
        current
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversal_agrees_with_opposite() {
        for current in Heading::ALL {
            for requested in Heading::ALL {
                assert_eq!(
                    is_reversal(current, requested),
                    requested == current.opposite()
                );
            }
        }
    }
}
