//! Spreading the free attribute pool over the requested allocation.

use buildman_types::build::{Attribute, AttributePoints};

/// A single attribute request against the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeCall {
    /// `increase=<name>`: one point.
    Increase(Attribute),
    /// `increase_all=<name>`: every free point.
    IncreaseAll(Attribute),
}

/// Calls that allocate `total` free points towards `requested`.
///
/// Requests are walked in ascending order (stable, so ties keep catalog
/// order). Every entry but the last gets `min(remaining, requested)` single
/// increases; zero requests are skipped and the walk stops once the pool is
/// spent. The last, largest entry takes a single bulk call when the pool
/// left covers its request, or exactly the remaining points otherwise.
pub fn distribute(requested: &AttributePoints, total: u32) -> Vec<AttributeCall> {
    let mut entries = requested.entries().to_vec();
    entries.sort_by_key(|&(_, value)| value);

    let mut calls = Vec::new();
    let Some((&(last, last_value), rest)) = entries.split_last() else {
        return calls;
    };

    let mut used: u32 = 0;
    for &(attribute, value) in rest {
        if used >= total {
            break;
        }
        if value == 0 {
            continue;
        }
        let points = value.min(total - used);
        used += points;
        calls.extend(std::iter::repeat_n(AttributeCall::Increase(attribute), points as usize));
    }

    let remaining = total.saturating_sub(used);
    if remaining > 0 && last_value > 0 {
        if remaining < last_value {
            calls.extend(std::iter::repeat_n(AttributeCall::Increase(last), remaining as usize));
        } else {
            calls.push(AttributeCall::IncreaseAll(last));
        }
    }
    calls
}
