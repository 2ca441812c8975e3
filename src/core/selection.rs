//! Channel video selection grammar
//!
//! Users pick videos with 1-based numbers and inclusive ranges separated by
//! commas or spaces, e.g. `1-3, 7 9`.

use crate::error::SelectionError;
use std::collections::BTreeSet;

/// Parse a selection string into sorted, deduplicated zero-based indices.
///
/// Every returned index is below `bound`. Input consisting only of
/// separators yields [`SelectionError::NoValidSelections`]; an empty answer
/// meaning "everything" is handled by the caller.
pub fn parse_selection(input: &str, bound: usize) -> Result<Vec<usize>, SelectionError> {
    let mut seen = BTreeSet::new();

    for token in input
        .split(|c: char| c == ',' || c == ' ')
        .filter(|t| !t.is_empty())
    {
        if token.contains('-') {
            let (start, end) = parse_range(token, bound)?;
            seen.extend(start - 1..end);
        } else {
            seen.insert(parse_single(token, bound)? - 1);
        }
    }

    if seen.is_empty() {
        return Err(SelectionError::NoValidSelections);
    }

    Ok(seen.into_iter().collect())
}

/// Indices `0..count`, used when everything is selected
pub fn select_all(count: usize) -> Vec<usize> {
    (0..count).collect()
}

fn parse_single(token: &str, bound: usize) -> Result<usize, SelectionError> {
    let number: i64 = token
        .parse()
        .map_err(|_| SelectionError::InvalidNumber(token.to_string()))?;

    in_bounds(number, bound).ok_or(SelectionError::NumberOutOfRange { number, max: bound })
}

fn parse_range(token: &str, bound: usize) -> Result<(usize, usize), SelectionError> {
    let parts: Vec<&str> = token.split('-').collect();
    let [start, end] = parts[..] else {
        return Err(SelectionError::InvalidRangeFormat(token.to_string()));
    };

    let start: i64 = start
        .trim()
        .parse()
        .map_err(|_| SelectionError::InvalidStartNumber(start.to_string()))?;
    let end: i64 = end
        .trim()
        .parse()
        .map_err(|_| SelectionError::InvalidEndNumber(end.to_string()))?;

    let invalid = SelectionError::InvalidRange { start, end, max: bound };
    if start > end {
        return Err(invalid);
    }
    match (in_bounds(start, bound), in_bounds(end, bound)) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(invalid),
    }
}

/// `number` as a 1-based position when it lies in `1..=bound`
fn in_bounds(number: i64, bound: usize) -> Option<usize> {
    usize::try_from(number)
        .ok()
        .filter(|n| (1..=bound).contains(n))
}
