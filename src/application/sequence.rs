use std::collections::HashSet;
use std::hash::Hash;

use crate::domain::delta::Delta;
use crate::domain::value_objects::ComparisonKey;

// ─── Sequence differencer ───
//
// Minimal edit script between two key sequences, via a suffix LCS table:
// `table[i][j]` is the LCS length of `left[i..]` and `right[j..]`.
//
// Tie-break (leftmost-greedy): walking from (0, 0), equal heads are matched,
// the right head is skipped while that keeps the LCS length, otherwise the
// left head is dropped. A left element is therefore kept whenever some
// minimal script can keep it, so identical input always yields the same
// script.

/// Compute the edit script turning `left` into `right`.
///
/// Deltas come out gap by gap: the Deletes of a left gap, then the Inserts
/// of the matching right gap, then the Match closing the gap.
pub fn diff_keys(left: &[ComparisonKey], right: &[ComparisonKey]) -> Vec<Delta> {
    let matches = align(left, right);
    let mut deltas = Vec::with_capacity(left.len() + right.len() - matches.len());

    let (mut li, mut ri) = (0, 0);
    for (l, r) in matches {
        push_gap(&mut deltas, left, li..l, right, ri..r);
        deltas.push(Delta::Match {
            left_pos: l,
            right_pos: r,
            key: left[l].clone(),
            changes: Vec::new(),
        });
        li = l + 1;
        ri = r + 1;
    }
    push_gap(&mut deltas, left, li..left.len(), right, ri..right.len());

    deltas
}

fn push_gap(
    deltas: &mut Vec<Delta>,
    left: &[ComparisonKey],
    deleted: std::ops::Range<usize>,
    right: &[ComparisonKey],
    inserted: std::ops::Range<usize>,
) {
    deltas.extend(deleted.map(|pos| Delta::Delete {
        pos,
        key: left[pos].clone(),
    }));
    deltas.extend(inserted.map(|pos| Delta::Insert {
        pos,
        key: right[pos].clone(),
    }));
}

/// Matched `(left_pos, right_pos)` pairs of a leftmost-greedy LCS, both
/// strictly increasing.
pub fn align<T: Eq + Hash>(left: &[T], right: &[T]) -> Vec<(usize, usize)> {
    // Common prefix: the greedy walk would match these one by one anyway.
    let prefix = left
        .iter()
        .zip(right)
        .take_while(|(a, b)| a == b)
        .count();
    let mut matches: Vec<(usize, usize)> = (0..prefix).map(|i| (i, i)).collect();

    // Elements absent from the other side can never match; dropping them
    // keeps the match set unchanged and shrinks the table.
    let right_keys: HashSet<&T> = right[prefix..].iter().collect();
    let left_keys: HashSet<&T> = left[prefix..].iter().collect();
    let a: Vec<usize> = (prefix..left.len())
        .filter(|&i| right_keys.contains(&left[i]))
        .collect();
    let b: Vec<usize> = (prefix..right.len())
        .filter(|&j| left_keys.contains(&right[j]))
        .collect();

    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 {
        return matches;
    }

    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if left[a[i]] == right[b[j]] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if left[a[i]] == right[b[j]] {
            matches.push((a[i], b[j]));
            i += 1;
            j += 1;
        } else if table[i * width + j + 1] == table[i * width + j] {
            j += 1;
        } else {
            i += 1;
        }
    }

    matches
}

/// Apply an edit script to the left keys: Deletes are skipped, Inserts are
/// placed at their recorded position, Matches keep the left element.
///
/// Returns `None` when a delta points outside its sequence or out of order.
pub fn replay(
    left: &[ComparisonKey],
    deltas: &[Delta],
) -> Option<Vec<ComparisonKey>> {
    let mut out: Vec<ComparisonKey> = Vec::with_capacity(deltas.len());
    let mut next_left = 0;

    for d in deltas {
        match d {
            Delta::Delete { pos, key } => {
                if *pos != next_left || left.get(*pos) != Some(key) {
                    return None;
                }
                next_left += 1;
            }
            Delta::Insert { pos, key } => {
                if *pos != out.len() {
                    return None;
                }
                out.push(key.clone());
            }
            Delta::Match {
                left_pos,
                right_pos,
                key,
                ..
            } => {
                if *left_pos != next_left || *right_pos != out.len() || left.get(*left_pos) != Some(key) {
                    return None;
                }
                out.push(key.clone());
                next_left += 1;
            }
        }
    }

    // every left element must be accounted for
    (next_left == left.len()).then_some(out)
}
