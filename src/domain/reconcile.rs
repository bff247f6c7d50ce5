//! Full outer join of two collections under a caller-supplied equivalence.
//!
//! Equivalence is expressed as a key projection on each side: two items are
//! equivalent when their keys are equal. Items sharing a key pair up
//! positionally; whatever is left over on either side comes back one-sided.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joined<L, R> {
    Left(L),
    Right(R),
    Both(L, R),
}

impl<L, R> Joined<L, R> {
    pub fn left(&self) -> Option<&L> {
        match self {
            Self::Left(left) | Self::Both(left, _) => Some(left),
            Self::Right(_) => None,
        }
    }

    pub fn right(&self) -> Option<&R> {
        match self {
            Self::Right(right) | Self::Both(_, right) => Some(right),
            Self::Left(_) => None,
        }
    }
}

struct KeyGroup<'a, L, R> {
    left: Vec<&'a L>,
    right: Vec<&'a R>,
}

/// Joins `left` and `right` by key. Output order follows the first
/// appearance of each key, left side first; it carries no other meaning.
pub fn full_outer_join<'a, L, R, K, FL, FR>(
    left: &'a [L],
    right: &'a [R],
    key_left: FL,
    key_right: FR,
) -> Vec<Joined<&'a L, &'a R>>
where
    K: Eq + Hash,
    FL: Fn(&'a L) -> K,
    FR: Fn(&'a R) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<KeyGroup<'a, L, R>> = Vec::new();

    for item in left {
        let index = *positions.entry(key_left(item)).or_insert_with(|| {
            groups.push(KeyGroup {
                left: Vec::new(),
                right: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index].left.push(item);
    }

    for item in right {
        let index = *positions.entry(key_right(item)).or_insert_with(|| {
            groups.push(KeyGroup {
                left: Vec::new(),
                right: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index].right.push(item);
    }

    let mut joined = Vec::with_capacity(left.len().max(right.len()));
    for group in groups {
        let mut lefts = group.left.into_iter();
        let mut rights = group.right.into_iter();
        loop {
            match (lefts.next(), rights.next()) {
                (Some(l), Some(r)) => joined.push(Joined::Both(l, r)),
                (Some(l), None) => joined.push(Joined::Left(l)),
                (None, Some(r)) => joined.push(Joined::Right(r)),
                (None, None) => break,
            }
        }
    }
    joined
}
