//! Dense bitset primitives the searchers operate on.
//!
//! `DigitSet` covers the 9 digits of one cell, `CellMap` the 81 cells of a
//! grid, `CandidateMap` the 729 (cell, digit) candidates. All three are
//! `Copy` value types with O(1) membership and popcount cardinality.

use serde::{Deserialize, Serialize};

/// Set of candidate digits 1..=9, backed by the low 9 bits of a `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DigitSet(u16);

const ALL_DIGITS: u16 = 0x1FF;

impl DigitSet {
    /// Empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All nine digits.
    pub const fn full() -> Self {
        Self(ALL_DIGITS)
    }

    /// Set containing a single digit.
    pub fn single(digit: u8) -> Self {
        debug_assert!((1..=9).contains(&digit));
        Self(1 << (digit - 1))
    }

    pub fn insert(&mut self, digit: u8) {
        debug_assert!((1..=9).contains(&digit));
        self.0 |= 1 << (digit - 1);
    }

    pub fn remove(&mut self, digit: u8) {
        debug_assert!((1..=9).contains(&digit));
        self.0 &= !(1 << (digit - 1));
    }

    #[inline]
    pub fn contains(&self, digit: u8) -> bool {
        debug_assert!((1..=9).contains(&digit));
        self.0 & (1 << (digit - 1)) != 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(&self, other: &Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersect(&self, other: &Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// The digit if the set holds exactly one, otherwise `None`.
    pub fn only_digit(&self) -> Option<u8> {
        if self.0.count_ones() == 1 {
            Some(self.0.trailing_zeros() as u8 + 1)
        } else {
            None
        }
    }

    /// Iterate digits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        let bits = self.0;
        (1..=9u8).filter(move |d| bits & (1 << (d - 1)) != 0)
    }
}

impl FromIterator<u8> for DigitSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::empty();
        for d in iter {
            set.insert(d);
        }
        set
    }
}

/// Set of cell indices 0..81, backed by a `u128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellMap(u128);

const ALL_CELLS: u128 = (1u128 << 81) - 1;

impl CellMap {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn full() -> Self {
        Self(ALL_CELLS)
    }

    pub fn insert(&mut self, cell: usize) {
        debug_assert!(cell < 81);
        self.0 |= 1 << cell;
    }

    pub fn remove(&mut self, cell: usize) {
        debug_assert!(cell < 81);
        self.0 &= !(1 << cell);
    }

    #[inline]
    pub fn contains(&self, cell: usize) -> bool {
        debug_assert!(cell < 81);
        self.0 & (1 << cell) != 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(&self, other: &Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersect(&self, other: &Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// The cell if the set holds exactly one, otherwise `None`.
    pub fn only_cell(&self) -> Option<usize> {
        if self.0.count_ones() == 1 {
            Some(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Iterate cell indices in ascending order.
    pub fn iter(&self) -> CellMapIter {
        CellMapIter(self.0)
    }
}

impl FromIterator<usize> for CellMap {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut map = Self::empty();
        for c in iter {
            map.insert(c);
        }
        map
    }
}

pub struct CellMapIter(u128);

impl Iterator for CellMapIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let cell = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(cell)
    }
}

/// Set of (cell, digit) candidates, 729 bits over `[u64; 12]`.
///
/// Candidate index convention: `cell * 9 + (digit - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CandidateMap([u64; 12]);

impl CandidateMap {
    pub const fn empty() -> Self {
        Self([0; 12])
    }

    #[inline]
    pub fn index(cell: usize, digit: u8) -> usize {
        debug_assert!(cell < 81 && (1..=9).contains(&digit));
        cell * 9 + (digit as usize - 1)
    }

    pub fn insert(&mut self, cell: usize, digit: u8) {
        let i = Self::index(cell, digit);
        self.0[i / 64] |= 1 << (i % 64);
    }

    pub fn remove(&mut self, cell: usize, digit: u8) {
        let i = Self::index(cell, digit);
        self.0[i / 64] &= !(1 << (i % 64));
    }

    #[inline]
    pub fn contains(&self, cell: usize, digit: u8) -> bool {
        let i = Self::index(cell, digit);
        self.0[i / 64] & (1 << (i % 64)) != 0
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = [0u64; 12];
        for (i, w) in out.iter_mut().enumerate() {
            *w = self.0[i] | other.0[i];
        }
        Self(out)
    }

    pub fn intersect(&self, other: &Self) -> Self {
        let mut out = [0u64; 12];
        for (i, w) in out.iter_mut().enumerate() {
            *w = self.0[i] & other.0[i];
        }
        Self(out)
    }

    pub fn difference(&self, other: &Self) -> Self {
        let mut out = [0u64; 12];
        for (i, w) in out.iter_mut().enumerate() {
            *w = self.0[i] & !other.0[i];
        }
        Self(out)
    }

    /// Iterate (cell, digit) pairs in candidate-index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        let words = self.0;
        (0..12usize).flat_map(move |wi| {
            let mut w = words[wi];
            std::iter::from_fn(move || {
                if w == 0 {
                    return None;
                }
                let bit = w.trailing_zeros() as usize;
                w &= w - 1;
                let i = wi * 64 + bit;
                if i >= 729 {
                    return None;
                }
                Some((i / 9, (i % 9) as u8 + 1))
            })
        })
    }
}

impl FromIterator<(usize, u8)> for CandidateMap {
    fn from_iter<I: IntoIterator<Item = (usize, u8)>>(iter: I) -> Self {
        let mut map = Self::empty();
        for (c, d) in iter {
            map.insert(c, d);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_set_basics() {
        let mut s = DigitSet::empty();
        assert!(s.is_empty());
        s.insert(3);
        s.insert(7);
        assert!(s.contains(3));
        assert!(!s.contains(4));
        assert_eq!(s.len(), 2);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![3, 7]);
        s.remove(3);
        assert_eq!(s.only_digit(), Some(7));
    }

    #[test]
    fn test_digit_set_algebra() {
        let a: DigitSet = [1u8, 2, 3].into_iter().collect();
        let b: DigitSet = [2u8, 3, 4].into_iter().collect();
        assert_eq!(a.union(&b).len(), 4);
        assert_eq!(a.intersect(&b).len(), 2);
        assert_eq!(a.difference(&b).only_digit(), Some(1));
        assert!(a.intersect(&b).is_subset_of(&a));
    }

    #[test]
    fn test_cell_map() {
        let mut m = CellMap::empty();
        m.insert(0);
        m.insert(80);
        assert_eq!(m.len(), 2);
        assert!(m.contains(80));
        assert_eq!(m.iter().collect::<Vec<_>>(), vec![0, 80]);
        assert_eq!(CellMap::full().len(), 81);
        m.remove(0);
        assert_eq!(m.only_cell(), Some(80));
    }

    #[test]
    fn test_candidate_map() {
        let mut m = CandidateMap::empty();
        m.insert(0, 1);
        m.insert(80, 9);
        m.insert(40, 5);
        assert_eq!(m.len(), 3);
        assert!(m.contains(40, 5));
        assert!(!m.contains(40, 6));
        let pairs: Vec<_> = m.iter().collect();
        assert_eq!(pairs, vec![(0, 1), (40, 5), (80, 9)]);
        m.remove(40, 5);
        assert!(!m.contains(40, 5));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn test_candidate_map_algebra() {
        let a: CandidateMap = [(0usize, 1u8), (1, 2)].into_iter().collect();
        let b: CandidateMap = [(1usize, 2u8), (2, 3)].into_iter().collect();
        assert_eq!(a.union(&b).len(), 3);
        assert_eq!(a.intersect(&b).iter().collect::<Vec<_>>(), vec![(1, 2)]);
        assert_eq!(a.difference(&b).iter().collect::<Vec<_>>(), vec![(0, 1)]);
    }
}
