use core::fmt;
use core::hash::{Hash, Hasher};
use smallvec::SmallVec;

/// Index of a leaf in the numbered syntax tree. Values at or above the leaf
/// count name end markers.
pub type Position = usize;

/// Ordered sequence of positions.
///
/// `union` splices one sequence onto another without removing duplicates, so
/// a position may appear more than once when several enclosing constructs
/// contribute it. Equality compares the sequences element by element.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PositionSeq {
    items: SmallVec<[Position; 8]>,
}

impl PositionSeq {
    pub fn new() -> Self {
        Self {
            items: SmallVec::new(),
        }
    }

    pub fn singleton(position: Position) -> Self {
        let mut seq = Self::new();
        seq.append(position);
        seq
    }

    pub fn append(&mut self, position: Position) {
        self.items.push(position);
    }

    pub fn prepend(&mut self, position: Position) {
        self.items.insert(0, position);
    }

    /// Splice `other` onto the end of `self`, consuming both.
    #[must_use]
    pub fn union(mut self, other: Self) -> Self {
        self.items.extend(other.items);
        self
    }

    /// Splice a copy of `other` onto the end of `self`.
    pub fn extend_from(&mut self, other: &Self) {
        self.items.extend_from_slice(&other.items);
    }

    /// Append the positions of `other` that are not already present.
    pub(crate) fn merge_distinct(&mut self, other: &Self) {
        for &position in other.iter() {
            if !self.contains(position) {
                self.items.push(position);
            }
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.items.contains(&position)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> + '_ {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.items
    }
}

impl Hash for PositionSeq {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sum: u32 = 0;
        let mut weight: u32 = 1;
        for &position in &self.items {
            sum = sum.wrapping_add((position as u32).wrapping_mul(weight));
            weight = weight.wrapping_mul(10);
        }
        state.write_u32(sum);
    }
}

impl FromIterator<Position> for PositionSeq {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PositionSeq {
    type Item = &'a Position;
    type IntoIter = core::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Debug for PositionSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}
