//! Doubly linked sets over a fixed index range.
//!
//! Members are indices `0..capacity`. Links live in two arrays indexed by
//! member, with one extra sentinel slot at `capacity` acting as the list head,
//! so insertion, removal, and membership tests are O(1) and iteration is
//! O(len) without allocating.

/// Link value of an index that is not in the set.
const ABSENT: u16 = u16::MAX;

#[derive(Debug)]
pub struct LinkedSet {
    next: Vec<u16>,
    prev: Vec<u16>,
    len: usize,
}

impl Clone for LinkedSet {
    fn clone(&self) -> Self {
        LinkedSet {
            next: self.next.clone(),
            prev: self.prev.clone(),
            len: self.len,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.next.clone_from(&source.next);
        self.prev.clone_from(&source.prev);
        self.len = source.len;
    }
}

impl LinkedSet {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity < ABSENT as usize, "LinkedSet capacity {capacity} too large");
        let mut next = vec![ABSENT; capacity + 1];
        let mut prev = vec![ABSENT; capacity + 1];
        next[capacity] = capacity as u16;
        prev[capacity] = capacity as u16;
        LinkedSet { next, prev, len: 0 }
    }

    /// Index of the sentinel node. Passing it to [`insert_after`] inserts at the front.
    ///
    /// [`insert_after`]: LinkedSet::insert_after
    #[inline]
    pub fn head(&self) -> usize {
        self.next.len() - 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        self.next[i] != ABSENT
    }

    #[inline]
    pub fn first(&self) -> Option<usize> {
        self.after(self.head())
    }

    /// The member following `i` in list order.
    #[inline]
    pub fn next_of(&self, i: usize) -> Option<usize> {
        debug_assert!(self.contains(i));
        self.after(i)
    }

    #[inline]
    fn after(&self, i: usize) -> Option<usize> {
        let n = self.next[i] as usize;
        (n != self.head()).then_some(n)
    }

    /// Append `i` at the end.
    #[inline]
    pub fn push_back(&mut self, i: usize) {
        let last = self.prev[self.head()] as usize;
        self.insert_after(last, i);
    }

    /// Link `i` directly behind `after`, which must be a member or the head.
    pub fn insert_after(&mut self, after: usize, i: usize) {
        debug_assert!(!self.contains(i), "index {i} already linked");
        debug_assert!(after == self.head() || self.contains(after));
        let n = self.next[after];
        self.next[after] = i as u16;
        self.prev[i] = after as u16;
        self.next[i] = n;
        self.prev[n as usize] = i as u16;
        self.len += 1;
    }

    /// Unlink `i` and return the node it followed, so it can be put back
    /// in the same place with [`insert_after`].
    ///
    /// [`insert_after`]: LinkedSet::insert_after
    pub fn remove(&mut self, i: usize) -> usize {
        debug_assert!(self.contains(i), "index {i} not linked");
        let p = self.prev[i];
        let n = self.next[i];
        self.next[p as usize] = n;
        self.prev[n as usize] = p;
        self.next[i] = ABSENT;
        self.prev[i] = ABSENT;
        self.len -= 1;
        p as usize
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            set: self,
            cur: self.first(),
        }
    }
}

pub struct Iter<'a> {
    set: &'a LinkedSet,
    cur: Option<usize>,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let cur = self.cur?;
        self.cur = self.set.after(cur);
        Some(cur)
    }
}
