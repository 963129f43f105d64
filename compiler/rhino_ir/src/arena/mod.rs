//! Bucketed arenas.
//!
//! An [`Arena`] owns records of one node kind in a chain of fixed-size
//! buckets. A bucket is allocated at its full capacity and never grows, so a
//! record never moves once appended and no record is freed before the arena
//! itself. Lookup by index is O(1); iteration walks bucket by bucket.
//!
//! A node kind larger than [`BUCKET_BYTES`] does not fit a bucket. Using such
//! a kind is rejected when the arena is instantiated, at compile time.


use std::fmt;
use std::marker::PhantomData;

use crate::id::Idx;

/// Size in bytes of one arena bucket.
pub const BUCKET_BYTES: usize = 16 * 1024;

/// Typed owner of all records of one node kind.
pub struct Arena<I, T> {
    buckets: Vec<Vec<T>>,
    len: usize,
    _index: PhantomData<fn() -> I>,
}

impl<I: Idx, T> Arena<I, T> {
    /// Records per bucket.
    const CAPACITY: usize = {
        let size = std::mem::size_of::<T>();
        assert!(
            size <= BUCKET_BYTES,
            "arena node kind is larger than one bucket"
        );
        if size == 0 {
            BUCKET_BYTES
        } else {
            BUCKET_BYTES / size
        }
    };

    #[inline]
    #[track_caller]
    fn raw_index(len: usize) -> u32 {
        u32::try_from(len).unwrap_or_else(|_| panic!("arena exceeded {} records", u32::MAX))
    }

    pub fn new() -> Self {
        Arena {
            buckets: Vec::new(),
            len: 0,
            _index: PhantomData,
        }
    }

    /// Append `value` and return its index.
    ///
    /// # Panics
    /// Panics if the arena already holds `u32::MAX` records.
    #[inline]
    #[track_caller]
    pub fn push(&mut self, value: T) -> I {
        let raw = Self::raw_index(self.len);
        if self
            .buckets
            .last()
            .map_or(true, |bucket| bucket.len() == Self::CAPACITY)
        {
            tracing::trace!(
                bucket = self.buckets.len(),
                capacity = Self::CAPACITY,
                "opening arena bucket"
            );
            self.buckets.push(Vec::with_capacity(Self::CAPACITY));
        }
        let last = self.buckets.len() - 1;
        self.buckets[last].push(value);
        self.len += 1;
        I::from_raw(raw)
    }

    /// Append a default-initialised record, returning its index and a
    /// mutable reference for filling it in.
    #[inline]
    #[track_caller]
    pub fn append(&mut self) -> (I, &mut T)
    where
        T: Default,
    {
        let id = self.push(T::default());
        (id, self.get_mut(id))
    }

    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn get(&self, id: I) -> &T {
        let index = id.index();
        &self.buckets[index / Self::CAPACITY][index % Self::CAPACITY]
    }

    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn get_mut(&mut self, id: I) -> &mut T {
        let index = id.index();
        &mut self.buckets[index / Self::CAPACITY][index % Self::CAPACITY]
    }

    #[inline]
    pub fn try_get(&self, id: I) -> Option<&T> {
        let index = id.index();
        self.buckets
            .get(index / Self::CAPACITY)?
            .get(index % Self::CAPACITY)
    }

    #[inline]
    pub fn contains(&self, id: I) -> bool {
        id.index() < self.len
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets allocated so far.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Index the next [`push`](Self::push) will return.
    ///
    /// # Panics
    /// Panics if the arena already holds `u32::MAX` records.
    #[inline]
    #[track_caller]
    pub fn next_id(&self) -> I {
        I::from_raw(Self::raw_index(self.len))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.buckets.iter().flatten()
    }

    /// Iterate records together with their indices.
    pub fn iter_enumerated(&self) -> impl Iterator<Item = (I, &T)> + '_ {
        (0u32..).map(I::from_raw).zip(self.iter())
    }

    /// Read-only view over the records appended so far.
    pub fn list(&self) -> List<'_, I, T> {
        List {
            arena: self,
            count: self.len,
        }
    }

    /// Iterate the records a slice refers to.
    ///
    /// # Panics
    /// Panics if the slice reaches past the end of the arena.
    #[track_caller]
    pub fn slice(&self, range: IdRange<I>) -> impl Iterator<Item = (I, &T)> + '_ {
        range.iter().map(move |id| (id, self.get(id)))
    }
}

impl<I: Idx, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Idx, T: Clone> Clone for Arena<I, T> {
    fn clone(&self) -> Self {
        // Buckets keep their full capacity in the copy.
        let buckets = self
            .buckets
            .iter()
            .map(|bucket| {
                let mut copy = Vec::with_capacity(Self::CAPACITY);
                copy.extend_from_slice(bucket);
                copy
            })
            .collect();
        Arena {
            buckets,
            len: self.len,
            _index: PhantomData,
        }
    }
}

impl<I: Idx, T: fmt::Debug> fmt::Debug for Arena<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_enumerated()).finish()
    }
}

/// A view over an arena's records, with the count captured at creation.
#[derive(Clone, Copy)]
pub struct List<'a, I, T> {
    arena: &'a Arena<I, T>,
    count: usize,
}

impl<'a, I: Idx, T> List<'a, I, T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Walk the view across bucket boundaries.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + 'a {
        self.arena.iter().take(self.count)
    }

    #[inline]
    pub fn get(&self, id: I) -> Option<&'a T> {
        if id.index() < self.count {
            self.arena.try_get(id)
        } else {
            None
        }
    }
}

/// A contiguous run of records in one arena: `(first, count)`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct IdRange<I> {
    pub start: u32,
    pub len: u32,
    _index: PhantomData<fn() -> I>,
}

impl<I: Idx> IdRange<I> {
    pub const EMPTY: Self = IdRange {
        start: 0,
        len: 0,
        _index: PhantomData,
    };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        IdRange {
            start,
            len,
            _index: PhantomData,
        }
    }

    /// Range from `first` up to (excluding) `end`.
    #[inline]
    pub fn between(first: I, end: I) -> Self {
        Self::new(first.raw(), end.raw().saturating_sub(first.raw()))
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Exclusive end index.
    #[inline]
    pub const fn end(self) -> u32 {
        self.start + self.len
    }

    #[inline]
    pub fn first(self) -> Option<I> {
        (!self.is_empty()).then(|| I::from_raw(self.start))
    }

    #[inline]
    pub fn contains(self, id: I) -> bool {
        (self.start..self.end()).contains(&id.raw())
    }

    pub fn iter(self) -> impl DoubleEndedIterator<Item = I> + ExactSizeIterator {
        (self.start..self.end()).map(I::from_raw)
    }
}

impl<I> fmt::Debug for IdRange<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}; {}]", self.start, self.len)
    }
}
