//! LIFO stack used by callers that walk graph chains.

use core::hash::Hash;
use hashbrown::HashSet;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Push every distinct element reached by following `next` from
    /// `start`; the last element reached ends up on top. The walk stops at
    /// the first element already pushed, so a cyclic chain yields each
    /// element of the cycle once.
    pub fn from_chain<F>(start: Option<T>, mut next: F) -> Self
    where
        T: Eq + Hash + Clone,
        F: FnMut(&T) -> Option<T>,
    {
        let mut s = Self::new();
        let mut seen: HashSet<T> = HashSet::new();
        let mut cur = start;
        while let Some(item) = cur {
            if !seen.insert(item.clone()) {
                trace!(len = s.len(), "chain walk closed a cycle");
                break;
            }
            cur = next(&item);
            s.push(item);
        }
        s
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pop everything, passing each element to `release` top first.
    pub fn clean_with<F>(mut self, mut release: F)
    where
        F: FnMut(T),
    {
        while let Some(item) = self.items.pop() {
            release(item);
        }
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
