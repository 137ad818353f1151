//! OrderedList: doubly linked list over a generational arena.
//!
//! Cells are addressed by `ListHandle`; push operations return the handle so
//! a caller can later remove that cell in O(1) without walking the list.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to one cell of an `OrderedList`.
    pub struct ListHandle;
}

#[derive(Debug)]
struct Cell<T> {
    data: T,
    prev: Option<ListHandle>,
    next: Option<ListHandle>,
}

#[derive(Debug)]
pub struct OrderedList<T> {
    cells: SlotMap<ListHandle, Cell<T>>,
    head: Option<ListHandle>,
    tail: Option<ListHandle>,
}

impl<T> OrderedList<T> {
    pub fn new() -> Self {
        Self {
            cells: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn push_front(&mut self, data: T) -> ListHandle {
        let old = self.head;
        let h = self.cells.insert(Cell {
            data,
            prev: None,
            next: old,
        });
        match old {
            Some(o) => self.cells[o].prev = Some(h),
            None => self.tail = Some(h),
        }
        self.head = Some(h);
        h
    }

    pub fn push_back(&mut self, data: T) -> ListHandle {
        let old = self.tail;
        let h = self.cells.insert(Cell {
            data,
            prev: old,
            next: None,
        });
        match old {
            Some(o) => self.cells[o].next = Some(h),
            None => self.head = Some(h),
        }
        self.tail = Some(h);
        h
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let h = self.head?;
        self.remove(h)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let h = self.tail?;
        self.remove(h)
    }

    /// Unlink the cell behind `h`; `None` if it was already removed.
    pub fn remove(&mut self, h: ListHandle) -> Option<T> {
        let cell = self.cells.remove(h)?;
        match cell.prev {
            Some(p) => self.cells[p].next = cell.next,
            None => self.head = cell.next,
        }
        match cell.next {
            Some(n) => self.cells[n].prev = cell.prev,
            None => self.tail = cell.prev,
        }
        Some(cell.data)
    }

    pub fn front(&self) -> Option<&T> {
        self.head.map(|h| &self.cells[h].data)
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.map(|h| &self.cells[h].data)
    }

    pub fn get(&self, h: ListHandle) -> Option<&T> {
        self.cells.get(h).map(|c| &c.data)
    }

    pub fn get_mut(&mut self, h: ListHandle) -> Option<&mut T> {
        self.cells.get_mut(h).map(|c| &mut c.data)
    }

    /// Head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cur: self.head,
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.head = None;
        self.tail = None;
    }

    /// Tear the list down head to tail, passing each element to `release`.
    pub fn clean_with<F>(mut self, mut release: F)
    where
        F: FnMut(T),
    {
        while let Some(data) = self.pop_front() {
            release(data);
        }
    }
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for OrderedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for data in iter {
            list.push_back(data);
        }
        list
    }
}

pub struct Iter<'a, T> {
    list: &'a OrderedList<T>,
    cur: Option<ListHandle>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        let cell = &self.list.cells[self.cur?];
        self.cur = cell.next;
        Some(&cell.data)
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
