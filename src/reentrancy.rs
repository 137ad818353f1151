//! Debug-only busy flag for `KeyedIndex`.
//!
//! Lookups and inserts call user `Eq`/`Hash` impls while a bucket chain is
//! being walked or relinked. A key impl that calls back into the same index
//! at that point would observe a half-linked chain, so debug builds panic on
//! nested entry. Release builds compile the flag away.

#[cfg(debug_assertions)]
use core::cell::Cell;
#[cfg(not(debug_assertions))]
use core::marker::PhantomData;

#[derive(Debug)]
pub(crate) struct BusyFlag {
    // Absent in release builds.
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
}

impl BusyFlag {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
        }
    }

    /// Mark the owning index busy until the returned guard drops.
    #[inline]
    pub(crate) fn enter(&self) -> BusyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.busy.replace(true),
                "reentrant call into KeyedIndex from a key's Eq or Hash impl"
            );
            BusyGuard { flag: self }
        }

        #[cfg(not(debug_assertions))]
        {
            BusyGuard { _flag: PhantomData }
        }
    }
}

impl Default for BusyFlag {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct BusyGuard<'a> {
    #[cfg(debug_assertions)]
    flag: &'a BusyFlag,
    #[cfg(not(debug_assertions))]
    _flag: PhantomData<&'a ()>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.flag.busy.set(false);
    }
}
