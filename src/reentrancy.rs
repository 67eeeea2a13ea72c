//! Debug-only reentrancy detection for the table.
//!
//! Lookups and inserts call user `Eq`/`Hash` impls while walking a chain.
//! Calling back into the same table from there is disallowed as a
//! conservative policy: shared-reference reentry into `get` and friends is
//! sound, and mutable reentry needs `unsafe` in the caller, but neither is a
//! supported use. Debug builds hold a [`ScanGuard`] in every such method and
//! panic on nested entry with both operation names. Release builds keep no
//! state.
//!
//! The tracker is `Send` and `!Sync` in every profile, so the table's auto
//! traits do not change with `debug_assertions`.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug, Default)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // Single-threaded table: !Sync even when `active` is compiled out.
    _not_sync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _not_sync: PhantomData,
        }
    }

    /// Marks `op` as running until the returned guard drops.
    #[inline]
    #[track_caller]
    pub(crate) fn enter(&self, op: &'static str) -> ScanGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrant call to HashTable::{op} while HashTable::{outer} is running");
            }
            self.active.set(Some(op));
            ScanGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            ScanGuard { _owner: PhantomData }
        }
    }

    #[cfg(all(test, debug_assertions))]
    pub(crate) fn is_active(&self) -> bool {
        self.active.get().is_some()
    }
}

pub(crate) struct ScanGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a DebugReentrancy>,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.active.set(None);
    }
}
