//! Debug-only exclusive-access guard.
//!
//! The map calls into user code (`K: Hash`, `K: Eq`) while a bucket is
//! being scanned or the whole table is being rehashed. If that user code
//! reaches back into the same map, it would observe a half-finished
//! operation. In debug builds the guard records which operation is in
//! flight and panics on nested entry, naming both operations. In release
//! builds it is a zero-sized no-op.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Map operation that may run user code.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Op {
    Lookup,
    Put,
    Remove,
    Resize,
}

/// Embed in a map and start each user-code-calling method with
/// `let _g = self.guard.enter(Op::...)`.
#[derive(Debug, Default)]
pub(crate) struct OpGuard {
    #[cfg(debug_assertions)]
    active: Cell<Option<Op>>,
    // !Send + !Sync: the map has no concurrent access model.
    _single_thread: PhantomData<*mut ()>,
}

impl OpGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _single_thread: PhantomData,
        }
    }

    /// Marks `op` as in flight until the returned token drops.
    #[inline]
    pub(crate) fn enter(&self, op: Op) -> InFlight<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("map re-entered by {op:?} while {outer:?} is in flight");
            }
            self.active.set(Some(op));
            return InFlight { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return InFlight { _z: PhantomData };
        }
    }

    /// The operation currently in flight, if any. Always `None` in release.
    #[cfg(test)]
    pub(crate) fn current(&self) -> Option<Op> {
        #[cfg(debug_assertions)]
        {
            return self.active.get();
        }
        #[cfg(not(debug_assertions))]
        {
            return None;
        }
    }
}

// Cloning a map yields an idle guard, never a copy of the in-flight state.
impl Clone for OpGuard {
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// RAII token returned by [`OpGuard::enter`].
pub(crate) struct InFlight<'a> {
    #[cfg(debug_assertions)]
    owner: &'a OpGuard,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}
