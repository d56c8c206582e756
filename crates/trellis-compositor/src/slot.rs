use std::sync::{Arc, Mutex, MutexGuard};

enum SlotState<T> {
    Empty,
    Filled(Arc<T>),
    Closed,
}

/// Once-guarded holder for a lazily created overlay.
///
/// The initializer runs under the slot's lock, so concurrent first use
/// builds exactly one instance. Once closed the slot never fills again.
pub(crate) struct LazySlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> LazySlot<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Empty),
        }
    }

    fn state(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The existing instance, or a new one from `init`. `None` once closed.
    pub(crate) fn get_or_init(&self, init: impl FnOnce() -> Arc<T>) -> Option<Arc<T>> {
        let mut state = self.state();
        match &*state {
            SlotState::Filled(value) => Some(Arc::clone(value)),
            SlotState::Closed => None,
            SlotState::Empty => {
                let value = init();
                *state = SlotState::Filled(Arc::clone(&value));
                Some(value)
            }
        }
    }

    pub(crate) fn get(&self) -> Option<Arc<T>> {
        match &*self.state() {
            SlotState::Filled(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    /// Close the slot, handing back the instance it held.
    pub(crate) fn close(&self) -> Option<Arc<T>> {
        match std::mem::replace(&mut *self.state(), SlotState::Closed) {
            SlotState::Filled(value) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        matches!(&*self.state(), SlotState::Closed)
    }
}
