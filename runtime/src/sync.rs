use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock with poison recovery.
///
/// Surface and registry writers must keep running after a panicked holder;
/// a poisoned guard still wraps the most recent state, which is exactly what
/// the next writer wants to see.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
