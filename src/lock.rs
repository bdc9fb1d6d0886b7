use std::sync::{Mutex, MutexGuard};

/// Take the lock even if a previous holder panicked. The guarded data here (log writer)
/// stays usable after a poisoned write.
pub(crate) fn lock_or_recover<'a, T>(lock: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        tracing::warn!(context, "mutex poisoned; recovering");
        poisoned.into_inner()
    })
}
