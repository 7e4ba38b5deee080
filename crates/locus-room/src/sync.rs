//! Lock helpers that recover from poisoning.
//!
//! Every critical section in this crate validates before it mutates, so a
//! panic inside one (from a misbehaving `Entity` or `EventBus`) leaves the
//! maps consistent and the guard is safe to take back.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

