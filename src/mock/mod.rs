//! Test doubles for the collaborators a stream depends on. Every double
//! records the calls it receives so tests can assert on them.

pub mod mock_data_channel;
pub mod mock_platform;
pub mod mock_transport;

use std::sync::{Mutex, MutexGuard};

/// lock ignores poisoning, a panicking test thread must not cascade into the
/// assertions of another
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
