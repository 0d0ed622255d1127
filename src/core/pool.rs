//! Object pools for per-call allocations
//!
//! A pool is a bounded lock-free free-list. `get` hands out a recycled
//! object when one is available and a fresh `Default` otherwise; the
//! [`Pooled`] guard puts the object back when it is dropped. Objects that do
//! not fit into a full pool are simply dropped. Reuse order is unspecified.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

/// Reset an object before it goes back into a pool.
pub trait Recycle {
    fn recycle(&mut self);
}

impl Recycle for Vec<u8> {
    fn recycle(&mut self) {
        self.clear();
    }
}

impl Recycle for String {
    fn recycle(&mut self) {
        self.clear();
    }
}

pub struct Pool<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T: Recycle + Default> Pool<T> {
    /// Create a pool that retains at most `capacity` idle objects.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    pub fn get(&self) -> Pooled<'_, T> {
        Pooled {
            value: self.receiver.try_recv().unwrap_or_default(),
            pool: self,
        }
    }

    /// Number of idle objects currently held.
    pub fn idle(&self) -> usize {
        self.receiver.len()
    }

    fn put(&self, mut value: T) {
        value.recycle();
        // A full pool drops the object.
        let _ = self.sender.try_send(value);
    }
}

/// An object on loan from a [`Pool`].
pub struct Pooled<'a, T: Recycle + Default> {
    value: T,
    pool: &'a Pool<T>,
}

impl<T: Recycle + Default> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Recycle + Default> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: Recycle + Default> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.value));
    }
}

const BUFFER_POOL_CAPACITY: usize = 64;
const BUFFER_INITIAL_CAPACITY: usize = 1024;
/// Buffers that grew past this are not kept.
const BUFFER_MAX_RETAINED: usize = 64 * 1024;

/// Byte buffer handed out by the process-wide buffer pool.
#[derive(Default)]
pub struct Buffer(Vec<u8>);

impl Recycle for Buffer {
    fn recycle(&mut self) {
        if self.0.capacity() > BUFFER_MAX_RETAINED {
            self.0 = Vec::new();
        }
        self.0.clear();
        if self.0.capacity() == 0 {
            self.0.reserve(BUFFER_INITIAL_CAPACITY);
        }
    }
}

impl Deref for Buffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.0
    }
}

/// Process-wide pool of encode buffers shared by every handler.
pub fn buffer_pool() -> &'static Pool<Buffer> {
    static POOL: OnceLock<Pool<Buffer>> = OnceLock::new();
    POOL.get_or_init(|| Pool::new(BUFFER_POOL_CAPACITY))
}
