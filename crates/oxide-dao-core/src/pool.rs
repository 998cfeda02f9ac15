//! Reusable scratch buffers and generated parameter names.
//!
//! Both are a performance aid only; nothing depends on a buffer actually
//! being reused.

use std::borrow::Cow;
use std::ops::{Deref, DerefMut};
use std::sync::{LazyLock, Mutex};

/// Number of parameter names generated up front.
const PARAM_NAME_TABLE: usize = 256;

/// Upper bound on idle buffers kept by a pool.
const MAX_IDLE_BUFFERS: usize = 64;

static PARAM_NAMES: LazyLock<Vec<String>> =
    LazyLock::new(|| (0..PARAM_NAME_TABLE).map(|i| format!("param{i}")).collect());

/// Returns the generated name for the parameter at `index`: `param0`,
/// `param1`, ...
///
/// Names below the table size are shared statics and never allocate.
#[must_use]
pub fn param_name(index: usize) -> Cow<'static, str> {
    PARAM_NAMES
        .get(index)
        .map_or_else(|| Cow::Owned(format!("param{index}")), |s| Cow::Borrowed(s.as_str()))
}

/// A pool of `String` buffers shared between concurrent query builds.
#[derive(Debug, Default)]
pub struct BufferPool {
    idle: Mutex<Vec<String>>,
}

impl BufferPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a cleared buffer. It goes back to the pool when the guard is
    /// dropped, on every exit path.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self
            .idle
            .lock()
            .ok()
            .and_then(|mut idle| idle.pop())
            .unwrap_or_default();
        PooledBuffer {
            pool: self,
            buf: Some(buf),
        }
    }

    /// Returns a buffer that was detached with [`PooledBuffer::into_string`].
    pub fn release(&self, mut buf: String) {
        buf.clear();
        if let Ok(mut idle) = self.idle.lock() {
            if idle.len() < MAX_IDLE_BUFFERS {
                idle.push(buf);
            }
        }
    }

    /// Number of idle buffers.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.idle.lock().map_or(0, |idle| idle.len())
    }
}

/// A buffer on loan from a [`BufferPool`].
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Option<String>,
}

impl PooledBuffer<'_> {
    /// Detaches the buffer from the pool, keeping its contents.
    #[must_use]
    pub fn into_string(mut self) -> String {
        self.buf.take().unwrap_or_default()
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        // Only `into_string` and `drop` empty the slot, and both consume the guard.
        self.buf.as_ref().unwrap_or(&EMPTY)
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut String {
        self.buf.get_or_insert_with(String::new)
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}

static EMPTY: String = String::new();
