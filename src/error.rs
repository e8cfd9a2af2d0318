use std::fmt;

/// Error type for [`RingBuffer::read()`](crate::RingBuffer::read) and its variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// No filled slot was available.
    ///
    /// Returned by the non-blocking reads.
    /// A blocking read only returns this after losing a race for a slot,
    /// in which case it is safe to try again.
    Empty,
    /// The timeout expired before a filled slot became available.
    Timeout,
}

impl std::error::Error for ReadError {}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Empty => "empty ring buffer".fmt(f),
            ReadError::Timeout => "timed out waiting for a filled slot".fmt(f),
        }
    }
}

/// Error type for [`RingBuffer::try_write()`](crate::RingBuffer::try_write) and
/// [`RingBuffer::write_for()`](crate::RingBuffer::write_for).
///
/// The rejected value is handed back to the caller.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum WriteError<T> {
    /// The ring buffer was full.
    Full(T),
    /// The timeout expired before an empty slot became available.
    Timeout(T),
}

impl<T> WriteError<T> {
    /// Returns the value that could not be written.
    pub fn into_inner(self) -> T {
        match self {
            WriteError::Full(value) | WriteError::Timeout(value) => value,
        }
    }
}

impl<T> std::error::Error for WriteError<T> {}

impl<T> fmt::Debug for WriteError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::Full(_) => f.pad("Full(_)"),
            WriteError::Timeout(_) => f.pad("Timeout(_)"),
        }
    }
}

impl<T> fmt::Display for WriteError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::Full(_) => "full ring buffer".fmt(f),
            WriteError::Timeout(_) => "timed out waiting for an empty slot".fmt(f),
        }
    }
}
