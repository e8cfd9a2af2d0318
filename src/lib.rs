//! A blocking multi-producer multi-consumer (MPMC) ring buffer of fixed-size blocks.
//!
//! A [`RingBuffer`] owns a fixed number of slots (`BLOCKS`),
//! each of which can hold one [`Block`] of up to `BLOCK_SIZE` elements.
//! This makes it suitable for streaming chunks of data (e.g. bytes from network I/O
//! or file transfer) from one set of threads to another.
//!
//! The slots are allocated on construction.
//! After that, no more memory is allocated (unless the type `T` does that internally).
//!
//! Any number of threads can write into and read from the same ring buffer,
//! which is typically shared with an [`Arc`](std::sync::Arc) or with scoped threads.
//! Two counting semaphores keep track of the empty and the filled slots, respectively.
//! Writing into a full ring buffer suspends the writing thread until a slot is free;
//! reading from an empty ring buffer suspends the reading thread until a slot is filled.
//! A lock protecting the slots and the read/write positions is only held
//! while a block is moved in or out, never while waiting.
//!
//! Blocks are read in the same order in which their writes have been committed.
//! Values inside the ring buffer are never overwritten.
//!
//! # Examples
//!
//! Moving whole blocks into and out of the ring buffer with
//! [`RingBuffer::write()`] and [`RingBuffer::read()`], respectively:
//!
//! ```
//! use blockring::{Block, ReadError, RingBuffer};
//!
//! let rb = RingBuffer::<i32, 2, 3>::new();
//!
//! rb.write(Block::from([1, 2, 3]));
//! // NB: Only 2 of the 3 elements are in use:
//! rb.write(Block::from_slice(&[4, 5]));
//!
//! std::thread::scope(|s| {
//!     s.spawn(|| {
//!         assert_eq!(*rb.read().unwrap(), [1, 2, 3]);
//!         assert_eq!(*rb.read().unwrap(), [4, 5]);
//!         assert_eq!(rb.try_read(), Err(ReadError::Empty));
//!     });
//! });
//! ```
//!
//! Writing elements from any collection and appending them to a growable one
//! with [`RingBuffer::write_from()`] and [`RingBuffer::read_into()`].
//! Surplus elements that don't fit into a block are dropped silently:
//!
//! ```
//! use blockring::RingBuffer;
//!
//! let rb = RingBuffer::<u32, 4, 5>::new();
//!
//! assert_eq!(rb.write_from(vec![10u32, 11, 12]), 3);
//! assert_eq!(rb.write_from(0..100u32), 5);
//!
//! let mut v = Vec::new();
//! assert_eq!(rb.read_into(&mut v), Ok(3));
//! assert_eq!(rb.read_into(&mut v), Ok(5));
//! assert_eq!(v, [10, 11, 12, 0, 1, 2, 3, 4]);
//! assert!(rb.is_empty());
//! ```
//!
//! ## Timeouts and Cancellation
//!
//! The blocking functions cannot be cancelled.
//! Threads that need to stop waiting at some point should use
//! [`RingBuffer::read_for()`] (or one of its variants) in a loop
//! and check their own cancellation signal between the attempts:
//!
//! ```
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::time::Duration;
//!
//! use blockring::{ReadError, RingBuffer};
//!
//! let rb = RingBuffer::<u8, 4, 1024>::new();
//! let stop = AtomicBool::new(false);
//!
//! std::thread::scope(|s| {
//!     let consumer = s.spawn(|| {
//!         let mut received = Vec::new();
//!         while !stop.load(Ordering::Acquire) {
//!             // A timeout just gives us another chance to check the stop flag.
//!             if let Err(e) = rb.read_into_for(&mut received, Duration::from_millis(10)) {
//!                 assert_eq!(e, ReadError::Timeout);
//!             }
//!         }
//!         received
//!     });
//!     rb.write_from(*b"data");
//!     while !rb.is_empty() {
//!         std::thread::yield_now();
//!     }
//!     stop.store(true, Ordering::Release);
//!     assert_eq!(consumer.join().unwrap(), b"data");
//! });
//! ```
//!
//! ## Raw Bytes
//!
//! A `RingBuffer<u8, ..>` can be filled with [`std::io::Write`] and
//! drained into plain byte slices with [`RingBuffer::read_bytes()`]:
//!
//! ```
//! use std::io::Write;
//!
//! use blockring::RingBuffer;
//!
//! let rb = RingBuffer::<u8, 4, 4>::new();
//! (&rb).write_all(b"hello world").unwrap();
//! assert_eq!(rb.len(), 3);
//!
//! let mut buf = [0; 16];
//! assert_eq!(rb.read_bytes(&mut buf), Ok(4));
//! assert_eq!(&buf[..4], b"hell");
//! assert_eq!(rb.read_bytes(&mut buf), Ok(4));
//! assert_eq!(&buf[..4], b"o wo");
//! assert_eq!(rb.read_bytes(&mut buf), Ok(3));
//! assert_eq!(&buf[..3], b"rld");
//! ```

#![warn(rust_2018_idioms)]
#![deny(missing_docs)]

use std::time::Duration;

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;

pub mod block;
mod error;
mod semaphore;

pub use block::Block;
pub use error::{ReadError, WriteError};

use semaphore::Semaphore;

/// A bounded multi-producer multi-consumer queue of [`Block`]s.
///
/// `BLOCKS` is the number of slots, `BLOCK_SIZE` is the maximum number of elements per block.
/// Both are fixed at compile time and must be greater than zero.
///
/// *See also the [crate-level documentation](crate).*
#[derive(Debug)]
pub struct RingBuffer<T, const BLOCKS: usize, const BLOCK_SIZE: usize> {
    /// Counts the slots that can be filled by writers.
    empty_slots: CachePadded<Semaphore>,

    /// Counts the slots holding a block that hasn't been read yet.
    filled_slots: CachePadded<Semaphore>,

    /// The slots and the read/write positions.
    slots: Mutex<Slots<T, BLOCK_SIZE>>,
}

impl<T, const BLOCKS: usize, const BLOCK_SIZE: usize> RingBuffer<T, BLOCKS, BLOCK_SIZE>
where
    T: Default,
{
    /// Fails compilation if a `RingBuffer` with zero slots or zero-sized blocks is created.
    const VALID_PARAMETERS: () = assert!(
        BLOCKS > 0 && BLOCK_SIZE > 0,
        "BLOCKS and BLOCK_SIZE must be greater than zero"
    );

    /// Creates a `RingBuffer` with `BLOCKS` empty slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockring::RingBuffer;
    ///
    /// let rb = RingBuffer::<u8, 16, 4096>::new();
    /// assert!(rb.is_empty());
    /// ```
    pub fn new() -> RingBuffer<T, BLOCKS, BLOCK_SIZE> {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_PARAMETERS;
        RingBuffer {
            empty_slots: CachePadded::new(Semaphore::new(BLOCKS)),
            filled_slots: CachePadded::new(Semaphore::new(0)),
            slots: Mutex::new(Slots {
                blocks: (0..BLOCKS).map(|_| Block::new()).collect(),
                write_index: 0,
                read_index: 0,
                len: 0,
            }),
        }
    }

    /// Moves a block into the ring buffer.
    ///
    /// If the ring buffer is full, this suspends the calling thread
    /// until a slot has been freed by a reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockring::{Block, RingBuffer};
    ///
    /// let rb = RingBuffer::<char, 1, 2>::new();
    /// rb.write(Block::from(['a', 'b']));
    /// assert_eq!(rb.len(), 1);
    /// ```
    pub fn write(&self, block: Block<T, BLOCK_SIZE>) {
        self.empty_slots.acquire();
        self.commit(block);
    }

    /// Attempts to move a block into the ring buffer without waiting.
    ///
    /// If the ring buffer is full, the block is returned back as an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockring::{Block, RingBuffer, WriteError};
    ///
    /// let rb = RingBuffer::<i32, 1, 2>::new();
    /// assert_eq!(rb.try_write(Block::from([1, 2])), Ok(()));
    /// let rejected = rb.try_write(Block::from([3, 4])).unwrap_err();
    /// assert_eq!(rejected, WriteError::Full(Block::from([3, 4])));
    /// ```
    pub fn try_write(
        &self,
        block: Block<T, BLOCK_SIZE>,
    ) -> Result<(), WriteError<Block<T, BLOCK_SIZE>>> {
        if !self.empty_slots.try_acquire() {
            return Err(WriteError::Full(block));
        }
        self.commit(block);
        Ok(())
    }

    /// Moves a block into the ring buffer, waiting at most `timeout` for a free slot.
    ///
    /// If the timeout expires, the block is returned back as an error
    /// and the ring buffer is left unchanged.
    pub fn write_for(
        &self,
        block: Block<T, BLOCK_SIZE>,
        timeout: Duration,
    ) -> Result<(), WriteError<Block<T, BLOCK_SIZE>>> {
        if !self.empty_slots.try_acquire_for(timeout) {
            log::trace!("no empty slot within {:?}", timeout);
            return Err(WriteError::Timeout(block));
        }
        self.commit(block);
        Ok(())
    }

    /// Writes (at most `BLOCK_SIZE`) items from a collection as one block.
    ///
    /// Surplus items are dropped silently (and not taken from the iterator).
    /// Returns the number of written items.
    ///
    /// Like [`write()`](RingBuffer::write), this waits for a free slot if necessary.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockring::RingBuffer;
    ///
    /// let rb = RingBuffer::<f64, 2, 3>::new();
    /// assert_eq!(rb.write_from([1.0, 2.0]), 2);
    /// // Conversions via Into are applied to each element:
    /// assert_eq!(rb.write_from(vec![1.5f32, 2.5, 3.5, 4.5]), 3);
    /// assert_eq!(*rb.read().unwrap(), [1.0, 2.0]);
    /// assert_eq!(*rb.read().unwrap(), [1.5, 2.5, 3.5]);
    /// ```
    pub fn write_from<I>(&self, items: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        let mut block = Block::new();
        let written = block.fill_from(items);
        self.write(block);
        written
    }

    /// Moves the oldest block out of the ring buffer.
    ///
    /// If the ring buffer is empty, this suspends the calling thread
    /// until a block has been written.
    ///
    /// [`ReadError::Empty`] is only returned if another reader took the block
    /// that this call has been waiting for; the call can be repeated in this case.
    pub fn read(&self) -> Result<Block<T, BLOCK_SIZE>, ReadError> {
        self.filled_slots.acquire();
        self.take()
    }

    /// Moves the oldest block out of the ring buffer, waiting at most `timeout`.
    ///
    /// If the timeout expires, [`ReadError::Timeout`] is returned
    /// and the ring buffer is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use blockring::{ReadError, RingBuffer};
    ///
    /// let rb = RingBuffer::<u8, 2, 2>::new();
    /// assert_eq!(rb.read_for(Duration::from_millis(1)), Err(ReadError::Timeout));
    /// rb.write_from([7u8]);
    /// assert_eq!(*rb.read_for(Duration::from_millis(1)).unwrap(), [7]);
    /// ```
    pub fn read_for(&self, timeout: Duration) -> Result<Block<T, BLOCK_SIZE>, ReadError> {
        if !self.filled_slots.try_acquire_for(timeout) {
            log::trace!("no filled slot within {:?}", timeout);
            return Err(ReadError::Timeout);
        }
        self.take()
    }

    /// Attempts to move the oldest block out of the ring buffer without waiting.
    ///
    /// If the ring buffer is empty, [`ReadError::Empty`] is returned.
    pub fn try_read(&self) -> Result<Block<T, BLOCK_SIZE>, ReadError> {
        if !self.filled_slots.try_acquire() {
            return Err(ReadError::Empty);
        }
        self.take()
    }

    /// Reads the oldest block and appends its elements to `collection`.
    ///
    /// Returns the number of appended elements.
    /// The appended iterator reports its exact length,
    /// which allows collections like [`Vec`] to reserve the necessary space up front.
    ///
    /// Like [`read()`](RingBuffer::read), this waits for a filled slot if necessary.
    pub fn read_into<C: Extend<T>>(&self, collection: &mut C) -> Result<usize, ReadError> {
        self.read().map(|block| append(collection, block))
    }

    /// Reads the oldest block and appends its elements to `collection`,
    /// waiting at most `timeout`.
    ///
    /// If the timeout expires, [`ReadError::Timeout`] is returned
    /// and neither the ring buffer nor `collection` are changed.
    pub fn read_into_for<C: Extend<T>>(
        &self,
        collection: &mut C,
        timeout: Duration,
    ) -> Result<usize, ReadError> {
        self.read_for(timeout).map(|block| append(collection, block))
    }

    /// Returns `true` if there are no unread blocks.
    ///
    /// This is only a snapshot: other threads might write or read at any time,
    /// even before this function returns.
    /// Use the (timed) read functions to actually wait for data.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().len == 0
    }

    /// Returns the number of unread blocks.
    ///
    /// Like [`is_empty()`](RingBuffer::is_empty), this is only a snapshot.
    pub fn len(&self) -> usize {
        self.slots.lock().len
    }

    /// Stores a block into the next slot, an empty-slot permit must have been acquired.
    fn commit(&self, block: Block<T, BLOCK_SIZE>) {
        self.slots.lock().push(block);
        self.filled_slots.release();
    }

    /// Takes a block from the next slot, a filled-slot permit must have been acquired.
    fn take(&self) -> Result<Block<T, BLOCK_SIZE>, ReadError> {
        let block = self.slots.lock().pop();
        match block {
            Some(block) => {
                self.empty_slots.release();
                Ok(block)
            }
            None => {
                log::warn!("filled-slot permit without a filled slot, returning the permit");
                self.filled_slots.release();
                Err(ReadError::Empty)
            }
        }
    }
}

impl<T, const BLOCKS: usize, const BLOCK_SIZE: usize> RingBuffer<T, BLOCKS, BLOCK_SIZE> {
    /// Returns the number of slots, `BLOCKS`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockring::RingBuffer;
    ///
    /// let rb = RingBuffer::<f32, 100, 64>::new();
    /// assert_eq!(rb.capacity(), 100);
    /// assert_eq!(rb.block_size(), 64);
    /// ```
    pub const fn capacity(&self) -> usize {
        BLOCKS
    }

    /// Returns the maximum number of elements per block, `BLOCK_SIZE`.
    pub const fn block_size(&self) -> usize {
        BLOCK_SIZE
    }
}

impl<const BLOCKS: usize, const BLOCK_SIZE: usize> RingBuffer<u8, BLOCKS, BLOCK_SIZE> {
    /// Reads the oldest block and copies its bytes into `buf`.
    ///
    /// Returns the number of copied bytes, which is the smaller one of `buf.len()`
    /// and the length of the block.
    /// If `buf` is too short, the remaining bytes of the block are discarded.
    ///
    /// Like [`read()`](RingBuffer::read), this waits for a filled slot if necessary.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockring::RingBuffer;
    ///
    /// let rb = RingBuffer::<u8, 2, 8>::new();
    /// rb.write_from(*b"abcdef");
    /// let mut buf = [0; 4];
    /// assert_eq!(rb.read_bytes(&mut buf), Ok(4));
    /// assert_eq!(&buf, b"abcd");
    /// assert!(rb.is_empty());
    /// ```
    pub fn read_bytes(&self, buf: &mut [u8]) -> Result<usize, ReadError> {
        self.read().map(|block| copy_bytes(buf, &block))
    }

    /// Reads the oldest block and copies its bytes into `buf`, waiting at most `timeout`.
    ///
    /// If the timeout expires, [`ReadError::Timeout`] is returned
    /// and neither the ring buffer nor `buf` are changed.
    pub fn read_bytes_for(&self, buf: &mut [u8], timeout: Duration) -> Result<usize, ReadError> {
        self.read_for(timeout).map(|block| copy_bytes(buf, &block))
    }
}

impl<T: Default, const BLOCKS: usize, const BLOCK_SIZE: usize> Default
    for RingBuffer<T, BLOCKS, BLOCK_SIZE>
{
    fn default() -> Self {
        RingBuffer::new()
    }
}

/// Writing a byte stream, one block per call.
///
/// NB: [`RingBuffer::write()`] takes precedence over [`std::io::Write::write()`]
/// in method call syntax, the latter has to be called as `Write::write(&mut &rb, buf)`.
/// There is no such conflict for [`write_all()`](std::io::Write::write_all) and the other methods.
impl<const BLOCKS: usize, const BLOCK_SIZE: usize> std::io::Write
    for &RingBuffer<u8, BLOCKS, BLOCK_SIZE>
{
    /// Writes (at most `BLOCK_SIZE` bytes of) `buf` as one block.
    ///
    /// This waits for a free slot if the ring buffer is full.
    /// An empty `buf` doesn't occupy a slot.
    #[inline]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        Ok(self.write_from(buf.iter().copied()))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        // Nothing to do here.
        Ok(())
    }
}

/// The slots and the read/write positions, protected by the lock of a [`RingBuffer`].
#[derive(Debug)]
struct Slots<T, const N: usize> {
    blocks: Box<[Block<T, N>]>,

    /// The next slot to be filled.
    write_index: usize,

    /// The next slot to be read.
    read_index: usize,

    /// The number of filled slots.
    ///
    /// NB: `write_index == read_index` holds both for an empty and for a full ring buffer.
    len: usize,
}

impl<T, const N: usize> Slots<T, N> {
    fn push(&mut self, block: Block<T, N>) {
        debug_assert!(self.len < self.blocks.len());
        self.blocks[self.write_index] = block;
        self.write_index = self.increment(self.write_index);
        self.len += 1;
    }

    fn pop(&mut self) -> Option<Block<T, N>>
    where
        T: Default,
    {
        if self.len == 0 {
            return None;
        }
        let block = std::mem::take(&mut self.blocks[self.read_index]);
        self.read_index = self.increment(self.read_index);
        self.len -= 1;
        Some(block)
    }

    /// Increments a slot index by one, wrapping around at the end.
    fn increment(&self, index: usize) -> usize {
        if index + 1 < self.blocks.len() {
            index + 1
        } else {
            0
        }
    }
}

fn append<T, C: Extend<T>, const N: usize>(collection: &mut C, block: Block<T, N>) -> usize {
    let len = block.len();
    collection.extend(block);
    len
}

fn copy_bytes<const N: usize>(buf: &mut [u8], block: &Block<u8, N>) -> usize {
    let len = buf.len().min(block.len());
    buf[..len].copy_from_slice(&block[..len]);
    len
}
