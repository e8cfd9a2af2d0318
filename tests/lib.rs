use std::time::Duration;

use blockring::{Block, ReadError, RingBuffer, WriteError};

#[test]
fn smoke() {
    let rb = RingBuffer::<i32, 1, 1>::new();

    rb.write(Block::from([7]));
    assert_eq!(*rb.read().unwrap(), [7]);

    rb.write(Block::from([8]));
    assert_eq!(*rb.read().unwrap(), [8]);
    assert!(rb.try_read().is_err());
}

#[test]
fn capacity() {
    let rb = RingBuffer::<i32, 5, 10>::new();
    assert_eq!(rb.capacity(), 5);
    assert_eq!(rb.block_size(), 10);
    assert_eq!(rb.len(), 0);
    assert!(rb.is_empty());
}

#[test]
fn fifo() {
    const COUNT: u64 = 40;
    let rb = RingBuffer::<u64, 8, 4>::new();
    for round in 0..COUNT / 8 {
        for i in 0..8 {
            let n = round * 8 + i;
            rb.write_from([n, n + 1, n + 2]);
        }
        for i in 0..8 {
            let n = round * 8 + i;
            assert_eq!(*rb.read().unwrap(), [n, n + 1, n + 2]);
        }
    }
    assert!(rb.is_empty());
}

#[test]
fn two_blocks_of_three() {
    let rb = RingBuffer::<i32, 2, 3>::new();

    assert_eq!(rb.write_from([1, 2, 3]), 3);
    assert_eq!(rb.write_from(vec![4, 5]), 2);
    assert_eq!(
        rb.try_write(Block::from([6, 7, 8])).unwrap_err(),
        WriteError::Full(Block::from([6, 7, 8]))
    );

    let first = rb.read().unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(*first, [1, 2, 3]);

    let second = rb.read().unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(*second, [4, 5]);

    assert!(rb.is_empty());
}

#[test]
fn truncation() {
    let rb = RingBuffer::<u16, 2, 4>::new();
    let mut items = 0..10u16;
    assert_eq!(rb.write_from(&mut items), 4);
    // Surplus items are not taken from the iterator:
    assert_eq!(items.next(), Some(4));

    let block = rb.read().unwrap();
    assert!(block.is_full());
    assert_eq!(*block, [0, 1, 2, 3]);
}

#[test]
fn empty_block() {
    let rb = RingBuffer::<u8, 2, 4>::new();
    assert_eq!(rb.write_from(Vec::<u8>::new()), 0);
    assert_eq!(rb.len(), 1);
    assert!(rb.read().unwrap().is_empty());
    assert!(rb.is_empty());
}

#[test]
fn full_is_not_empty() {
    let rb = RingBuffer::<u8, 3, 1>::new();
    for i in 0..3u8 {
        rb.write_from([i]);
    }
    // The write position has wrapped around to the read position:
    assert!(!rb.is_empty());
    assert_eq!(rb.len(), 3);
    for i in 0..3u8 {
        assert_eq!(*rb.try_read().unwrap(), [i]);
    }
    assert!(rb.is_empty());
}

#[test]
fn wrap_around() {
    let rb = RingBuffer::<usize, 3, 2>::new();
    for i in 0..100usize {
        rb.write_from([i, i * 2]);
        if i % 2 == 1 {
            assert_eq!(*rb.read().unwrap(), [i - 1, (i - 1) * 2]);
            assert_eq!(*rb.read().unwrap(), [i, i * 2]);
        }
        assert!(rb.len() <= 1);
    }
}

#[test]
fn read_for_timeout_leaves_state_untouched() {
    let rb = RingBuffer::<u8, 2, 3>::new();
    assert_eq!(rb.read_for(Duration::from_millis(10)), Err(ReadError::Timeout));
    assert!(rb.is_empty());

    rb.write_from([1u8, 2]);
    assert_eq!(*rb.read_for(Duration::from_millis(10)).unwrap(), [1, 2]);
    assert!(rb.is_empty());

    // Both slots are still available for writing:
    assert!(rb.try_write(Block::from_slice(&[3])).is_ok());
    assert!(rb.try_write(Block::from_slice(&[4])).is_ok());
    assert!(rb.try_write(Block::from_slice(&[5])).is_err());
}

#[test]
fn write_for_timeout_returns_block() {
    let rb = RingBuffer::<i32, 1, 2>::new();
    assert_eq!(rb.write_for(Block::from([1, 2]), Duration::from_millis(10)), Ok(()));

    let err = rb
        .write_for(Block::from_slice(&[3]), Duration::from_millis(10))
        .unwrap_err();
    assert!(matches!(err, WriteError::Timeout(_)));
    assert_eq!(*err.into_inner(), [3]);
    assert_eq!(rb.len(), 1);

    assert_eq!(*rb.read().unwrap(), [1, 2]);
    assert!(rb.is_empty());
}

#[test]
fn try_read_empty() {
    let rb = RingBuffer::<f32, 4, 4>::new();
    assert_eq!(rb.try_read(), Err(ReadError::Empty));
    let mut v = Vec::new();
    assert_eq!(rb.read_into_for(&mut v, Duration::from_millis(1)), Err(ReadError::Timeout));
    assert!(v.is_empty());
}

#[test]
fn read_into_appends() {
    let rb = RingBuffer::<char, 2, 8>::new();
    rb.write_from("hello".chars());
    rb.write_from(" world".chars());

    let mut s = String::from(">");
    assert_eq!(rb.read_into(&mut s), Ok(5));
    assert_eq!(rb.read_into(&mut s), Ok(6));
    assert_eq!(s, ">hello world");
}

#[test]
fn moves_non_copy_values() {
    let rb = RingBuffer::<String, 2, 2>::new();
    rb.write_from(["a", "b"]);
    rb.write_from(vec![String::from("c")]);

    let mut v = Vec::new();
    rb.read_into(&mut v).unwrap();
    rb.read_into(&mut v).unwrap();
    assert_eq!(v, ["a", "b", "c"]);
}

#[test]
fn trait_impls() {
    let rb = RingBuffer::<u8, 1, 1>::default();

    assert!(format!("{:?}", rb).starts_with("RingBuffer {"));

    assert_eq!(format!("{:?}", rb.try_read().unwrap_err()), "Empty");
    assert_eq!(rb.try_read().unwrap_err().to_string(), "empty ring buffer");
    let timeout = rb.read_for(Duration::ZERO).unwrap_err();
    assert_eq!(format!("{:?}", timeout), "Timeout");
    assert_eq!(timeout.to_string(), "timed out waiting for a filled slot");

    rb.write_from([0u8]);
    let full = rb.try_write(Block::new()).unwrap_err();
    assert_eq!(format!("{:?}", full), "Full(_)");
    assert_eq!(full.to_string(), "full ring buffer");
    let timeout = rb.write_for(Block::new(), Duration::ZERO).unwrap_err();
    assert_eq!(format!("{:?}", timeout), "Timeout(_)");
    assert_eq!(timeout.to_string(), "timed out waiting for an empty slot");
}

#[test]
fn is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RingBuffer<u8, 4, 4>>();
    assert_send_sync::<RingBuffer<String, 4, 4>>();
}
