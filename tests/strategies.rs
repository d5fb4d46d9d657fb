//! 三种内置策略的行为一致性测试
//!
//! 同一组用例对每个策略各跑一遍: 可观察语义必须完全一致。

use std::sync::Mutex;

use rtos_ringbuf::config::MAX_LOCKS;
use rtos_ringbuf::{RingBuffer, RingError, StrategyId};

// 内置互斥锁策略共享一个容量为 MAX_LOCKS 的锁池，测试线程数可能超过它
static SERIAL: Mutex<()> = Mutex::new(());

const BUILTINS: [StrategyId; 3] = [
    StrategyId::LOCK_FREE,
    StrategyId::CRITICAL_SECTION,
    StrategyId::MUTEX,
];

fn for_each_strategy(size: usize, mut case: impl FnMut(StrategyId, &RingBuffer<'_>)) {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    for id in BUILTINS {
        let mut storage = vec![0u8; size];
        let rb = RingBuffer::create(&mut storage, id)
            .unwrap_or_else(|e| panic!("create {} failed: {}", id, e));
        case(id, &rb);
    }
}

#[test]
fn test_initial_state() {
    for_each_strategy(256, |id, rb| {
        assert!(rb.is_empty(), "{}", id);
        assert!(!rb.is_full(), "{}", id);
        assert_eq!(rb.available(), 0, "{}", id);
        assert_eq!(rb.free_space(), 255, "{}", id);
        assert_eq!(rb.read(), Err(RingError::Empty), "{}", id);
    });
}

#[test]
fn test_single_byte_roundtrip() {
    for_each_strategy(256, |id, rb| {
        rb.write(0x55).unwrap();
        assert_eq!(rb.available(), 1, "{}", id);
        assert_eq!(rb.read(), Ok(0x55), "{}", id);
        assert!(rb.is_empty(), "{}", id);
    });
}

#[test]
fn test_multi_roundtrip() {
    for_each_strategy(256, |id, rb| {
        let tx: [u8; 10] = core::array::from_fn(|i| i as u8 * 3);
        let mut rx = [0u8; 10];

        assert_eq!(rb.write_multi(&tx), 10, "{}", id);
        assert_eq!(rb.read_multi(&mut rx), 10, "{}", id);
        assert_eq!(tx, rx, "{}", id);
    });
}

#[test]
fn test_full_boundary() {
    for_each_strategy(16, |id, rb| {
        for i in 0..15 {
            assert_eq!(rb.write(i), Ok(()), "{} byte {}", id, i);
        }
        assert!(rb.is_full(), "{}", id);
        assert_eq!(rb.write(0xFF), Err(RingError::Full), "{}", id);
        assert_eq!(rb.write_multi(&[1, 2, 3]), 0, "{}", id);

        assert_eq!(rb.read(), Ok(0), "{}", id);
        assert!(!rb.is_full(), "{}", id);
        assert_eq!(rb.write(0xFF), Ok(()), "{}", id);
    });
}

#[test]
fn test_wrap_around_sequence() {
    for_each_strategy(16, |id, rb| {
        let data: [u8; 20] = core::array::from_fn(|i| i as u8);
        let mut out = [0u8; 20];

        assert_eq!(rb.write_multi(&data[..10]), 10, "{}", id);
        assert_eq!(rb.read_multi(&mut out[..5]), 5, "{}", id);
        assert_eq!(rb.write_multi(&data[10..]), 10, "{}", id);

        assert_eq!(rb.read_multi(&mut out[5..]), 15, "{}", id);
        assert_eq!(out[..5], data[..5], "{}", id);
        assert_eq!(out[5..], data[5..], "{}", id);
        assert!(rb.is_empty(), "{}", id);
    });
}

#[test]
fn test_partial_write() {
    for_each_strategy(16, |id, rb| {
        assert_eq!(rb.write_multi(&[0xBB; 5]), 5, "{}", id);
        let free = rb.free_space();
        assert_eq!(rb.write_multi(&[0xCC; 20]), free, "{}", id);
        assert!(rb.is_full(), "{}", id);
    });
}

#[test]
fn test_read_more_than_available() {
    for_each_strategy(32, |id, rb| {
        rb.write_multi(b"abc");
        let mut out = [0u8; 8];
        assert_eq!(rb.read_multi(&mut out), 3, "{}", id);
        assert_eq!(&out[..3], b"abc", "{}", id);
    });
}

#[test]
fn test_zero_length_transfers() {
    for_each_strategy(8, |id, rb| {
        assert_eq!(rb.write_multi(&[]), 0, "{}", id);
        assert_eq!(rb.read_multi(&mut []), 0, "{}", id);
        assert!(rb.is_empty(), "{}", id);
    });
}

#[test]
fn test_clear() {
    for_each_strategy(32, |id, rb| {
        rb.write_multi(&[0xCC; 16]);
        assert_eq!(rb.available(), 16, "{}", id);

        rb.clear();
        assert!(rb.is_empty(), "{}", id);
        assert_eq!(rb.free_space(), 31, "{}", id);

        // 清空后继续正常工作
        rb.write(7).unwrap();
        assert_eq!(rb.read(), Ok(7), "{}", id);
    });
}

#[test]
fn test_minimum_storage() {
    for_each_strategy(2, |id, rb| {
        assert_eq!(rb.capacity(), 1, "{}", id);
        rb.write(1).unwrap();
        assert!(rb.is_full(), "{}", id);
        assert_eq!(rb.write(2), Err(RingError::Full), "{}", id);
        assert_eq!(rb.read(), Ok(1), "{}", id);
    });
}

#[test]
fn test_invalid_storage_rejected_by_every_strategy() {
    for id in BUILTINS {
        let mut empty: [u8; 0] = [];
        let mut one = [0u8; 1];
        assert_eq!(
            RingBuffer::create(&mut empty, id).err(),
            Some(RingError::InvalidArgument)
        );
        assert_eq!(
            RingBuffer::create(&mut one, id).err(),
            Some(RingError::InvalidArgument)
        );
    }
}

#[test]
fn test_unavailable_strategy() {
    let mut storage = [0u8; 16];
    let mut rb = RingBuffer::new();
    assert_eq!(
        rb.init(&mut storage, StrategyId::new(200)),
        Err(RingError::StrategyUnavailable)
    );
    assert!(!rb.is_initialized());
    assert_eq!(rb.write(1), Err(RingError::Uninitialized));
}

#[test]
fn test_mutex_pool_exhaustion() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());

    let mut storages = vec![[0u8; 4]; MAX_LOCKS + 1];
    let (last, rest) = storages.split_last_mut().unwrap();

    let held: Vec<_> = rest
        .iter_mut()
        .map(|s| RingBuffer::create(s, StrategyId::MUTEX).unwrap())
        .collect();

    let mut rb = RingBuffer::new();
    assert_eq!(
        rb.init(last, StrategyId::MUTEX),
        Err(RingError::ResourceCreationFailed)
    );
    assert!(!rb.is_initialized());

    drop(held);
}
