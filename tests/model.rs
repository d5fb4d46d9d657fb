//! 基于模型的性质测试: 任意操作序列下与 `VecDeque` 行为一致

use std::collections::VecDeque;

use proptest::prelude::*;
use rtos_ringbuf::{RingBuffer, RingError, StrategyId};

#[derive(Debug, Clone)]
enum Op {
    Write(u8),
    Read,
    WriteMulti(Vec<u8>),
    ReadMulti(usize),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u8>().prop_map(Op::Write),
        3 => Just(Op::Read),
        3 => prop::collection::vec(any::<u8>(), 0..24).prop_map(Op::WriteMulti),
        3 => (0usize..24).prop_map(Op::ReadMulti),
        1 => Just(Op::Clear),
    ]
}

fn check_against_model(id: StrategyId, size: usize, ops: &[Op]) {
    let mut storage = vec![0u8; size];
    let rb = RingBuffer::create(&mut storage, id).unwrap();
    let capacity = size - 1;
    let mut model: VecDeque<u8> = VecDeque::new();

    for op in ops {
        match op {
            Op::Write(byte) => {
                let expected = if model.len() < capacity {
                    model.push_back(*byte);
                    Ok(())
                } else {
                    Err(RingError::Full)
                };
                assert_eq!(rb.write(*byte), expected);
            }
            Op::Read => {
                let expected = model.pop_front().ok_or(RingError::Empty);
                assert_eq!(rb.read(), expected);
            }
            Op::WriteMulti(data) => {
                let n = data.len().min(capacity - model.len());
                model.extend(&data[..n]);
                assert_eq!(rb.write_multi(data), n);
            }
            Op::ReadMulti(len) => {
                let mut out = vec![0u8; *len];
                let count = (*len).min(model.len());
                let expected: Vec<u8> = model.drain(..count).collect();
                assert_eq!(rb.read_multi(&mut out), count);
                assert_eq!(&out[..count], expected.as_slice());
            }
            Op::Clear => {
                model.clear();
                rb.clear();
            }
        }

        assert_eq!(rb.available(), model.len());
        assert_eq!(rb.available() + rb.free_space(), capacity);
        assert_eq!(rb.is_empty(), model.is_empty());
        assert_eq!(rb.is_full(), model.len() == capacity);
    }
}

proptest! {
    #[test]
    fn lock_free_matches_model(size in 2usize..40, ops in prop::collection::vec(op(), 0..64)) {
        check_against_model(StrategyId::LOCK_FREE, size, &ops);
    }

    #[test]
    fn critical_section_matches_model(size in 2usize..40, ops in prop::collection::vec(op(), 0..64)) {
        check_against_model(StrategyId::CRITICAL_SECTION, size, &ops);
    }

    #[test]
    fn mutex_matches_model(size in 2usize..40, ops in prop::collection::vec(op(), 0..64)) {
        check_against_model(StrategyId::MUTEX, size, &ops);
    }
}
