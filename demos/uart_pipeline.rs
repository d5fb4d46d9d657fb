//! UART 收发流水线 (主机模拟)
//!
//! - RX ISR → 解析任务: 无锁策略 (单生产者单消费者)
//! - 多个任务 → TX: 互斥锁策略 (多生产者)
//!
//! 运行: `cargo run --example uart_pipeline --features std`

use std::thread;
use std::time::Duration;

use rtos_ringbuf::config::DEFAULT_RINGBUF_SIZE;
use rtos_ringbuf::{RingBuffer, RingError, StrategyId};
use static_cell::StaticCell;

static RX_STORAGE: StaticCell<[u8; DEFAULT_RINGBUF_SIZE]> = StaticCell::new();
static TX_STORAGE: StaticCell<[u8; 128]> = StaticCell::new();
static RX: StaticCell<RingBuffer<'static>> = StaticCell::new();
static TX: StaticCell<RingBuffer<'static>> = StaticCell::new();

const INPUT: &[u8] = b"led on\nled off\nstatus\nreboot\n";

fn main() -> Result<(), RingError> {
    let rx = RX.init(RingBuffer::new());
    rx.init(RX_STORAGE.init([0; DEFAULT_RINGBUF_SIZE]), StrategyId::LOCK_FREE)?;
    let tx = TX.init(RingBuffer::new());
    tx.init(TX_STORAGE.init([0; 128]), StrategyId::MUTEX)?;

    let rx: &'static RingBuffer<'static> = rx;
    let tx: &'static RingBuffer<'static> = tx;

    // RX 中断: 每个字节一次中断
    let isr = thread::spawn(move || {
        for &byte in INPUT {
            critical_section::with(|_cs| {
                if rx.write(byte).is_err() {
                    println!("[isr] rx overflow, dropped 0x{:02x}", byte);
                }
            });
            thread::sleep(Duration::from_micros(200));
        }
    });

    // 解析任务: 按行处理命令
    let parser = thread::spawn(move || {
        let mut line = Vec::new();
        let mut lines = 0;
        while lines < INPUT.iter().filter(|&&b| b == b'\n').count() {
            match rx.read() {
                Ok(b'\n') => {
                    let reply = handle(&line);
                    send(tx, reply.as_bytes());
                    line.clear();
                    lines += 1;
                }
                Ok(byte) => line.push(byte),
                Err(_) => thread::sleep(Duration::from_micros(100)),
            }
        }
    });

    // 心跳任务: 与解析任务共享 TX
    let heartbeat = thread::spawn(move || {
        for _ in 0..3 {
            send(tx, b"tick\n");
            thread::sleep(Duration::from_millis(1));
        }
    });

    isr.join().ok();
    parser.join().ok();
    heartbeat.join().ok();

    // TX 中断: 一次取空
    let mut out = [0u8; 128];
    let n = tx.read_multi(&mut out);
    print!("{}", String::from_utf8_lossy(&out[..n]));

    #[cfg(feature = "statistics")]
    {
        let stats = rx.stats();
        println!(
            "rx: writes={} reads={} overflows={}",
            stats.writes, stats.reads, stats.overflows
        );
    }
    Ok(())
}

fn handle(line: &[u8]) -> String {
    match line {
        b"led on" => "ok: led=1\n".into(),
        b"led off" => "ok: led=0\n".into(),
        b"status" => "ok: up\n".into(),
        other => format!("err: unknown '{}'\n", String::from_utf8_lossy(other)),
    }
}

/// 写满时等待 TX 中断腾出空间
fn send(tx: &RingBuffer<'_>, mut data: &[u8]) {
    while !data.is_empty() {
        let n = tx.write_multi(data);
        data = &data[n..];
        if n == 0 {
            thread::yield_now();
        }
    }
}
