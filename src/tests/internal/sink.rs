//! 并发写入管道测试
//!
//! 测试项：
//! - 乱序到达的写入包最终内容与按偏移顺序拼接一致
//! - 多个生产者任务同时写入同一个文件
//! - 预分配长度与已应用写入的长度
//! - 关闭幂等、关闭后拒绝写入
//! - 周期性回收按首个写入包大小计算的间隔触发

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::io::AsyncReadExt;

use crate::config::SinkOptions;
use crate::sink::{ConcurrentWriteSink, SinkError};
use crate::tests::{sample_bytes, shuffled_pieces, ScriptedBacking};

#[tokio::test]
async fn shuffled_writes_match_offset_order() {
    let data = sample_bytes(10_000);
    let sink = ConcurrentWriteSink::in_memory(SinkOptions::default());

    for (start, end) in shuffled_pieces(0, data.len() as u64, 100) {
        sink.write(start, &data[start as usize..end as usize]).unwrap();
    }

    let content = sink.read_all().await.unwrap();
    assert_eq!(&content[..], &data[..]);
    assert_eq!(sink.len(), data.len() as u64);
    sink.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_producers_assemble_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artifact.bin");
    let data = Arc::new(sample_bytes(64 * 1024));
    let total = data.len() as u64;

    let sink = ConcurrentWriteSink::create(&path, Some(total), SinkOptions::default())
        .await
        .unwrap();

    let producers = 8u64;
    let width = total / producers;
    let mut handles = Vec::new();
    for p in 0..producers {
        let sink = sink.clone();
        let data = Arc::clone(&data);
        handles.push(tokio::spawn(async move {
            for (start, end) in shuffled_pieces(p * width, (p + 1) * width, 64) {
                sink.write(start, &data[start as usize..end as usize]).unwrap();
                tokio::task::yield_now().await;
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    sink.flush().await.unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), *data);
    sink.close().await.unwrap();
}

#[tokio::test]
async fn preallocated_length_is_reported_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prealloc.bin");

    let sink = ConcurrentWriteSink::create(&path, Some(4096), SinkOptions::default())
        .await
        .unwrap();
    assert_eq!(sink.len(), 4096);

    sink.write(10, b"abc").unwrap();
    sink.flush().await.unwrap();
    assert_eq!(sink.len(), 4096);
    sink.close().await.unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 4096);
}

#[tokio::test]
async fn length_tracks_highest_applied_end() {
    let sink = ConcurrentWriteSink::in_memory(SinkOptions::default());
    assert_eq!(sink.len(), 0);
    assert!(sink.is_empty());

    sink.write(10, b"hello").unwrap();
    sink.write(0, b"abc").unwrap();
    sink.flush().await.unwrap();

    assert_eq!(sink.len(), 15);
    let content = sink.read_all().await.unwrap();
    assert_eq!(&content[..3], b"abc");
    assert_eq!(&content[3..10], &[0u8; 7]);
    assert_eq!(&content[10..], b"hello");
}

#[tokio::test]
async fn open_read_waits_for_earlier_writes() {
    let data = sample_bytes(2_000);
    let sink = ConcurrentWriteSink::with_backing(
        ScriptedBacking::slow(Duration::from_millis(2)),
        SinkOptions::default(),
    )
    .await
    .unwrap();

    for (start, end) in shuffled_pieces(0, data.len() as u64, 100) {
        sink.write(start, &data[start as usize..end as usize]).unwrap();
    }
    assert!(!sink.is_idle());

    let mut reader = sink.open_read().await.unwrap();
    assert!(sink.is_idle());
    let mut content = Vec::new();
    reader.read_to_end(&mut content).await.unwrap();
    assert_eq!(content, data);
}

#[tokio::test]
async fn file_reader_starts_at_beginning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("read.bin");
    let sink = ConcurrentWriteSink::create(&path, None, SinkOptions::default())
        .await
        .unwrap();

    sink.write(4, b"5678").unwrap();
    sink.write(0, b"1234").unwrap();

    let mut reader = sink.open_read().await.unwrap();
    let mut content = String::new();
    reader.read_to_string(&mut content).await.unwrap();
    assert_eq!(content, "12345678");
    sink.close().await.unwrap();
}

#[tokio::test]
async fn caller_buffer_may_be_reused_after_write() {
    let sink = ConcurrentWriteSink::with_backing(
        ScriptedBacking::slow(Duration::from_millis(5)),
        SinkOptions::default(),
    )
    .await
    .unwrap();

    let mut buf = [1u8; 16];
    sink.write(0, &buf).unwrap();
    buf.fill(2);
    sink.write(16, &buf).unwrap();
    buf.fill(3);

    let content = sink.read_all().await.unwrap();
    assert!(content[..16].iter().all(|b| *b == 1));
    assert!(content[16..].iter().all(|b| *b == 2));
}

#[tokio::test]
async fn write_bytes_and_empty_writes() {
    let sink = ConcurrentWriteSink::in_memory(SinkOptions::default());
    sink.write_bytes(3, Bytes::from_static(b"def")).unwrap();
    sink.write_bytes(0, Bytes::from_static(b"abc")).unwrap();
    sink.write(100, &[]).unwrap();

    assert_eq!(&sink.read_all().await.unwrap()[..], b"abcdef");
    assert_eq!(sink.stats().drained_packets, 2);
}

#[tokio::test]
async fn stream_backing_wraps_existing_destination() {
    let sink = ConcurrentWriteSink::from_stream(Cursor::new(vec![0u8; 8]), SinkOptions::default())
        .await
        .unwrap();
    assert_eq!(sink.len(), 8);

    sink.write(2, b"ab").unwrap();
    sink.write(10, b"z").unwrap();

    let content = sink.read_all().await.unwrap();
    assert_eq!(&content[..], &[0, 0, b'a', b'b', 0, 0, 0, 0, 0, 0, b'z']);
    assert_eq!(sink.len(), 11);
    sink.close().await.unwrap();
}

#[tokio::test]
async fn from_vec_overwrites_in_place() {
    let sink = ConcurrentWriteSink::from_vec(b"xxxxxx".to_vec(), SinkOptions::default());
    assert_eq!(sink.len(), 6);
    sink.write(2, b"ok").unwrap();
    assert_eq!(&sink.read_all().await.unwrap()[..], b"xxokxx");
}

#[tokio::test]
async fn discard_sink_only_tracks_length() {
    let sink = ConcurrentWriteSink::discard(SinkOptions::default());
    sink.write(0, b"abc").unwrap();
    sink.write(97, b"xyz").unwrap();

    assert!(sink.read_all().await.unwrap().is_empty());
    assert_eq!(sink.len(), 100);
    assert_eq!(sink.kind(), "null");
}

#[tokio::test]
async fn close_is_idempotent_and_rejects_writes() {
    let sink = ConcurrentWriteSink::in_memory(SinkOptions::default());
    sink.write(0, b"abc").unwrap();

    sink.close().await.unwrap();
    assert!(sink.is_closed());
    sink.close().await.unwrap();

    assert!(matches!(sink.write(3, b"def"), Err(SinkError::Closed)));
    assert!(matches!(sink.flush().await, Err(SinkError::Closed)));
    assert!(matches!(sink.open_read().await, Err(SinkError::Closed)));
    assert_eq!(sink.len(), 3);
}

#[tokio::test]
async fn overlapping_close_waits_for_queued_writes() {
    let sink = ConcurrentWriteSink::with_backing(
        ScriptedBacking::slow(Duration::from_millis(20)),
        SinkOptions::default(),
    )
    .await
    .unwrap();
    for i in 0..4u64 {
        sink.write(i * 4, &[i as u8; 4]).unwrap();
    }

    let first = {
        let sink = sink.clone();
        tokio::spawn(async move { sink.close().await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;

    sink.close().await.unwrap();
    assert_eq!(sink.pending(), 0);
    assert_eq!(sink.len(), 16);
    first.await.unwrap().unwrap();
}

#[tokio::test]
async fn cloned_handles_share_one_sink() {
    let sink = ConcurrentWriteSink::in_memory(SinkOptions::default());
    let other = sink.clone();

    other.write(0, b"ab").unwrap();
    sink.write(2, b"cd").unwrap();
    other.close().await.unwrap();

    assert!(sink.is_closed());
    assert!(matches!(sink.write(4, b"e"), Err(SinkError::Closed)));
    assert_eq!(sink.len(), 4);
}

#[tokio::test]
async fn reclaim_fires_once_every_threshold_packets() {
    // 16 字节预算 / 4 字节首包 = 每 4 个写入包回收一次
    let options = SinkOptions::default().release_threshold_bytes(16);
    let sink = ConcurrentWriteSink::in_memory(options);
    assert_eq!(sink.stats().release_threshold, None);

    for i in 0..10u64 {
        sink.write(i * 4, &[i as u8; 4]).unwrap();
    }
    sink.open_read().await.unwrap();

    let stats = sink.stats();
    assert_eq!(stats.drained_packets, 10);
    assert_eq!(stats.release_threshold, Some(4));
    assert_eq!(stats.reclaim_passes, 2);

    // flush 总会额外回收一次
    sink.flush().await.unwrap();
    assert_eq!(sink.stats().reclaim_passes, 3);
    assert_eq!(sink.pooled_buffers(), 0);
}

#[tokio::test]
async fn reclaim_threshold_is_fixed_by_first_packet() {
    // 64 字节预算 / 8 字节首包 = 8，之后的小包不改变间隔
    let options = SinkOptions::default().release_threshold_bytes(64);
    let sink = ConcurrentWriteSink::in_memory(options);

    sink.write(0, &[0u8; 8]).unwrap();
    sink.open_read().await.unwrap();
    assert_eq!(sink.stats().release_threshold, Some(8));

    for i in 0..15u64 {
        sink.write(8 + i * 2, &[1u8; 2]).unwrap();
    }
    sink.open_read().await.unwrap();

    let stats = sink.stats();
    assert_eq!(stats.drained_packets, 16);
    assert_eq!(stats.release_threshold, Some(8));
    assert_eq!(stats.reclaim_passes, 2);
}

#[tokio::test]
async fn oversized_first_packet_reclaims_every_packet() {
    let options = SinkOptions::default().release_threshold_bytes(4);
    let sink = ConcurrentWriteSink::in_memory(options);

    for i in 0..3u64 {
        sink.write(i * 10, &[7u8; 10]).unwrap();
    }
    sink.open_read().await.unwrap();

    let stats = sink.stats();
    assert_eq!(stats.release_threshold, Some(1));
    assert_eq!(stats.reclaim_passes, 3);
}

#[tokio::test]
async fn throttled_writes_respect_pending_limit() {
    let options = SinkOptions::default().max_pending_packets(2);
    let sink = ConcurrentWriteSink::with_backing(
        ScriptedBacking::slow(Duration::from_millis(10)),
        options,
    )
    .await
    .unwrap();

    let data = sample_bytes(80);
    for i in 0..8usize {
        sink.write_throttled((i * 10) as u64, &data[i * 10..(i + 1) * 10])
            .await
            .unwrap();
        assert!(sink.pending() <= 2, "pending = {}", sink.pending());
    }

    assert_eq!(&sink.read_all().await.unwrap()[..], &data[..]);
    sink.close().await.unwrap();
    assert!(matches!(
        sink.write_throttled(0, b"late").await,
        Err(SinkError::Closed)
    ));
}
