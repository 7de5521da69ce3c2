//! 空闲信号并发测试
//!
//! 测试项：
//! - 所有写入包处理完毕前 wait_idle 不返回
//! - 多个等待者同时被唤醒
//! - 记录失败后等待者立即返回错误，且只保留第一次失败

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::internal::states::idle_signal::IdleSignal;
use crate::sink::{DrainFailure, SinkError};

#[tokio::test]
async fn wait_idle_returns_immediately_when_nothing_pending() {
    let signal = IdleSignal::new();
    assert!(signal.is_idle());
    timeout(Duration::from_secs(1), signal.wait_idle())
        .await
        .expect("空闲时不应挂起")
        .unwrap();
}

#[tokio::test]
async fn wait_idle_blocks_until_every_packet_settles() {
    let signal = Arc::new(IdleSignal::new());
    signal.busy();
    signal.busy();
    assert_eq!(signal.pending(), 2);

    let s = Arc::clone(&signal);
    let waiter = tokio::spawn(async move { s.wait_idle().await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    signal.settle();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished(), "还有一个写入包未处理");

    signal.settle();
    timeout(Duration::from_secs(1), waiter)
        .await
        .expect("等待者应被唤醒")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn all_waiters_are_released() {
    let signal = Arc::new(IdleSignal::new());
    signal.busy();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let s = Arc::clone(&signal);
        handles.push(tokio::spawn(async move { s.wait_idle().await }));
    }

    tokio::time::sleep(Duration::from_millis(20)).await;
    signal.settle();

    for h in handles {
        timeout(Duration::from_secs(1), h)
            .await
            .expect("等待者应被唤醒")
            .unwrap()
            .unwrap();
    }
}

#[tokio::test]
async fn failure_releases_waiters_and_first_one_wins() {
    let signal = Arc::new(IdleSignal::new());
    signal.busy();

    let s = Arc::clone(&signal);
    let waiter = tokio::spawn(async move { s.wait_idle().await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    signal.record_failure(DrainFailure::new(Some(8), io::Error::other("第一次")));
    signal.record_failure(DrainFailure::new(Some(16), io::Error::other("第二次")));

    let result = timeout(Duration::from_secs(1), waiter)
        .await
        .expect("失败后等待者应被唤醒")
        .unwrap();
    match result {
        Err(SinkError::Drain(f)) => assert_eq!(f.offset, Some(8)),
        other => panic!("预期 Drain 错误，得到 {:?}", other),
    }
    assert!(signal.has_failed());
}

#[tokio::test]
async fn lost_worker_releases_waiters() {
    let signal = IdleSignal::new();
    signal.busy();
    signal.mark_lost();

    let result = timeout(Duration::from_secs(1), signal.wait_idle())
        .await
        .expect("不应挂起");
    assert!(matches!(result, Err(SinkError::WorkerLost)));
}
