//! 取消令牌
//!
//! 每个执行上下文（线程/任务）持有一个 [`CancelToken`]，相当于内核中的“待处理信号”。
//! 阻塞在 [`crate::Semaphore::down_interruptible`] 上的上下文在令牌被取消时会被唤醒，
//! 并以 [`crate::Interrupted`] 返回。

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::semaphore::SemaphoreInner;

/// 取消令牌
///
/// 克隆得到的令牌共享同一取消状态。
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    next_waiter: AtomicU64,
    /// 当前阻塞在某个信号量上的等待登记
    waiters: parking_lot::Mutex<Vec<(u64, Weak<SemaphoreInner>)>>,
}

impl CancelToken {
    /// 创建一个未取消的令牌
    pub fn new() -> Self {
        Self::default()
    }

    /// 发出取消请求，并唤醒所有通过此令牌阻塞的等待者
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);

        // 先取快照再唤醒，唤醒路径需要获取信号量内部锁
        let blocked: Vec<Arc<SemaphoreInner>> = self
            .inner
            .waiters
            .lock()
            .iter()
            .filter_map(|(_, sem)| sem.upgrade())
            .collect();
        for sem in blocked {
            sem.interrupt();
        }
    }

    /// 是否已被取消
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// 清除取消状态（信号已处理），之后的等待可以重新进行
    pub fn reset(&self) {
        self.inner.cancelled.store(false, Ordering::SeqCst);
    }

    pub(crate) fn register(&self, sem: &Arc<SemaphoreInner>) -> u64 {
        let id = self.inner.next_waiter.fetch_add(1, Ordering::Relaxed);
        self.inner.waiters.lock().push((id, Arc::downgrade(sem)));
        id
    }

    pub(crate) fn unregister(&self, id: u64) {
        self.inner.waiters.lock().retain(|(waiter, _)| *waiter != id);
    }
}
