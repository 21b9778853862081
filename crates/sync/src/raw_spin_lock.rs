//! 自旋锁实现
//!
//! 基于原子操作实现自旋锁机制，并实现 [`lock_api::RawMutex`]，
//! 由 `lock_api` 负责 RAII 保护器和数据封装。

use core::{
    hint,
    sync::atomic::{AtomicBool, Ordering},
};

/// 原始自旋锁，提供互斥访问临界区的能力。
///
/// 不可重入 (即不能嵌套调用 `lock()`)。
#[derive(Debug)]
pub struct RawSpinLock {
    lock: AtomicBool,
}

impl RawSpinLock {
    /// 创建一个新的 RawSpinLock 实例。
    pub const fn new() -> Self {
        RawSpinLock {
            lock: AtomicBool::new(false),
        }
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: 只有成功完成 compare_exchange 的一方才能进入临界区，
// Acquire/Release 配对保证了临界区内写入的可见性。
unsafe impl lock_api::RawMutex for RawSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawSpinLock::new();

    type GuardMarker = lock_api::GuardSend;

    fn lock(&self) {
        while self
            .lock
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // 只读等待，避免在竞争时反复写缓存行
            while self.lock.load(Ordering::Relaxed) {
                hint::spin_loop();
            }
        }
    }

    fn try_lock(&self) -> bool {
        self.lock
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock(&self) {
        self.lock.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.lock.load(Ordering::Relaxed)
    }
}
