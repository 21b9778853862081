//! 自旋锁封装
//!
//! 提供对数据的互斥访问的自旋锁结构体。
//!
//! # 示例
//! ```
//! use sync::SpinLock;
//!
//! let lock = SpinLock::new(0);
//! {
//!     let mut guard = lock.lock(); // 获取锁
//!     *guard += 1; // 访问和修改数据
//! } // 离开作用域，自动释放锁
//! assert_eq!(*lock.lock(), 1);
//! ```
//!
//! # 注意
//! SpinLock 不是可重入的。当持有锁时，尝试再次获取锁将导致死锁。
//! 持有锁时不要执行可能睡眠的操作（例如获取 [`crate::Semaphore`]）。

use crate::raw_spin_lock::RawSpinLock;

/// 提供对数据的互斥访问的自旋锁。
pub type SpinLock<T> = lock_api::Mutex<RawSpinLock, T>;

/// SpinLock 的 RAII 保护器，离开作用域时自动释放锁。
pub type SpinLockGuard<'a, T> = lock_api::MutexGuard<'a, RawSpinLock, T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn try_lock_fails_while_held() {
        let lock = SpinLock::new(5);
        let guard = lock.lock();
        assert!(lock.is_locked());
        assert!(lock.try_lock().is_none());
        drop(guard);
        assert!(!lock.is_locked());
        assert_eq!(*lock.try_lock().unwrap(), 5);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let lock = Arc::new(SpinLock::new(0usize));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lock = lock.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        *lock.lock() += 1;
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*lock.lock(), 4000);
    }
}
