//! 睡眠信号量
//!
//! 计数信号量，获取失败时等待者睡眠（不自旋）。
//! 语义对齐 Linux `struct semaphore`：
//!
//! - [`Semaphore::down_interruptible`]：可被 [`CancelToken`] 打断的获取
//! - [`Semaphore::down_trylock`]：不阻塞的尝试获取
//! - [`Semaphore::up`]：释放并唤醒一个等待者，唤醒顺序不作保证

use std::sync::Arc;

use crate::{CancelToken, Interrupted};

/// 睡眠信号量
#[derive(Debug)]
pub struct Semaphore {
    inner: Arc<SemaphoreInner>,
}

#[derive(Debug)]
pub(crate) struct SemaphoreInner {
    count: parking_lot::Mutex<usize>,
    wait: parking_lot::Condvar,
}

impl SemaphoreInner {
    /// 唤醒全部等待者，让它们重新检查各自的取消状态
    pub(crate) fn interrupt(&self) {
        // 持有内部锁再通知：等待者检查取消状态与进入睡眠之间不会丢失这次唤醒
        let _count = self.count.lock();
        self.wait.notify_all();
    }
}

impl Semaphore {
    /// 创建初始计数为 `count` 的信号量
    pub fn new(count: usize) -> Self {
        Self {
            inner: Arc::new(SemaphoreInner {
                count: parking_lot::Mutex::new(count),
                wait: parking_lot::Condvar::new(),
            }),
        }
    }

    /// 获取信号量，睡眠期间可被取消
    ///
    /// 若信号量当前可用，即使令牌已被取消也会直接获取成功；
    /// 只有在需要睡眠时才检查取消状态。
    pub fn down_interruptible(&self, cancel: &CancelToken) -> Result<(), Interrupted> {
        if self.down_trylock() {
            return Ok(());
        }

        let id = cancel.register(&self.inner);
        let mut count = self.inner.count.lock();
        let result = loop {
            if *count > 0 {
                *count -= 1;
                break Ok(());
            }
            if cancel.is_cancelled() {
                break Err(Interrupted);
            }
            self.inner.wait.wait(&mut count);
        };
        drop(count);
        cancel.unregister(id);
        result
    }

    /// 尝试获取信号量，成功返回 `true`
    pub fn down_trylock(&self) -> bool {
        let mut count = self.inner.count.lock();
        if *count > 0 {
            *count -= 1;
            true
        } else {
            false
        }
    }

    /// 释放信号量并唤醒一个等待者
    pub fn up(&self) {
        let mut count = self.inner.count.lock();
        *count += 1;
        self.inner.wait.notify_one();
    }

    /// 当前可用计数 (仅用于调试/测试)
    pub fn count(&self) -> usize {
        *self.inner.count.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn down_and_up_adjust_count() {
        let sem = Semaphore::new(1);
        assert!(sem.down_trylock());
        assert_eq!(sem.count(), 0);
        assert!(!sem.down_trylock());
        sem.up();
        assert_eq!(sem.count(), 1);
        assert!(sem.down_trylock());
    }

    #[test]
    fn available_semaphore_ignores_pending_cancel() {
        let sem = Semaphore::new(1);
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(sem.down_interruptible(&cancel), Ok(()));
        // 已经被占用，需要睡眠，此时才会观察到取消
        assert_eq!(sem.down_interruptible(&cancel), Err(Interrupted));
    }

    #[test]
    fn up_wakes_blocked_waiter() {
        let sem = Arc::new(Semaphore::new(0));
        let (tx, rx) = mpsc::channel();

        let waiter = {
            let sem = sem.clone();
            thread::spawn(move || {
                let cancel = CancelToken::new();
                tx.send(()).unwrap();
                sem.down_interruptible(&cancel)
            })
        };

        rx.recv().unwrap();
        thread::sleep(Duration::from_millis(20));
        sem.up();
        assert_eq!(waiter.join().unwrap(), Ok(()));
        assert_eq!(sem.count(), 0);
    }

    #[test]
    fn cancel_unblocks_waiter_without_consuming() {
        let sem = Arc::new(Semaphore::new(0));
        let cancel = CancelToken::new();
        let (tx, rx) = mpsc::channel();

        let waiter = {
            let sem = sem.clone();
            let cancel = cancel.clone();
            thread::spawn(move || {
                tx.send(()).unwrap();
                sem.down_interruptible(&cancel)
            })
        };

        rx.recv().unwrap();
        thread::sleep(Duration::from_millis(20));
        cancel.cancel();
        assert_eq!(waiter.join().unwrap(), Err(Interrupted));

        // 信号量状态保持一致：一次 up 之后仍然恰好可以获取一次
        sem.up();
        assert!(sem.down_trylock());
        assert!(!sem.down_trylock());
    }

    #[test]
    fn cancel_only_affects_its_own_waiter() {
        let sem = Arc::new(Semaphore::new(0));
        let doomed = CancelToken::new();
        let (tx, rx) = mpsc::channel();

        let spawn_waiter = |cancel: CancelToken| {
            let sem = sem.clone();
            let tx = tx.clone();
            thread::spawn(move || {
                tx.send(()).unwrap();
                sem.down_interruptible(&cancel)
            })
        };
        let cancelled = spawn_waiter(doomed.clone());
        let survivor = spawn_waiter(CancelToken::new());

        rx.recv().unwrap();
        rx.recv().unwrap();
        thread::sleep(Duration::from_millis(20));
        doomed.cancel();
        assert_eq!(cancelled.join().unwrap(), Err(Interrupted));

        sem.up();
        assert_eq!(survivor.join().unwrap(), Ok(()));
    }

    #[test]
    fn reset_allows_retry_after_interrupt() {
        let sem = Semaphore::new(0);
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(sem.down_interruptible(&cancel), Err(Interrupted));
        cancel.reset();
        assert!(!cancel.is_cancelled());
        sem.up();
        assert_eq!(sem.down_interruptible(&cancel), Ok(()));
    }
}
