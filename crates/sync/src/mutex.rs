//! 睡眠互斥锁
//!
//! 以二值 [`Semaphore`] 为门、[`UnsafeCell`] 存放数据的互斥锁。
//! 与 [`crate::SpinLock`] 不同，等待者会睡眠，且可以通过 [`CancelToken`] 打断等待。

use core::cell::UnsafeCell;
use core::fmt;
use core::ops::{Deref, DerefMut};

use crate::{CancelToken, Interrupted, Semaphore};

/// 睡眠互斥锁
///
/// # 示例
/// ```
/// use sync::{CancelToken, Mutex};
///
/// let lock = Mutex::new(0);
/// let cancel = CancelToken::new();
/// *lock.lock_interruptible(&cancel).unwrap() = 7;
/// assert_eq!(*lock.try_lock().unwrap(), 7);
/// ```
pub struct Mutex<T: ?Sized> {
    sem: Semaphore,
    data: UnsafeCell<T>,
}

// Safety: 对 data 的访问只发生在持有 sem 的 MutexGuard 中。
unsafe impl<T: ?Sized + Send> Send for Mutex<T> {}
unsafe impl<T: ?Sized + Send> Sync for Mutex<T> {}

impl<T> Mutex<T> {
    /// 创建一个新的互斥锁
    pub fn new(data: T) -> Self {
        Self {
            sem: Semaphore::new(1),
            data: UnsafeCell::new(data),
        }
    }
}

impl<T: ?Sized> Mutex<T> {
    /// 获取锁，等待期间可被取消
    pub fn lock_interruptible(
        &self,
        cancel: &CancelToken,
    ) -> Result<MutexGuard<'_, T>, Interrupted> {
        self.sem.down_interruptible(cancel)?;
        Ok(MutexGuard { lock: self })
    }

    /// 尝试获取锁，失败立即返回 None
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        self.sem.down_trylock().then(|| MutexGuard { lock: self })
    }

    /// 检查锁是否被占用 (仅用于调试/测试)
    pub fn is_locked(&self) -> bool {
        self.sem.count() == 0
    }
}

impl<T: ?Sized> fmt::Debug for Mutex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutex")
            .field("locked", &self.is_locked())
            .finish_non_exhaustive()
    }
}

/// Mutex 的 RAII 保护器，离开作用域时释放锁并唤醒一个等待者。
pub struct MutexGuard<'a, T: ?Sized> {
    lock: &'a Mutex<T>,
}

impl<T: ?Sized> Deref for MutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: 保护器存在期间信号量被当前持有者占用
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: 同上，且 &mut self 保证了保护器内的独占
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T: ?Sized> Drop for MutexGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.sem.up();
    }
}
