//! 寄存器存储
//!
//! 唯一的域状态：一个 `i32` 及保护它的二值信号量。
//! 所有对寄存器的访问都必须持有 [`RegisterGuard`]，guard 被丢弃即释放。

use sync::{CancelToken, Mutex, MutexGuard};

use crate::HelloError;

/// 寄存器存储
#[derive(Debug)]
pub struct RegisterStore {
    val: Mutex<i32>,
}

impl RegisterStore {
    /// 创建寄存器，初值为 0
    pub fn new() -> Self {
        Self { val: Mutex::new(0) }
    }

    /// 获取寄存器锁
    ///
    /// 可能无限期阻塞；`cancel` 被触发时返回 [`HelloError::Interrupted`]。
    pub fn acquire(&self, cancel: &CancelToken) -> Result<RegisterGuard<'_>, HelloError> {
        let guard = self.val.lock_interruptible(cancel)?;
        Ok(RegisterGuard { guard })
    }

    /// 读取一次寄存器
    pub fn get(&self, cancel: &CancelToken) -> Result<i32, HelloError> {
        Ok(self.acquire(cancel)?.get())
    }

    /// 写入一次寄存器
    pub fn set(&self, cancel: &CancelToken, val: i32) -> Result<(), HelloError> {
        self.acquire(cancel)?.set(val);
        Ok(())
    }

    /// 寄存器锁当前是否被持有
    pub fn is_locked(&self) -> bool {
        self.val.is_locked()
    }
}

impl Default for RegisterStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 持有寄存器锁期间的访问凭证
pub struct RegisterGuard<'a> {
    guard: MutexGuard<'a, i32>,
}

impl RegisterGuard<'_> {
    /// 当前值
    pub fn get(&self) -> i32 {
        *self.guard
    }

    /// 替换当前值
    pub fn set(&mut self, val: i32) {
        *self.guard = val;
    }

    /// 显式释放锁，唤醒一个等待者
    pub fn release(self) {}
}
