//! 同步原语
//!
//! 向其它内核模块提供基本的锁和同步原语
//! 包括自旋锁、睡眠信号量、睡眠互斥锁以及取消令牌
//!
//! # 选择
//!
//! - [`SpinLock`]：保护注册表等极短临界区，持锁期间不得睡眠。
//! - [`Semaphore`] / [`Mutex`]：可能长时间持有的锁。等待者会睡眠而非自旋，
//!   并且可以通过 [`CancelToken`] 被打断（对应 Linux 的 `down_interruptible`）。

mod cancel;
mod mutex;
mod raw_spin_lock;
mod semaphore;
mod spin_lock;

pub use cancel::CancelToken;
pub use mutex::{Mutex, MutexGuard};
pub use raw_spin_lock::RawSpinLock;
pub use semaphore::Semaphore;
pub use spin_lock::{SpinLock, SpinLockGuard};

/// 等待锁的过程中收到取消请求
///
/// 调用方应当放弃本次操作并稍后重试（对应内核的 `-ERESTARTSYS`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("interrupted while waiting for lock")]
pub struct Interrupted;
