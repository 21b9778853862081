//! 内核堆记账

use std::sync::atomic::{AtomicUsize, Ordering};

use vfs::FsError;

/// 有上限的内核堆，只做字节记账
#[derive(Debug)]
pub struct KernelHeap {
    limit: usize,
    used: AtomicUsize,
}

impl KernelHeap {
    /// 创建上限为 `limit` 字节的堆
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            used: AtomicUsize::new(0),
        }
    }

    /// 申请 `size` 字节，超出上限返回 [`FsError::OutOfMemory`]
    pub fn reserve(&self, size: usize) -> Result<(), FsError> {
        self.used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                used.checked_add(size).filter(|&total| total <= self.limit)
            })
            .map(|_| ())
            .map_err(|_| FsError::OutOfMemory)
    }

    /// 归还 `size` 字节
    pub fn release(&self, size: usize) {
        let _ = self
            .used
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                Some(used.saturating_sub(size))
            });
    }

    /// 已使用字节数
    pub fn used(&self) -> usize {
        self.used.load(Ordering::Acquire)
    }

    /// 上限
    pub fn limit(&self) -> usize {
        self.limit
    }
}
