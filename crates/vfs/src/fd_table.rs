//! 文件描述符表
//!
//! 该模块实现了进程级的文件描述符管理，提供 POSIX 兼容的文件描述符操作。
//!
//! 约定与语义（与用户态常见预期保持一致）：
//!
//! - `alloc()` 分配“最小可用 fd”
//! - 多个描述符可共享同一个 `Arc<dyn File>`（因此共享 offset）
//! - 底层文件的最后一个描述符关闭时调用 [`File::release`]

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use sync::SpinLock;

use crate::{File, FsError};

/// 文件描述符表
pub struct FDTable {
    /// 文件描述符数组
    files: SpinLock<Vec<Option<Arc<dyn File>>>>,
    /// 最大文件描述符数量
    max_fds: usize,
}

impl fmt::Debug for FDTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let files = self.files.lock();
        let used = files.iter().filter(|slot| slot.is_some()).count();
        f.debug_struct("FDTable")
            .field("max_fds", &self.max_fds)
            .field("slots", &files.len())
            .field("used", &used)
            .finish()
    }
}

impl FDTable {
    /// 创建新的文件描述符表
    pub fn new(max_fds: usize) -> Self {
        Self {
            files: SpinLock::new(Vec::new()),
            max_fds,
        }
    }

    /// 取走并清空所有已打开的文件描述符
    pub fn take_all(&self) -> Vec<(usize, Arc<dyn File>)> {
        let mut files = self.files.lock();

        let mut out = Vec::new();
        for (fd, slot) in files.iter_mut().enumerate() {
            if let Some(file) = slot.take() {
                out.push((fd, file));
            }
        }
        out
    }

    /// 分配一个新的文件描述符
    pub fn alloc(&self, file: Arc<dyn File>) -> Result<usize, FsError> {
        let mut files = self.files.lock();

        // 查找最小可用 FD
        for (fd, slot) in files.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(file);
                return Ok(fd);
            }
        }

        // 如果没有空闲槽位，扩展数组
        let fd = files.len();
        if fd >= self.max_fds {
            return Err(FsError::TooManyOpenFiles);
        }

        files.push(Some(file));
        Ok(fd)
    }

    /// 获取文件对象
    pub fn get(&self, fd: usize) -> Result<Arc<dyn File>, FsError> {
        let files = self.files.lock();
        files
            .get(fd)
            .and_then(|f| f.clone())
            .ok_or(FsError::BadFileDescriptor)
    }

    /// 关闭文件描述符
    ///
    /// 若这是底层文件的最后一个描述符，在表锁之外调用 [`File::release`]。
    pub fn close(&self, fd: usize) -> Result<(), FsError> {
        let file = {
            let mut files = self.files.lock();
            files
                .get_mut(fd)
                .and_then(Option::take)
                .ok_or(FsError::BadFileDescriptor)?
        };
        release_if_last(file)
    }

    /// 关闭全部文件描述符（进程退出）
    pub fn close_all(&self) {
        for (fd, file) in self.take_all() {
            if let Err(e) = release_if_last(file) {
                log::warn!("fd {}: release failed: {:?}", fd, e);
            }
        }
    }
}

fn release_if_last(mut file: Arc<dyn File>) -> Result<(), FsError> {
    // 独占即为最后一个引用，其他持有者已无法再克隆它
    if Arc::get_mut(&mut file).is_some() {
        file.release()
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use sync::CancelToken;

    struct CountingFile {
        released: Arc<AtomicUsize>,
    }

    impl File for CountingFile {
        fn readable(&self) -> bool {
            true
        }
        fn writable(&self) -> bool {
            false
        }
        fn read(&self, _buf: &mut [u8], _cancel: &CancelToken) -> Result<usize, FsError> {
            Ok(0)
        }
        fn write(&self, _buf: &[u8], _cancel: &CancelToken) -> Result<usize, FsError> {
            Err(FsError::PermissionDenied)
        }
        fn release(&self) -> Result<(), FsError> {
            self.released.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn as_any(&self) -> &dyn core::any::Any {
            self
        }
    }

    fn counting() -> (Arc<dyn File>, Arc<AtomicUsize>) {
        let released = Arc::new(AtomicUsize::new(0));
        let file: Arc<dyn File> = Arc::new(CountingFile {
            released: released.clone(),
        });
        (file, released)
    }

    #[test]
    fn alloc_returns_lowest_free_fd() {
        let table = FDTable::new(8);
        let (a, _) = counting();
        let (b, _) = counting();
        let (c, _) = counting();
        assert_eq!(table.alloc(a).unwrap(), 0);
        assert_eq!(table.alloc(b).unwrap(), 1);
        table.close(0).unwrap();
        assert_eq!(table.alloc(c).unwrap(), 0);
    }

    #[test]
    fn alloc_respects_limit() {
        let table = FDTable::new(1);
        let (a, _) = counting();
        let (b, _) = counting();
        table.alloc(a).unwrap();
        assert_eq!(table.alloc(b).err(), Some(FsError::TooManyOpenFiles));
    }

    #[test]
    fn close_bad_fd() {
        let table = FDTable::new(4);
        assert_eq!(table.close(3), Err(FsError::BadFileDescriptor));
        assert_eq!(table.get(0).err(), Some(FsError::BadFileDescriptor));
    }

    #[test]
    fn release_runs_on_last_close_only() {
        let table = FDTable::new(4);
        let (file, released) = counting();
        let fd = table.alloc(file.clone()).unwrap();
        let shared = table.alloc(file).unwrap();

        table.close(fd).unwrap();
        assert_eq!(released.load(Ordering::SeqCst), 0);
        table.close(shared).unwrap();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn close_all_releases_everything() {
        let table = FDTable::new(4);
        let (a, ra) = counting();
        let (b, rb) = counting();
        table.alloc(a).unwrap();
        table.alloc(b).unwrap();
        table.close_all();
        assert_eq!(ra.load(Ordering::SeqCst), 1);
        assert_eq!(rb.load(Ordering::SeqCst), 1);
        assert!(table.take_all().is_empty());
    }
}
