//! Procfs 条目与打开文件

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use sync::{CancelToken, SpinLock};
use uapi::fcntl::OpenFlags;
use uapi::mm::PAGE_SIZE;
use vfs::{File, FsError};

use crate::check_name;

/// proc 条目的读写回调（对应旧式 `read_proc` / `write_proc`）
pub trait ProcOps: Send + Sync {
    /// 在偏移 `offset` 处生成内容到 `page`（长度为一页），返回写入字节数，0 表示结束
    fn read(&self, page: &mut [u8], offset: usize, cancel: &CancelToken) -> Result<usize, FsError>;

    /// 处理用户写入，返回消费的字节数
    fn write(&self, buf: &[u8], cancel: &CancelToken) -> Result<usize, FsError>;
}

/// 一个 `/proc/<name>` 条目
pub struct ProcEntry {
    name: String,
    mode: u16,
    ops: Arc<dyn ProcOps>,
}

impl ProcEntry {
    /// 条目名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 权限位
    pub fn mode(&self) -> u16 {
        self.mode
    }

    /// 条目的读写回调
    pub fn ops(&self) -> &Arc<dyn ProcOps> {
        &self.ops
    }
}

/// ProcFS 根目录
#[derive(Default)]
pub struct ProcFS {
    entries: SpinLock<BTreeMap<String, Arc<ProcEntry>>>,
}

impl fmt::Debug for ProcFS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcFS")
            .field("entries", &self.names())
            .finish()
    }
}

impl ProcFS {
    /// 创建空的 procfs
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建 `/proc/<name>`，重名返回 [`FsError::AlreadyExists`]
    pub fn create_entry(
        &self,
        name: &str,
        mode: u16,
        ops: Arc<dyn ProcOps>,
    ) -> Result<(), FsError> {
        check_name(name)?;
        let mut entries = self.entries.lock();
        if entries.contains_key(name) {
            return Err(FsError::AlreadyExists);
        }
        entries.insert(
            name.to_string(),
            Arc::new(ProcEntry {
                name: name.to_string(),
                mode,
                ops,
            }),
        );
        Ok(())
    }

    /// 删除回调为 `ops` 的条目 `name`
    ///
    /// 条目不存在或已被别人以同名重建时返回 `false`，不做任何修改。
    pub fn remove_entry(&self, name: &str, ops: &Arc<dyn ProcOps>) -> bool {
        let mut entries = self.entries.lock();
        if !entries.get(name).is_some_and(|e| Arc::ptr_eq(&e.ops, ops)) {
            return false;
        }
        entries.remove(name);
        true
    }

    /// 查找条目
    pub fn lookup(&self, name: &str) -> Option<Arc<ProcEntry>> {
        self.entries.lock().get(name).cloned()
    }

    /// 列出全部条目名
    pub fn names(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    /// 打开 `/proc/<name>`
    pub fn open(&self, name: &str, flags: OpenFlags) -> Result<Arc<dyn File>, FsError> {
        let entry = self.lookup(name).ok_or(FsError::NotFound)?;
        if flags.readable() && entry.mode & 0o444 == 0 {
            return Err(FsError::PermissionDenied);
        }
        if flags.writable() && entry.mode & 0o222 == 0 {
            return Err(FsError::PermissionDenied);
        }
        Ok(Arc::new(ProcFile {
            entry,
            flags,
            offset: SpinLock::new(0),
        }))
    }
}

/// 打开的 proc 文件，自行维护读偏移
pub struct ProcFile {
    entry: Arc<ProcEntry>,
    flags: OpenFlags,
    offset: SpinLock<usize>,
}

impl File for ProcFile {
    fn readable(&self) -> bool {
        self.flags.readable()
    }

    fn writable(&self) -> bool {
        self.flags.writable()
    }

    fn read(&self, buf: &mut [u8], cancel: &CancelToken) -> Result<usize, FsError> {
        if !self.readable() {
            return Err(FsError::BadFileDescriptor);
        }
        let offset = *self.offset.lock();
        let mut page = vec![0u8; PAGE_SIZE];
        let len = self.entry.ops.read(&mut page, offset, cancel)?.min(PAGE_SIZE);

        let n = len.min(buf.len());
        buf[..n].copy_from_slice(&page[..n]);
        *self.offset.lock() += n;
        Ok(n)
    }

    fn write(&self, buf: &[u8], cancel: &CancelToken) -> Result<usize, FsError> {
        if !self.writable() {
            return Err(FsError::BadFileDescriptor);
        }
        self.entry.ops.write(buf, cancel)
    }

    fn offset(&self) -> usize {
        *self.offset.lock()
    }

    fn flags(&self) -> OpenFlags {
        self.flags
    }

    fn as_any(&self) -> &dyn core::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting;

    impl ProcOps for Greeting {
        fn read(
            &self,
            page: &mut [u8],
            offset: usize,
            _cancel: &CancelToken,
        ) -> Result<usize, FsError> {
            if offset > 0 {
                return Ok(0);
            }
            page[..6].copy_from_slice(b"hello\n");
            Ok(6)
        }

        fn write(&self, buf: &[u8], _cancel: &CancelToken) -> Result<usize, FsError> {
            Ok(buf.len())
        }
    }

    #[test]
    fn create_entry_twice_conflicts() {
        let proc = ProcFS::new();
        let ops: Arc<dyn ProcOps> = Arc::new(Greeting);
        proc.create_entry("hello", 0o644, ops.clone()).unwrap();
        assert_eq!(
            proc.create_entry("hello", 0o644, Arc::new(Greeting)),
            Err(FsError::AlreadyExists)
        );
        assert!(proc.remove_entry("hello", &ops));
        assert!(!proc.remove_entry("hello", &ops));
        assert_eq!(proc.open("hello", OpenFlags::O_RDONLY).err(), Some(FsError::NotFound));
    }

    #[test]
    fn remove_leaves_entry_recreated_by_someone_else() {
        let proc = ProcFS::new();
        let first: Arc<dyn ProcOps> = Arc::new(Greeting);
        let second: Arc<dyn ProcOps> = Arc::new(Greeting);
        proc.create_entry("hello", 0o644, first.clone()).unwrap();
        assert!(proc.remove_entry("hello", &first));
        proc.create_entry("hello", 0o644, second.clone()).unwrap();

        assert!(!proc.remove_entry("hello", &first));
        let entry = proc.lookup("hello").unwrap();
        assert!(Arc::ptr_eq(entry.ops(), &second));
    }

    #[test]
    fn read_advances_offset_to_eof() {
        let proc = ProcFS::new();
        proc.create_entry("hello", 0o644, Arc::new(Greeting)).unwrap();
        let file = proc.open("hello", OpenFlags::O_RDWR).unwrap();
        let cancel = CancelToken::new();
        let mut buf = [0u8; 32];
        assert_eq!(file.read(&mut buf, &cancel), Ok(6));
        assert_eq!(&buf[..6], b"hello\n");
        assert_eq!(file.offset(), 6);
        assert_eq!(file.read(&mut buf, &cancel), Ok(0));
        assert_eq!(file.write(b"abc", &cancel), Ok(3));
    }

    #[test]
    fn write_on_read_only_open_is_rejected() {
        let proc = ProcFS::new();
        proc.create_entry("hello", 0o444, Arc::new(Greeting)).unwrap();
        assert_eq!(
            proc.open("hello", OpenFlags::O_WRONLY).err(),
            Some(FsError::PermissionDenied)
        );
        let file = proc.open("hello", OpenFlags::O_RDONLY).unwrap();
        assert_eq!(
            file.write(b"1", &CancelToken::new()),
            Err(FsError::BadFileDescriptor)
        );
    }
}
