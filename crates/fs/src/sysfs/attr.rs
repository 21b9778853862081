//! 设备属性与属性文件

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use sync::{CancelToken, SpinLock};
use uapi::fcntl::OpenFlags;
use uapi::mm::PAGE_SIZE;
use vfs::{File, FsError};

/// 设备属性（对应 Linux `struct device_attribute`）
pub trait DeviceAttribute: Send + Sync {
    /// 属性文件名
    fn name(&self) -> &str;

    /// 权限位，例如 `0o644`
    fn mode(&self) -> u16;

    /// 把属性内容写入 `page`（长度为一页），返回写入字节数
    fn show(&self, page: &mut [u8], cancel: &CancelToken) -> Result<usize, FsError>;

    /// 解析用户写入的内容，返回消费的字节数
    fn store(&self, buf: &[u8], cancel: &CancelToken) -> Result<usize, FsError>;
}

/// 打开的 sysfs 属性文件
///
/// 一个读周期内只调用一次 `show`，后续读取都从缓存的页面里取，
/// 小缓冲区分多次读到的仍是同一个值。
pub struct AttrFile {
    attr: Arc<dyn DeviceAttribute>,
    flags: OpenFlags,
    state: SpinLock<ReadState>,
}

#[derive(Default)]
struct ReadState {
    offset: usize,
    page: Option<Vec<u8>>,
}

impl AttrFile {
    /// 以 `flags` 打开属性，按属性的权限位检查访问模式
    pub fn open(attr: Arc<dyn DeviceAttribute>, flags: OpenFlags) -> Result<Self, FsError> {
        let mode = attr.mode();
        if flags.readable() && mode & 0o444 == 0 {
            return Err(FsError::PermissionDenied);
        }
        if flags.writable() && mode & 0o222 == 0 {
            return Err(FsError::PermissionDenied);
        }
        Ok(Self {
            attr,
            flags,
            state: SpinLock::new(ReadState::default()),
        })
    }
}

impl File for AttrFile {
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
        // show 可能睡眠，不能在自旋锁内调用
        if self.state.lock().page.is_none() {
            let mut page = vec![0u8; PAGE_SIZE];
            let len = self.attr.show(&mut page, cancel)?.min(PAGE_SIZE);
            page.truncate(len);
            let mut state = self.state.lock();
            if state.page.is_none() {
                state.page = Some(page);
            }
        }

        let mut state = self.state.lock();
        let ReadState { offset, page } = &mut *state;
        let page = page.as_deref().unwrap_or_default();
        if *offset >= page.len() {
            return Ok(0);
        }
        let n = (page.len() - *offset).min(buf.len());
        buf[..n].copy_from_slice(&page[*offset..*offset + n]);
        *offset += n;
        Ok(n)
    }

    fn write(&self, buf: &[u8], cancel: &CancelToken) -> Result<usize, FsError> {
        if !self.writable() {
            return Err(FsError::BadFileDescriptor);
        }
        // 与 kernfs 一致，单次写入最多一页
        let len = buf.len().min(PAGE_SIZE);
        self.attr.store(&buf[..len], cancel)
    }

    fn offset(&self) -> usize {
        self.state.lock().offset
    }

    fn flags(&self) -> OpenFlags {
        self.flags
    }

    fn as_any(&self) -> &dyn core::any::Any {
        self
    }
}
