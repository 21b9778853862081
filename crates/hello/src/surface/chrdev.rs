//! 字符设备访问面：按本机字节序读写 4 字节

use alloc::sync::Arc;
use core::mem::size_of;
use sync::CancelToken;
use uapi::fcntl::OpenFlags;
use vfs::{CharDriver, File, FsError};

use crate::{HelloError, RegisterStore};

const VAL_SIZE: usize = size_of::<i32>();

/// 绑定到 cdev 的驱动入口
pub struct HelloCharDriver {
    store: Arc<RegisterStore>,
}

impl HelloCharDriver {
    /// 创建驱动入口
    pub fn new(store: Arc<RegisterStore>) -> Self {
        Self { store }
    }
}

impl CharDriver for HelloCharDriver {
    fn open(&self, _dev: u64, flags: OpenFlags) -> Result<Arc<dyn File>, FsError> {
        Ok(Arc::new(HelloFile {
            store: self.store.clone(),
            flags,
        }))
    }
}

/// 打开的 `/dev/hello`
pub struct HelloFile {
    store: Arc<RegisterStore>,
    flags: OpenFlags,
}

impl HelloFile {
    /// 把寄存器值拷贝到 `buf`
    ///
    /// `buf` 短于 4 字节时不拷贝，返回 0。
    pub fn read_register(&self, buf: &mut [u8], cancel: &CancelToken) -> Result<usize, HelloError> {
        if !self.flags.readable() {
            return Err(HelloError::PermissionDenied);
        }
        let guard = self.store.acquire(cancel)?;
        if buf.len() < VAL_SIZE {
            return Ok(0);
        }
        buf[..VAL_SIZE].copy_from_slice(&guard.get().to_ne_bytes());
        Ok(VAL_SIZE)
    }

    /// 用 `buf` 的 4 字节替换寄存器值
    ///
    /// 长度不为 4 时不做任何修改，返回 0。
    pub fn write_register(&self, buf: &[u8], cancel: &CancelToken) -> Result<usize, HelloError> {
        if !self.flags.writable() {
            return Err(HelloError::PermissionDenied);
        }
        let mut guard = self.store.acquire(cancel)?;
        let Ok(bytes) = <[u8; VAL_SIZE]>::try_from(buf) else {
            return Ok(0);
        };
        guard.set(i32::from_ne_bytes(bytes));
        Ok(VAL_SIZE)
    }
}

impl File for HelloFile {
    fn readable(&self) -> bool {
        self.flags.readable()
    }

    fn writable(&self) -> bool {
        self.flags.writable()
    }

    fn read(&self, buf: &mut [u8], cancel: &CancelToken) -> Result<usize, FsError> {
        Ok(self.read_register(buf, cancel)?)
    }

    fn write(&self, buf: &[u8], cancel: &CancelToken) -> Result<usize, FsError> {
        Ok(self.write_register(buf, cancel)?)
    }

    fn flags(&self) -> OpenFlags {
        self.flags
    }

    fn as_any(&self) -> &dyn core::any::Any {
        self
    }
}
