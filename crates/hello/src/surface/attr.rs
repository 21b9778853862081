//! sysfs 属性访问面：`/sys/class/hello/hello/val`

use alloc::sync::Arc;
use fs::DeviceAttribute;
use sync::CancelToken;
use vfs::FsError;

use super::text::{format_value, parse_value};
use crate::config::{ATTR_MODE, ATTR_NAME};
use crate::{HelloError, RegisterStore};

/// 属性 `val`
pub struct ValAttribute {
    store: Arc<RegisterStore>,
}

impl ValAttribute {
    /// 创建属性
    pub fn new(store: Arc<RegisterStore>) -> Self {
        Self { store }
    }

    /// 把 `"<value>\n"` 写入 `page`
    pub fn read_register(&self, page: &mut [u8], cancel: &CancelToken) -> Result<usize, HelloError> {
        let guard = self.store.acquire(cancel)?;
        Ok(format_value(guard.get(), page))
    }

    /// 解析十进制文本并写入寄存器，总是消费全部输入
    pub fn write_register(&self, buf: &[u8], cancel: &CancelToken) -> Result<usize, HelloError> {
        let mut guard = self.store.acquire(cancel)?;
        guard.set(parse_value(buf));
        Ok(buf.len())
    }
}

impl DeviceAttribute for ValAttribute {
    fn name(&self) -> &str {
        ATTR_NAME
    }

    fn mode(&self) -> u16 {
        ATTR_MODE
    }

    fn show(&self, page: &mut [u8], cancel: &CancelToken) -> Result<usize, FsError> {
        Ok(self.read_register(page, cancel)?)
    }

    fn store(&self, buf: &[u8], cancel: &CancelToken) -> Result<usize, FsError> {
        Ok(self.write_register(buf, cancel)?)
    }
}
