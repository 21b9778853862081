//! proc 访问面：`/proc/hello`

use alloc::sync::Arc;
use alloc::vec::Vec;
use fs::ProcOps;
use sync::CancelToken;
use uapi::mm::PAGE_SIZE;
use vfs::FsError;

use super::text::{format_value, parse_value};
use crate::{HelloError, RegisterStore};

/// `/proc/hello` 的读写回调
pub struct HelloProcOps {
    store: Arc<RegisterStore>,
}

impl HelloProcOps {
    /// 创建回调
    pub fn new(store: Arc<RegisterStore>) -> Self {
        Self { store }
    }

    /// 每次打开只在偏移 0 处产出一次内容，之后返回 0 表示结束
    pub fn read_register(
        &self,
        page: &mut [u8],
        offset: usize,
        cancel: &CancelToken,
    ) -> Result<usize, HelloError> {
        if offset > 0 {
            return Ok(0);
        }
        let guard = self.store.acquire(cancel)?;
        Ok(format_value(guard.get(), page))
    }

    /// 写入超过一页时拒绝，寄存器保持不变
    pub fn write_register(&self, buf: &[u8], cancel: &CancelToken) -> Result<usize, HelloError> {
        if buf.len() > PAGE_SIZE {
            log::warn!("The buff is too large: {}.", buf.len());
            return Err(HelloError::OutOfSpace);
        }

        // 先拷贝到内核页再解析
        let mut page = Vec::new();
        if page.try_reserve_exact(buf.len()).is_err() {
            log::error!("Failed to alloc page.");
            return Err(HelloError::AllocationFailure);
        }
        page.extend_from_slice(buf);

        let mut guard = self.store.acquire(cancel)?;
        guard.set(parse_value(&page));
        Ok(buf.len())
    }
}

impl ProcOps for HelloProcOps {
    fn read(&self, page: &mut [u8], offset: usize, cancel: &CancelToken) -> Result<usize, FsError> {
        Ok(self.read_register(page, offset, cancel)?)
    }

    fn write(&self, buf: &[u8], cancel: &CancelToken) -> Result<usize, FsError> {
        Ok(self.write_register(buf, cancel)?)
    }
}
