//! 设备驱动接口
//!
//! 驱动通过实现 [`CharDriver`] 把自己挂到 [`crate::ChrdevTable`] 上，
//! 打开设备节点时由 VFS 调用 [`CharDriver::open`] 取得会话级的 [`File`]。

use alloc::sync::Arc;

use crate::{File, FsError, OpenFlags};

/// 字符设备驱动接口
///
/// 对应 Linux 中由 `cdev_add` 注册的 `file_operations` 的入口。
pub trait CharDriver: Send + Sync {
    /// 打开设备号为 `dev` 的设备，返回本次打开的文件对象
    fn open(&self, dev: u64, flags: OpenFlags) -> Result<Arc<dyn File>, FsError>;
}
