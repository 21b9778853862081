//! 文件抽象层 - VFS 会话层接口
//!
//! 该模块定义了统一的文件操作接口 [`File`] trait，字符设备、proc 文件、sysfs 属性文件
//! 都以 `Arc<dyn File>` 形式存储在进程的文件描述符表中。
//!
//! 读写操作携带调用方的 [`CancelToken`]：实现可能在设备锁上睡眠，
//! 令牌被取消时应返回 [`FsError::Interrupted`]。

use sync::CancelToken;
use uapi::fcntl::OpenFlags;

use crate::FsError;

/// 文件操作的统一接口
pub trait File: Send + Sync {
    /// 检查文件是否可读
    fn readable(&self) -> bool;

    /// 检查文件是否可写
    fn writable(&self) -> bool;

    /// 从文件读取数据
    fn read(&self, buf: &mut [u8], cancel: &CancelToken) -> Result<usize, FsError>;

    /// 向文件写入数据
    fn write(&self, buf: &[u8], cancel: &CancelToken) -> Result<usize, FsError>;

    /// 最后一个文件描述符关闭时调用（可选方法）
    fn release(&self) -> Result<(), FsError> {
        Ok(())
    }

    /// 获取当前偏移量（可选方法）
    fn offset(&self) -> usize {
        0
    }

    /// 获取打开标志（可选方法）
    fn flags(&self) -> OpenFlags {
        OpenFlags::empty()
    }

    /// 获取 Any trait 引用，用于安全的类型转换
    fn as_any(&self) -> &dyn core::any::Any;
}
