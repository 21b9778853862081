//! HAL 错误类型

use uapi::errno::{EFAULT, ENODEV, ENOENT, user_visible};

/// HAL 错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HalError {
    /// 设备节点不存在（驱动未加载）
    #[error("device node not found")]
    DeviceNotFound,
    /// 请求的设备名不属于本模块
    #[error("unknown device name")]
    UnknownDevice,
    /// 读写字节数与寄存器宽度不符
    #[error("short transfer: expected {expected} bytes, got {actual}")]
    ShortTransfer {
        /// 期望字节数
        expected: usize,
        /// 实际字节数
        actual: usize,
    },
    /// 系统调用失败
    #[error("system call failed with errno {0}")]
    Io(i32),
}

impl HalError {
    /// 由 `open(2)` 的 errno 构造
    pub(crate) fn from_open_errno(errno: i32) -> Self {
        match errno {
            ENOENT | ENODEV => HalError::DeviceNotFound,
            other => HalError::from_errno(other),
        }
    }

    /// 由读写的 errno 构造
    pub(crate) fn from_errno(errno: i32) -> Self {
        HalError::Io(user_visible(errno))
    }

    /// 转换为 HAL 接口约定的负错误码
    pub fn to_errno(&self) -> i32 {
        match self {
            HalError::DeviceNotFound => -ENOENT,
            HalError::UnknownDevice => -ENODEV,
            HalError::ShortTransfer { .. } => -EFAULT,
            HalError::Io(errno) => -errno,
        }
    }
}
