//! 驱动错误类型

use vfs::FsError;

/// 驱动错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HelloError {
    /// 设备号或内存分配失败，启动中止并完整回滚
    #[error("allocation failure")]
    AllocationFailure,
    /// 注册冲突，启动中止并完整回滚
    #[error("registration conflict")]
    RegistrationConflict,
    /// 等待寄存器锁时被打断，可重试
    #[error("interrupted while waiting for the register")]
    Interrupted,
    /// 字符设备读写长度不符
    #[error("invalid argument")]
    InvalidArgument,
    /// proc 写入超过一页
    #[error("write larger than one page")]
    OutOfSpace,
    /// 设备不存在
    #[error("no such device")]
    NoDevice,
    /// 打开方式不允许该操作
    #[error("permission denied")]
    PermissionDenied,
}

impl HelloError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        FsError::from(*self).to_errno()
    }
}

impl From<sync::Interrupted> for HelloError {
    fn from(_: sync::Interrupted) -> Self {
        HelloError::Interrupted
    }
}

impl From<HelloError> for FsError {
    fn from(err: HelloError) -> Self {
        match err {
            HelloError::AllocationFailure => FsError::OutOfMemory,
            HelloError::RegistrationConflict => FsError::AlreadyExists,
            HelloError::Interrupted => FsError::Interrupted,
            HelloError::InvalidArgument => FsError::InvalidArgument,
            HelloError::OutOfSpace => FsError::NoSpace,
            HelloError::NoDevice => FsError::NoDevice,
            HelloError::PermissionDenied => FsError::PermissionDenied,
        }
    }
}

impl From<FsError> for HelloError {
    fn from(err: FsError) -> Self {
        match err {
            FsError::OutOfMemory | FsError::Busy => HelloError::AllocationFailure,
            FsError::AlreadyExists => HelloError::RegistrationConflict,
            FsError::Interrupted => HelloError::Interrupted,
            FsError::NoSpace => HelloError::OutOfSpace,
            FsError::NoDevice | FsError::NotFound => HelloError::NoDevice,
            FsError::PermissionDenied | FsError::BadFileDescriptor => {
                HelloError::PermissionDenied
            }
            _ => HelloError::InvalidArgument,
        }
    }
}
