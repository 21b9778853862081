//! VFS 错误类型
//!
//! 定义了与 POSIX 兼容的文件系统错误码，可通过 [`FsError::to_errno()`] 转换为系统调用错误码。

/// VFS 错误类型
///
/// 各错误码对应标准 POSIX errno 值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FsError {
    // 文件相关
    /// 文件不存在 (-ENOENT)
    #[error("no such file or directory")]
    NotFound,
    /// 文件已存在 (-EEXIST)
    #[error("file exists")]
    AlreadyExists,

    // 权限相关
    /// 权限被拒绝 (-EACCES)
    #[error("permission denied")]
    PermissionDenied,

    // 文件描述符相关
    /// 无效的文件描述符 (-EBADF)
    #[error("bad file descriptor")]
    BadFileDescriptor,
    /// 打开的文件过多 (-EMFILE)
    #[error("too many open files")]
    TooManyOpenFiles,

    // 参数相关
    /// 无效参数 (-EINVAL)
    #[error("invalid argument")]
    InvalidArgument,
    /// 文件名过长 (-ENAMETOOLONG)
    #[error("file name too long")]
    NameTooLong,

    // 资源相关
    /// 设备空间不足 (-ENOSPC)
    #[error("no space left on device")]
    NoSpace,
    /// 内存不足 (-ENOMEM)
    #[error("out of memory")]
    OutOfMemory,
    /// 设备或资源忙 (-EBUSY)
    #[error("device or resource busy")]
    Busy,
    /// 设备不存在 (-ENODEV)
    #[error("no such device")]
    NoDevice,

    // 调度相关
    /// 等待期间被打断，系统调用可重启 (-ERESTARTSYS)
    #[error("interrupted system call")]
    Interrupted,
}

impl FsError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        use uapi::errno::*;

        let errno = match self {
            FsError::NotFound => ENOENT,
            FsError::AlreadyExists => EEXIST,
            FsError::PermissionDenied => EACCES,
            FsError::BadFileDescriptor => EBADF,
            FsError::TooManyOpenFiles => EMFILE,
            FsError::InvalidArgument => EINVAL,
            FsError::NameTooLong => ENAMETOOLONG,
            FsError::NoSpace => ENOSPC,
            FsError::OutOfMemory => ENOMEM,
            FsError::Busy => EBUSY,
            FsError::NoDevice => ENODEV,
            FsError::Interrupted => ERESTARTSYS,
        };
        -(errno as isize)
    }
}

impl From<sync::Interrupted> for FsError {
    fn from(_: sync::Interrupted) -> Self {
        FsError::Interrupted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_values_match_linux() {
        assert_eq!(FsError::NotFound.to_errno(), -2);
        assert_eq!(FsError::AlreadyExists.to_errno(), -17);
        assert_eq!(FsError::NoDevice.to_errno(), -19);
        assert_eq!(FsError::InvalidArgument.to_errno(), -22);
        assert_eq!(FsError::NoSpace.to_errno(), -28);
        assert_eq!(FsError::Interrupted.to_errno(), -512);
    }
}
