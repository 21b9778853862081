//! 错误码定义
//!
//! 数值与 Linux `asm-generic/errno-base.h` 保持一致。

pub const EPERM: i32 = 1;
pub const ENOENT: i32 = 2;
pub const EINTR: i32 = 4;
pub const EIO: i32 = 5;
pub const ENXIO: i32 = 6;
pub const EBADF: i32 = 9;
pub const EAGAIN: i32 = 11;
pub const ENOMEM: i32 = 12;
pub const EACCES: i32 = 13;
pub const EFAULT: i32 = 14;
pub const EBUSY: i32 = 16;
pub const EEXIST: i32 = 17;
pub const ENODEV: i32 = 19;
pub const ENOTDIR: i32 = 20;
pub const EISDIR: i32 = 21;
pub const EINVAL: i32 = 22;
pub const EMFILE: i32 = 24;
pub const ENOSPC: i32 = 28;
pub const EROFS: i32 = 30;
pub const ENAMETOOLONG: i32 = 36;
pub const ENOTSUP: i32 = 95;

/// 内核内部使用的“可重启系统调用”错误码，返回用户态前会被转换为 `EINTR`
pub const ERESTARTSYS: i32 = 512;

/// 将内核内部错误码折叠为用户态可见的错误码
pub const fn user_visible(errno: i32) -> i32 {
    match errno {
        ERESTARTSYS => EINTR,
        other => other,
    }
}
