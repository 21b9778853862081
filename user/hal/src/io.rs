//! 系统调用接口

use std::rc::Rc;
use std::sync::Arc;

use uapi::fcntl::OpenFlags;

/// HAL 使用的最小系统调用集合，错误以正的 errno 返回
pub trait DeviceIo {
    /// `open(2)`
    fn open(&self, path: &str, flags: OpenFlags) -> Result<usize, i32>;
    /// `read(2)`
    fn read(&self, fd: usize, buf: &mut [u8]) -> Result<usize, i32>;
    /// `write(2)`
    fn write(&self, fd: usize, buf: &[u8]) -> Result<usize, i32>;
    /// `close(2)`
    fn close(&self, fd: usize) -> Result<(), i32>;
}

macro_rules! forward_device_io {
    ($($ptr:ty),*) => {
        $(
            impl<T: DeviceIo + ?Sized> DeviceIo for $ptr {
                fn open(&self, path: &str, flags: OpenFlags) -> Result<usize, i32> {
                    (**self).open(path, flags)
                }
                fn read(&self, fd: usize, buf: &mut [u8]) -> Result<usize, i32> {
                    (**self).read(fd, buf)
                }
                fn write(&self, fd: usize, buf: &[u8]) -> Result<usize, i32> {
                    (**self).write(fd, buf)
                }
                fn close(&self, fd: usize) -> Result<(), i32> {
                    (**self).close(fd)
                }
            }
        )*
    };
}

forward_device_io!(&T, Box<T>, Rc<T>, Arc<T>);
