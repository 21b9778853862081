//! 用户进程与系统调用入口

use std::sync::Arc;

use hal::DeviceIo;
use sync::CancelToken;
use uapi::errno::user_visible;
use uapi::fcntl::OpenFlags;
use vfs::{FDTable, FsError};

use crate::Kernel;

/// 用户进程
///
/// 每个进程有自己的文件描述符表和取消令牌；取消令牌相当于“有待处理的信号”，
/// 会打断该进程阻塞中的系统调用。
#[derive(Debug)]
pub struct Process {
    pid: usize,
    kernel: Arc<Kernel>,
    fd_table: FDTable,
    cancel: CancelToken,
}

impl Process {
    pub(crate) fn new(pid: usize, kernel: Arc<Kernel>) -> Self {
        let max_fds = kernel.config().max_fds;
        Self {
            pid,
            kernel,
            fd_table: FDTable::new(max_fds),
            cancel: CancelToken::new(),
        }
    }

    /// 进程号
    pub fn pid(&self) -> usize {
        self.pid
    }

    /// 向进程投递信号，打断其阻塞中的系统调用
    pub fn signal(&self) {
        self.cancel.cancel();
    }

    /// 信号已处理，之后的系统调用可以正常阻塞
    pub fn clear_signal(&self) {
        self.cancel.reset();
    }

    /// `open(2)`
    pub fn sys_open(&self, path: &str, flags: OpenFlags) -> Result<usize, FsError> {
        let file = self.kernel.open(path, flags)?;
        let fd = self.fd_table.alloc(file)?;
        log::debug!("pid {}: open {} -> fd {}", self.pid, path, fd);
        Ok(fd)
    }

    /// `read(2)`
    pub fn sys_read(&self, fd: usize, buf: &mut [u8]) -> Result<usize, FsError> {
        let file = self.fd_table.get(fd)?;
        file.read(buf, &self.cancel)
    }

    /// `write(2)`
    pub fn sys_write(&self, fd: usize, buf: &[u8]) -> Result<usize, FsError> {
        let file = self.fd_table.get(fd)?;
        file.write(buf, &self.cancel)
    }

    /// `close(2)`
    pub fn sys_close(&self, fd: usize) -> Result<(), FsError> {
        self.fd_table.close(fd)
    }
}

impl Drop for Process {
    fn drop(&mut self) {
        self.fd_table.close_all();
    }
}

/// 返回用户态前把内核错误转换为正的 errno
fn errno(err: FsError) -> i32 {
    user_visible((-err.to_errno()) as i32)
}

impl DeviceIo for Process {
    fn open(&self, path: &str, flags: OpenFlags) -> Result<usize, i32> {
        self.sys_open(path, flags).map_err(errno)
    }

    fn read(&self, fd: usize, buf: &mut [u8]) -> Result<usize, i32> {
        self.sys_read(fd, buf).map_err(errno)
    }

    fn write(&self, fd: usize, buf: &[u8]) -> Result<usize, i32> {
        self.sys_write(fd, buf).map_err(errno)
    }

    fn close(&self, fd: usize) -> Result<(), i32> {
        self.sys_close(fd).map_err(errno)
    }
}
