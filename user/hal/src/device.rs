//! 模块描述与设备句柄

use core::mem::size_of;

use uapi::fcntl::OpenFlags;

use crate::{DeviceIo, HELLO_HARDWARE_MODULE_ID, HalError};

const LOG_TAG: &str = "HelloStub";
const VAL_SIZE: usize = size_of::<i32>();

/// 硬件模块描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    /// 模块 id
    pub id: &'static str,
    /// 模块名
    pub name: &'static str,
    /// 作者
    pub author: &'static str,
    /// 主版本号
    pub version_major: u16,
    /// 次版本号
    pub version_minor: u16,
}

/// hello 硬件模块
#[derive(Debug, Clone, Copy)]
pub struct HelloModule;

impl HelloModule {
    /// 模块描述
    pub const INFO: ModuleInfo = ModuleInfo {
        id: HELLO_HARDWARE_MODULE_ID,
        name: "Hello",
        author: "Richie",
        version_major: 1,
        version_minor: 0,
    };

    /// 设备节点路径
    pub const DEVICE_NAME: &'static str = "/dev/hello";

    /// 打开 hello 设备
    pub fn open<D: DeviceIo>(io: D) -> Result<HelloDevice<D>, HalError> {
        Self::open_device(io, HELLO_HARDWARE_MODULE_ID)
    }

    /// 按设备名打开，名字必须是本模块的 id
    pub fn open_device<D: DeviceIo>(io: D, name: &str) -> Result<HelloDevice<D>, HalError> {
        if name != Self::INFO.id {
            log::error!(target: LOG_TAG, "unknown device {}", name);
            return Err(HalError::UnknownDevice);
        }

        let fd = io.open(Self::DEVICE_NAME, OpenFlags::O_RDWR).map_err(|errno| {
            log::error!(target: LOG_TAG, "failed to open {} -- errno {}", Self::DEVICE_NAME, errno);
            HalError::from_open_errno(errno)
        })?;

        log::info!(target: LOG_TAG, "open {} successfully.", Self::DEVICE_NAME);
        Ok(HelloDevice { io, fd: Some(fd) })
    }
}

/// 打开的 hello 设备，丢弃时自动关闭
#[derive(Debug)]
pub struct HelloDevice<D: DeviceIo> {
    io: D,
    fd: Option<usize>,
}

impl<D: DeviceIo> HelloDevice<D> {
    /// 写寄存器
    pub fn set_val(&self, val: i32) -> Result<(), HalError> {
        log::info!(target: LOG_TAG, "set val {} to device.", val);
        let n = self
            .io
            .write(self.fd()?, &val.to_ne_bytes())
            .map_err(HalError::from_errno)?;
        if n != VAL_SIZE {
            return Err(HalError::ShortTransfer {
                expected: VAL_SIZE,
                actual: n,
            });
        }
        Ok(())
    }

    /// 读寄存器
    pub fn get_val(&self) -> Result<i32, HalError> {
        let mut buf = [0u8; VAL_SIZE];
        let n = self
            .io
            .read(self.fd()?, &mut buf)
            .map_err(HalError::from_errno)?;
        if n != VAL_SIZE {
            return Err(HalError::ShortTransfer {
                expected: VAL_SIZE,
                actual: n,
            });
        }
        let val = i32::from_ne_bytes(buf);
        log::info!(target: LOG_TAG, "get value {} from device", val);
        Ok(val)
    }

    /// 关闭设备
    pub fn close(mut self) -> Result<(), HalError> {
        self.close_fd()
    }

    fn fd(&self) -> Result<usize, HalError> {
        self.fd.ok_or(HalError::Io(uapi::errno::EBADF))
    }

    fn close_fd(&mut self) -> Result<(), HalError> {
        match self.fd.take() {
            Some(fd) => self.io.close(fd).map_err(HalError::from_errno),
            None => Ok(()),
        }
    }
}

impl<D: DeviceIo> Drop for HelloDevice<D> {
    fn drop(&mut self) {
        if let Err(e) = self.close_fd() {
            log::warn!(target: LOG_TAG, "close on drop failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use uapi::errno::{EBADF, ENOENT, ERESTARTSYS};

    /// 只认识 `/dev/hello` 的假内核
    #[derive(Default)]
    struct FakeKernel {
        present: bool,
        reg: RefCell<[u8; 4]>,
        open: RefCell<BTreeMap<usize, OpenFlags>>,
        next_fd: RefCell<usize>,
        fail_reads: Option<i32>,
    }

    impl FakeKernel {
        fn with_device() -> Self {
            Self {
                present: true,
                ..Default::default()
            }
        }
    }

    impl DeviceIo for FakeKernel {
        fn open(&self, path: &str, flags: OpenFlags) -> Result<usize, i32> {
            if !self.present || path != "/dev/hello" {
                return Err(ENOENT);
            }
            let mut next = self.next_fd.borrow_mut();
            let fd = *next;
            *next += 1;
            self.open.borrow_mut().insert(fd, flags);
            Ok(fd)
        }

        fn read(&self, fd: usize, buf: &mut [u8]) -> Result<usize, i32> {
            if let Some(errno) = self.fail_reads {
                return Err(errno);
            }
            if !self.open.borrow().contains_key(&fd) {
                return Err(EBADF);
            }
            if buf.len() < 4 {
                return Ok(0);
            }
            buf[..4].copy_from_slice(&*self.reg.borrow());
            Ok(4)
        }

        fn write(&self, fd: usize, buf: &[u8]) -> Result<usize, i32> {
            if !self.open.borrow().contains_key(&fd) {
                return Err(EBADF);
            }
            let Ok(bytes) = <[u8; 4]>::try_from(buf) else {
                return Ok(0);
            };
            *self.reg.borrow_mut() = bytes;
            Ok(4)
        }

        fn close(&self, fd: usize) -> Result<(), i32> {
            self.open.borrow_mut().remove(&fd).map(|_| ()).ok_or(EBADF)
        }
    }

    #[test]
    fn module_info() {
        assert_eq!(HelloModule::INFO.id, "hello");
        assert_eq!(HelloModule::INFO.name, "Hello");
        assert_eq!((HelloModule::INFO.version_major, HelloModule::INFO.version_minor), (1, 0));
    }

    #[test]
    fn set_then_get() {
        let kernel = FakeKernel::with_device();
        let dev = HelloModule::open(&kernel).unwrap();
        dev.set_val(-5).unwrap();
        assert_eq!(dev.get_val(), Ok(-5));
        assert_eq!(kernel.open.borrow().values().next(), Some(&OpenFlags::O_RDWR));
        dev.close().unwrap();
        assert!(kernel.open.borrow().is_empty());
    }

    #[test]
    fn drop_closes_fd() {
        let kernel = FakeKernel::with_device();
        {
            let _dev = HelloModule::open(&kernel).unwrap();
            assert_eq!(kernel.open.borrow().len(), 1);
        }
        assert!(kernel.open.borrow().is_empty());
    }

    #[test]
    fn missing_node_is_device_not_found() {
        let kernel = FakeKernel::default();
        assert_eq!(
            HelloModule::open(&kernel).err(),
            Some(HalError::DeviceNotFound)
        );
    }

    #[test]
    fn unknown_device_name() {
        let kernel = FakeKernel::with_device();
        assert_eq!(
            HelloModule::open_device(&kernel, "world").err(),
            Some(HalError::UnknownDevice)
        );
        assert!(kernel.open.borrow().is_empty());
    }

    #[test]
    fn restartable_errno_surfaces_as_eintr() {
        let kernel = FakeKernel {
            present: true,
            fail_reads: Some(ERESTARTSYS),
            ..Default::default()
        };
        let dev = HelloModule::open(&kernel).unwrap();
        assert_eq!(dev.get_val(), Err(HalError::Io(uapi::errno::EINTR)));
        assert_eq!(HalError::Io(4).to_errno(), -4);
    }
}
