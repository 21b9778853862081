//! 启动内核模型，加载 hello 驱动并通过 HAL 演示三个访问面

use std::process::ExitCode;
use std::sync::Arc;

use hal::HalError;
use hello::{HelloConfig, HelloError, HelloModule};
use os::{Kernel, KernelConfig, Process};
use uapi::fcntl::OpenFlags;
use vfs::FsError;

#[derive(Debug, thiserror::Error)]
enum BootError {
    #[error("driver: {0}")]
    Driver(#[from] HelloError),
    #[error("hal: {0}")]
    Hal(#[from] HalError),
    #[error("syscall: {0}")]
    Syscall(#[from] FsError),
}

fn read_text(process: &Process, path: &str) -> Result<String, FsError> {
    let fd = process.sys_open(path, OpenFlags::O_RDONLY)?;
    let mut buf = [0u8; 64];
    let n = process.sys_read(fd, &mut buf);
    process.sys_close(fd)?;
    Ok(String::from_utf8_lossy(&buf[..n?]).into_owned())
}

fn write_text(process: &Process, path: &str, text: &str) -> Result<(), FsError> {
    let fd = process.sys_open(path, OpenFlags::O_WRONLY)?;
    let n = process.sys_write(fd, text.as_bytes());
    process.sys_close(fd)?;
    n.map(|_| ())
}

fn run(kernel: &Arc<Kernel>) -> Result<(), BootError> {
    let module = HelloModule::init(kernel.driver_ops(), HelloConfig::default())?;
    let process = kernel.spawn_process();

    {
        let device = hal::HelloModule::open(&process)?;
        device.set_val(42)?;
        log::info!(
            "/sys/class/hello/hello/val = {:?}",
            read_text(&process, "/sys/class/hello/hello/val")?
        );

        write_text(&process, "/proc/hello", "7\n")?;
        log::info!("/proc/hello = {:?}", read_text(&process, "/proc/hello")?);
        log::info!("HAL get_val = {}", device.get_val()?);
    }

    module.exit();

    match hal::HelloModule::open(&process) {
        Err(HalError::DeviceNotFound) => log::info!("/dev/hello removed after exit"),
        Err(e) => return Err(e.into()),
        Ok(_) => log::warn!("/dev/hello still present after exit"),
    }
    Ok(())
}

fn main() -> ExitCode {
    os::log::init();
    let kernel = Kernel::new(KernelConfig::default());
    match run(&kernel) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("boot failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
