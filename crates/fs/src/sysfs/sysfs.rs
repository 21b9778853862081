//! Sysfs 设备树：class -> device -> attribute

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use sync::SpinLock;
use uapi::fcntl::OpenFlags;
use vfs::{File, FsError};

use super::{AttrFile, DeviceAttribute};
use crate::check_name;

/// Sysfs 根（`/sys/class`）
#[derive(Default)]
pub struct SysFS {
    classes: SpinLock<BTreeMap<String, Arc<Class>>>,
}

/// 设备类（`/sys/class/<name>`）
pub struct Class {
    name: String,
    devices: SpinLock<BTreeMap<String, Arc<Device>>>,
}

/// 类下的设备（`/sys/class/<class>/<name>`）
pub struct Device {
    name: String,
    devt: u64,
    attrs: SpinLock<BTreeMap<String, Arc<dyn DeviceAttribute>>>,
}

impl fmt::Debug for SysFS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SysFS")
            .field("classes", &self.class_names())
            .finish()
    }
}

impl SysFS {
    /// 创建空的 sysfs
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建设备类，重名返回 [`FsError::AlreadyExists`]
    pub fn class_create(&self, name: &str) -> Result<Arc<Class>, FsError> {
        check_name(name)?;
        let mut classes = self.classes.lock();
        if classes.contains_key(name) {
            return Err(FsError::AlreadyExists);
        }
        let class = Arc::new(Class {
            name: name.to_string(),
            devices: SpinLock::new(BTreeMap::new()),
        });
        classes.insert(name.to_string(), class.clone());
        Ok(class)
    }

    /// 销毁设备类及其下所有设备，不存在时返回 `false`
    pub fn class_destroy(&self, name: &str) -> bool {
        self.classes.lock().remove(name).is_some()
    }

    /// 查找设备类
    pub fn class(&self, name: &str) -> Option<Arc<Class>> {
        self.classes.lock().get(name).cloned()
    }

    /// 列出所有设备类名
    pub fn class_names(&self) -> Vec<String> {
        self.classes.lock().keys().cloned().collect()
    }

    /// 查找 `/sys/class/<class>/<device>/<attr>`
    pub fn lookup_attr(
        &self,
        class: &str,
        device: &str,
        attr: &str,
    ) -> Result<Arc<dyn DeviceAttribute>, FsError> {
        self.class(class)
            .and_then(|c| c.device(device))
            .and_then(|d| d.attribute(attr))
            .ok_or(FsError::NotFound)
    }

    /// 按相对 `/sys` 的路径打开属性文件，例如 `class/hello/hello/val`
    pub fn open(&self, path: &str, flags: OpenFlags) -> Result<Arc<dyn File>, FsError> {
        let mut parts = path.split('/').filter(|p| !p.is_empty());
        let (Some("class"), Some(class), Some(device), Some(attr), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(FsError::NotFound);
        };
        let attr = self.lookup_attr(class, device, attr)?;
        Ok(Arc::new(AttrFile::open(attr, flags)?))
    }
}

impl Class {
    /// 类名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 在类下创建设备，重名返回 [`FsError::AlreadyExists`]
    pub fn device_create(&self, devt: u64, name: &str) -> Result<Arc<Device>, FsError> {
        check_name(name)?;
        let mut devices = self.devices.lock();
        if devices.contains_key(name) {
            return Err(FsError::AlreadyExists);
        }
        let device = Arc::new(Device {
            name: name.to_string(),
            devt,
            attrs: SpinLock::new(BTreeMap::new()),
        });
        devices.insert(name.to_string(), device.clone());
        Ok(device)
    }

    /// 按设备号销毁设备（与 Linux `device_destroy` 一致），不存在时返回 `false`
    pub fn device_destroy(&self, devt: u64) -> bool {
        let mut devices = self.devices.lock();
        let before = devices.len();
        devices.retain(|_, d| d.devt != devt);
        before != devices.len()
    }

    /// 按名字查找设备
    pub fn device(&self, name: &str) -> Option<Arc<Device>> {
        self.devices.lock().get(name).cloned()
    }
}

impl Device {
    /// 设备名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 设备号
    pub fn devt(&self) -> u64 {
        self.devt
    }

    /// 挂载属性文件，重名返回 [`FsError::AlreadyExists`]
    pub fn create_file(&self, attr: Arc<dyn DeviceAttribute>) -> Result<(), FsError> {
        check_name(attr.name())?;
        let mut attrs = self.attrs.lock();
        if attrs.contains_key(attr.name()) {
            return Err(FsError::AlreadyExists);
        }
        attrs.insert(attr.name().to_string(), attr);
        Ok(())
    }

    /// 移除属性文件 `attr`，同名属性若已是另一个对象则保持不动并返回 `false`
    pub fn remove_file(&self, attr: &Arc<dyn DeviceAttribute>) -> bool {
        let mut attrs = self.attrs.lock();
        if !attrs.get(attr.name()).is_some_and(|a| Arc::ptr_eq(a, attr)) {
            return false;
        }
        attrs.remove(attr.name());
        true
    }

    /// 查找属性
    pub fn attribute(&self, name: &str) -> Option<Arc<dyn DeviceAttribute>> {
        self.attrs.lock().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sync::CancelToken;

    struct Fixed(&'static str, u16);

    impl DeviceAttribute for Fixed {
        fn name(&self) -> &str {
            "val"
        }
        fn mode(&self) -> u16 {
            self.1
        }
        fn show(&self, page: &mut [u8], _cancel: &CancelToken) -> Result<usize, FsError> {
            page[..self.0.len()].copy_from_slice(self.0.as_bytes());
            Ok(self.0.len())
        }
        fn store(&self, buf: &[u8], _cancel: &CancelToken) -> Result<usize, FsError> {
            Ok(buf.len())
        }
    }

    fn tree(mode: u16) -> SysFS {
        let sysfs = SysFS::new();
        let class = sysfs.class_create("hello").unwrap();
        let dev = class.device_create(42, "hello").unwrap();
        dev.create_file(Arc::new(Fixed("12\n", mode))).unwrap();
        sysfs
    }

    #[test]
    fn class_name_collision() {
        let sysfs = SysFS::new();
        sysfs.class_create("hello").unwrap();
        assert_eq!(sysfs.class_create("hello").err(), Some(FsError::AlreadyExists));
        assert!(sysfs.class_destroy("hello"));
        assert!(!sysfs.class_destroy("hello"));
    }

    #[test]
    fn device_and_attribute_collisions() {
        let sysfs = tree(0o644);
        let class = sysfs.class("hello").unwrap();
        assert_eq!(class.device_create(43, "hello").err(), Some(FsError::AlreadyExists));
        let dev = class.device("hello").unwrap();
        assert_eq!(
            dev.create_file(Arc::new(Fixed("", 0o644))),
            Err(FsError::AlreadyExists)
        );
        assert!(class.device_destroy(42));
        assert!(!class.device_destroy(42));
    }

    #[test]
    fn remove_file_matches_the_attribute_object() {
        let sysfs = tree(0o644);
        let dev = sysfs.class("hello").unwrap().device("hello").unwrap();
        let ours = dev.attribute("val").unwrap();
        let stranger: Arc<dyn DeviceAttribute> = Arc::new(Fixed("1\n", 0o644));
        assert!(!dev.remove_file(&stranger));
        assert!(dev.attribute("val").is_some());
        assert!(dev.remove_file(&ours));
        assert!(!dev.remove_file(&ours));
        assert!(dev.attribute("val").is_none());
    }

    #[test]
    fn open_reads_once_then_eof() {
        let sysfs = tree(0o644);
        let file = sysfs.open("class/hello/hello/val", OpenFlags::O_RDONLY).unwrap();
        let cancel = CancelToken::new();
        let mut buf = [0u8; 16];
        assert_eq!(file.read(&mut buf, &cancel), Ok(3));
        assert_eq!(&buf[..3], b"12\n");
        assert_eq!(file.read(&mut buf, &cancel), Ok(0));
    }

    struct Counter {
        value: core::sync::atomic::AtomicI32,
        shows: core::sync::atomic::AtomicUsize,
    }

    impl DeviceAttribute for Counter {
        fn name(&self) -> &str {
            "val"
        }
        fn mode(&self) -> u16 {
            0o644
        }
        fn show(&self, page: &mut [u8], _cancel: &CancelToken) -> Result<usize, FsError> {
            use core::fmt::Write;
            use core::sync::atomic::Ordering;
            self.shows.fetch_add(1, Ordering::Relaxed);
            let mut text = String::new();
            let _ = writeln!(text, "{}", self.value.load(Ordering::Relaxed));
            page[..text.len()].copy_from_slice(text.as_bytes());
            Ok(text.len())
        }
        fn store(&self, buf: &[u8], _cancel: &CancelToken) -> Result<usize, FsError> {
            Ok(buf.len())
        }
    }

    #[test]
    fn partial_reads_see_one_value() {
        use core::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

        let sysfs = SysFS::new();
        let dev = sysfs
            .class_create("hello")
            .unwrap()
            .device_create(42, "hello")
            .unwrap();
        let counter = Arc::new(Counter {
            value: AtomicI32::new(42),
            shows: AtomicUsize::new(0),
        });
        dev.create_file(counter.clone()).unwrap();

        let file = sysfs.open("class/hello/hello/val", OpenFlags::O_RDONLY).unwrap();
        let cancel = CancelToken::new();
        let mut text = Vec::new();
        let mut byte = [0u8; 1];
        assert_eq!(file.read(&mut byte, &cancel), Ok(1));
        text.push(byte[0]);

        counter.value.store(7, Ordering::Relaxed);
        while file.read(&mut byte, &cancel).unwrap() == 1 {
            text.push(byte[0]);
        }
        assert_eq!(text, b"42\n");
        assert_eq!(file.read(&mut byte, &cancel), Ok(0));
        assert_eq!(counter.shows.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn open_checks_mode() {
        let sysfs = tree(0o444);
        assert_eq!(
            sysfs.open("class/hello/hello/val", OpenFlags::O_WRONLY).err(),
            Some(FsError::PermissionDenied)
        );
        assert_eq!(
            sysfs.open("class/hello/hello/none", OpenFlags::O_RDONLY).err(),
            Some(FsError::NotFound)
        );
        assert_eq!(
            sysfs.open("class/hello/hello", OpenFlags::O_RDONLY).err(),
            Some(FsError::NotFound)
        );
    }
}
