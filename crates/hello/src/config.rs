//! 驱动配置
//!
//! 名字与权限位沿用 Linux 上该驱动的惯例，均可通过 [`HelloConfig`] 覆盖。

/// 设备号区间登记名
pub const DEVICE_NODE_NAME: &str = "hello";
/// `/dev` 与 sysfs 下的设备名
pub const DEVICE_FILE_NAME: &str = "hello";
/// sysfs 设备类名
pub const DEVICE_CLASS_NAME: &str = "hello";
/// `/proc` 条目名
pub const DEVICE_PROC_NAME: &str = "hello";
/// 属性文件名
pub const ATTR_NAME: &str = "val";
/// 属性文件权限（`S_IRUGO | S_IWUSR`）
pub const ATTR_MODE: u16 = 0o644;
/// proc 条目权限
pub const PROC_MODE: u16 = 0o644;
/// 起始 minor
pub const FIRST_MINOR: u32 = 0;
/// 占用的 minor 数量
pub const MINOR_COUNT: u32 = 1;

/// 模块初始化参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelloConfig {
    /// 设备号区间登记名
    pub node_name: &'static str,
    /// `/dev` 与 sysfs 下的设备名
    pub file_name: &'static str,
    /// sysfs 设备类名
    pub class_name: &'static str,
    /// `/proc` 条目名
    pub proc_name: &'static str,
    /// 起始 minor
    pub first_minor: u32,
    /// 占用的 minor 数量
    pub minor_count: u32,
}

impl Default for HelloConfig {
    fn default() -> Self {
        Self {
            node_name: DEVICE_NODE_NAME,
            file_name: DEVICE_FILE_NAME,
            class_name: DEVICE_CLASS_NAME,
            proc_name: DEVICE_PROC_NAME,
            first_minor: FIRST_MINOR,
            minor_count: MINOR_COUNT,
        }
    }
}
