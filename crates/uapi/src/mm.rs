//! 内存相关常量

/// 页大小
///
/// 文本接口（sysfs 属性、proc 文件）的单次读写缓冲区均以一页为上限。
pub const PAGE_SIZE: usize = 4096;
