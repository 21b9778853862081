//! 设备号编码
//!
//! 与 glibc `makedev(3)` 的 64 位布局一致：
//! major 的低 12 位位于 bit 8..20，高位位于 bit 44..64；
//! minor 的低 8 位位于 bit 0..8，高位位于 bit 20..44。

/// 由 major/minor 组合设备号
pub const fn makedev(major: u32, minor: u32) -> u64 {
    let major = major as u64;
    let minor = minor as u64;
    ((major & 0xffff_f000) << 32)
        | ((major & 0x0000_0fff) << 8)
        | ((minor & 0xffff_ff00) << 12)
        | (minor & 0x0000_00ff)
}

/// 取设备号的 major 部分
pub const fn major(dev: u64) -> u32 {
    (((dev >> 32) & 0xffff_f000) | ((dev >> 8) & 0x0000_0fff)) as u32
}

/// 取设备号的 minor 部分
pub const fn minor(dev: u64) -> u32 {
    (((dev >> 12) & 0xffff_ff00) | (dev & 0x0000_00ff)) as u32
}
