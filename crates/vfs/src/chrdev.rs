//! 字符设备号区间与 cdev 绑定表
//!
//! 对应 Linux 中 `alloc_chrdev_region` / `cdev_add` 两层注册：
//!
//! - 设备号区间（region）只表示“这段号码归谁所有”
//! - cdev 绑定把一段号码接到具体的 [`CharDriver`] 上，打开设备节点时据此查找驱动

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::RangeInclusive;
use sync::SpinLock;

use crate::dev::{major, makedev, minor};
use crate::{CharDriver, FsError};

/// 标准字符设备 major 号
pub mod chrdev_major {
    /// 动态分配区间的下界（含）
    pub const DYNAMIC_FIRST: u32 = 234;
    /// 动态分配区间的上界（含）
    pub const DYNAMIC_LAST: u32 = 254;
}

/// 一段已登记的字符设备号区间
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharDevRegion {
    /// 起始设备号
    pub base: u64,
    /// 连续的 minor 数量
    pub count: u32,
    /// 持有者名字
    pub name: String,
}

impl CharDevRegion {
    fn overlaps(&self, base: u64, count: u32) -> bool {
        ranges_overlap(self.base, self.count, base, count)
    }
}

fn ranges_overlap(a: u64, a_count: u32, b: u64, b_count: u32) -> bool {
    if major(a) != major(b) {
        return false;
    }
    let (a_lo, b_lo) = (minor(a) as u64, minor(b) as u64);
    a_lo < b_lo + b_count as u64 && b_lo < a_lo + a_count as u64
}

struct CdevBinding {
    count: u32,
    driver: Arc<dyn CharDriver>,
}

/// 字符设备注册表
pub struct ChrdevTable {
    dynamic_majors: RangeInclusive<u32>,
    regions: SpinLock<Vec<CharDevRegion>>,
    cdevs: SpinLock<BTreeMap<u64, CdevBinding>>,
}

impl fmt::Debug for ChrdevTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChrdevTable")
            .field("dynamic_majors", &self.dynamic_majors)
            .field("regions", &self.regions.lock().len())
            .field("cdevs", &self.cdevs.lock().len())
            .finish()
    }
}

impl ChrdevTable {
    /// 使用 Linux 默认动态 major 区间创建注册表
    pub fn new() -> Self {
        Self::with_dynamic_majors(chrdev_major::DYNAMIC_FIRST..=chrdev_major::DYNAMIC_LAST)
    }

    /// 指定动态 major 区间创建注册表
    pub fn with_dynamic_majors(dynamic_majors: RangeInclusive<u32>) -> Self {
        Self {
            dynamic_majors,
            regions: SpinLock::new(Vec::new()),
            cdevs: SpinLock::new(BTreeMap::new()),
        }
    }

    /// 动态分配一个 major，并登记 `[first_minor, first_minor + count)` 区间
    ///
    /// 与 Linux 一致，从区间高端向低端查找第一个完全空闲的 major。
    /// 区间耗尽时返回 [`FsError::Busy`]。
    pub fn alloc_region(&self, first_minor: u32, count: u32, name: &str) -> Result<u64, FsError> {
        if count == 0 {
            return Err(FsError::InvalidArgument);
        }
        let mut regions = self.regions.lock();
        let free = self
            .dynamic_majors
            .clone()
            .rev()
            .find(|&maj| regions.iter().all(|r| major(r.base) != maj));

        let Some(maj) = free else {
            log::warn!("chrdev: no free dynamic major for {}", name);
            return Err(FsError::Busy);
        };

        let base = makedev(maj, first_minor);
        regions.push(CharDevRegion {
            base,
            count,
            name: String::from(name),
        });
        log::debug!("chrdev: allocated {}:{} (+{}) for {}", maj, first_minor, count, name);
        Ok(base)
    }

    /// 注销设备号区间，不存在时静默返回 `false`
    pub fn unregister_region(&self, base: u64, count: u32) -> bool {
        let mut regions = self.regions.lock();
        let before = regions.len();
        regions.retain(|r| !(r.base == base && r.count == count));
        before != regions.len()
    }

    /// 查询覆盖 `dev` 的已登记区间
    pub fn region_of(&self, dev: u64) -> Option<CharDevRegion> {
        self.regions
            .lock()
            .iter()
            .find(|r| r.overlaps(dev, 1))
            .cloned()
    }

    /// 把 `[base, base + count)` 绑定到驱动
    ///
    /// 与已有绑定重叠时返回 [`FsError::AlreadyExists`]。
    pub fn cdev_add(
        &self,
        base: u64,
        count: u32,
        driver: Arc<dyn CharDriver>,
    ) -> Result<(), FsError> {
        if count == 0 {
            return Err(FsError::InvalidArgument);
        }
        let mut cdevs = self.cdevs.lock();
        if cdevs
            .iter()
            .any(|(&b, binding)| ranges_overlap(b, binding.count, base, count))
        {
            return Err(FsError::AlreadyExists);
        }
        cdevs.insert(base, CdevBinding { count, driver });
        Ok(())
    }

    /// 解除绑定，不存在时静默返回 `false`
    ///
    /// 已打开的文件持有自己的引用，不受影响。
    pub fn cdev_del(&self, base: u64) -> bool {
        self.cdevs.lock().remove(&base).is_some()
    }

    /// 查找设备号对应的驱动
    pub fn lookup(&self, dev: u64) -> Option<Arc<dyn CharDriver>> {
        self.cdevs
            .lock()
            .iter()
            .find(|&(&b, binding)| ranges_overlap(b, binding.count, dev, 1))
            .map(|(_, binding)| binding.driver.clone())
    }
}

impl Default for ChrdevTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, OpenFlags};

    struct NullDriver;

    impl CharDriver for NullDriver {
        fn open(&self, _dev: u64, _flags: OpenFlags) -> Result<Arc<dyn File>, FsError> {
            Err(FsError::NoDevice)
        }
    }

    #[test]
    fn alloc_region_takes_highest_free_major() {
        let table = ChrdevTable::with_dynamic_majors(240..=242);
        let a = table.alloc_region(0, 1, "a").unwrap();
        let b = table.alloc_region(0, 1, "b").unwrap();
        assert_eq!(major(a), 242);
        assert_eq!(major(b), 241);
    }

    #[test]
    fn alloc_region_exhausted_is_busy() {
        let table = ChrdevTable::with_dynamic_majors(240..=240);
        table.alloc_region(0, 1, "a").unwrap();
        assert_eq!(table.alloc_region(0, 1, "b"), Err(FsError::Busy));
    }

    #[test]
    fn released_major_is_reused() {
        let table = ChrdevTable::with_dynamic_majors(240..=240);
        let base = table.alloc_region(0, 1, "a").unwrap();
        assert!(table.unregister_region(base, 1));
        assert!(!table.unregister_region(base, 1));
        assert_eq!(table.alloc_region(0, 1, "b"), Ok(base));
    }

    #[test]
    fn region_of_covers_every_minor() {
        let table = ChrdevTable::with_dynamic_majors(240..=240);
        let base = table.alloc_region(2, 4, "hello").unwrap();
        assert_eq!(table.region_of(makedev(240, 5)).unwrap().name, "hello");
        assert!(table.region_of(makedev(240, 1)).is_none());
        assert!(table.region_of(makedev(240, 6)).is_none());
        assert!(table.unregister_region(base, 4));
        assert!(table.region_of(base).is_none());
    }

    #[test]
    fn cdev_add_twice_conflicts() {
        let table = ChrdevTable::new();
        let base = makedev(250, 0);
        table.cdev_add(base, 1, Arc::new(NullDriver)).unwrap();
        assert_eq!(
            table.cdev_add(base, 1, Arc::new(NullDriver)).err(),
            Some(FsError::AlreadyExists)
        );
        assert!(table.lookup(base).is_some());
        assert!(table.lookup(makedev(250, 1)).is_none());

        assert!(table.cdev_del(base));
        assert!(!table.cdev_del(base));
        assert!(table.lookup(base).is_none());
    }
}
