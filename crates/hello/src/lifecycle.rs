//! 模块生命周期
//!
//! 初始化按固定顺序执行，每完成一步就压入对应的撤销动作：
//!
//! ```text
//! 分配设备号 -> 分配寄存器 -> cdev_add -> 创建类 -> 创建设备 -> 挂载属性 -> 创建 proc 条目
//! ```
//!
//! 任一致命步骤失败时逆序执行已压入的撤销动作并返回该步的错误。
//! 卸载（[`HelloModule::exit`] 或 `Drop`）同样逆序弹出全部撤销动作。
//! proc 条目创建失败只记录警告，不影响模块进入 [`LifecycleState::Running`]。

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::mem::size_of;

use fs::{DeviceAttribute, ProcOps};

use crate::config::PROC_MODE;
use crate::surface::{HelloCharDriver, HelloProcOps, ValAttribute};
use crate::{DriverOps, HelloConfig, HelloError, RegisterStore};

/// 生命周期状态，按初始化顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    /// 尚未开始或已完全卸载
    Unstarted,
    /// 设备号已分配
    IdentityAllocated,
    /// 寄存器已分配并置 0
    StoreReady,
    /// cdev 已绑定
    CharDevRegistered,
    /// 设备类已创建
    ClassCreated,
    /// 设备及 `/dev` 节点已创建
    NodeCreated,
    /// 属性文件已挂载
    AttributeAttached,
    /// proc 条目已创建
    ProcEntryCreated,
    /// 初始化完成
    Running,
}

type Undo = Box<dyn FnOnce(&dyn DriverOps) + Send + Sync>;

/// 已完成步骤的撤销栈，丢弃时逆序执行
struct UndoStack {
    ops: Arc<dyn DriverOps>,
    steps: Vec<(LifecycleState, Undo)>,
}

impl UndoStack {
    fn new(ops: Arc<dyn DriverOps>) -> Self {
        Self {
            ops,
            steps: Vec::new(),
        }
    }

    fn push(&mut self, state: LifecycleState, undo: impl FnOnce(&dyn DriverOps) + Send + Sync + 'static) {
        self.steps.push((state, Box::new(undo)));
    }

    fn top(&self) -> LifecycleState {
        self.steps
            .last()
            .map_or(LifecycleState::Unstarted, |(state, _)| *state)
    }

    fn contains(&self, state: LifecycleState) -> bool {
        self.steps.iter().any(|(s, _)| *s == state)
    }

    fn unwind(&mut self) {
        while let Some((state, undo)) = self.steps.pop() {
            log::debug!("hello: undo {:?}", state);
            undo(self.ops.as_ref());
        }
    }
}

impl Drop for UndoStack {
    fn drop(&mut self) {
        self.unwind();
    }
}

/// 已加载的 hello 模块
pub struct HelloModule {
    config: HelloConfig,
    devt: u64,
    store: Arc<RegisterStore>,
    state: LifecycleState,
    undo: UndoStack,
}

impl fmt::Debug for HelloModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelloModule")
            .field("config", &self.config)
            .field("devt", &self.devt)
            .field("state", &self.state)
            .field("completed", &self.undo.top())
            .finish()
    }
}

impl HelloModule {
    /// 加载模块
    pub fn init(ops: Arc<dyn DriverOps>, config: HelloConfig) -> Result<Self, HelloError> {
        log::info!("Initializing hello device.");

        let mut undo = UndoStack::new(ops.clone());
        let count = config.minor_count;

        let devt = ops
            .alloc_chrdev_region(config.first_minor, count, config.node_name)
            .map_err(|e| {
                log::error!("Failed to alloc char dev region: {}.", e);
                HelloError::AllocationFailure
            })?;
        undo.push(LifecycleState::IdentityAllocated, move |ops| {
            ops.unregister_chrdev_region(devt, count)
        });

        let store_size = size_of::<RegisterStore>();
        ops.reserve_memory(store_size).map_err(|e| {
            log::error!("Failed to alloc hello_dev: {}.", e);
            HelloError::AllocationFailure
        })?;
        let store = Arc::new(RegisterStore::new());
        undo.push(LifecycleState::StoreReady, move |ops| {
            ops.release_memory(store_size)
        });

        ops.cdev_add(devt, count, Arc::new(HelloCharDriver::new(store.clone())))
            .map_err(|e| conflict("Failed to setup dev", e))?;
        undo.push(LifecycleState::CharDevRegistered, move |ops| ops.cdev_del(devt));

        let class = config.class_name;
        ops.class_create(class)
            .map_err(|e| conflict("Failed to create hello class", e))?;
        undo.push(LifecycleState::ClassCreated, move |ops| ops.class_destroy(class));

        let device = config.file_name;
        ops.device_create(class, devt, device)
            .map_err(|e| conflict("Failed to create hello device", e))?;
        undo.push(LifecycleState::NodeCreated, move |ops| {
            ops.device_destroy(class, devt, device)
        });

        let attr: Arc<dyn DeviceAttribute> = Arc::new(ValAttribute::new(store.clone()));
        ops.device_create_file(class, device, attr.clone())
            .map_err(|e| conflict("Failed to create attribute val", e))?;
        undo.push(LifecycleState::AttributeAttached, move |ops| {
            ops.device_remove_file(class, device, &attr)
        });

        let proc_name = config.proc_name;
        let proc_ops: Arc<dyn ProcOps> = Arc::new(HelloProcOps::new(store.clone()));
        match ops.proc_create(proc_name, PROC_MODE, proc_ops.clone()) {
            Ok(()) => undo.push(LifecycleState::ProcEntryCreated, move |ops| {
                ops.proc_remove(proc_name, &proc_ops)
            }),
            Err(e) => log::warn!("Failed to create /proc/{}: {}, continuing without it.", proc_name, e),
        }

        log::info!("Succeeded to initialize hello device.");
        Ok(Self {
            config,
            devt,
            store,
            state: LifecycleState::Running,
            undo,
        })
    }

    /// 卸载模块，逆序撤销所有注册
    pub fn exit(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.state == LifecycleState::Unstarted {
            return;
        }
        log::info!("Destroy hello device.");
        self.undo.unwind();
        self.state = LifecycleState::Unstarted;
    }

    /// 当前状态
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// 分配到的设备号
    pub fn devt(&self) -> u64 {
        self.devt
    }

    /// 加载时使用的配置
    pub fn config(&self) -> &HelloConfig {
        &self.config
    }

    /// proc 条目是否创建成功
    pub fn has_proc_entry(&self) -> bool {
        self.undo.contains(LifecycleState::ProcEntryCreated)
    }

    /// 共享的寄存器
    pub fn store(&self) -> &Arc<RegisterStore> {
        &self.store
    }
}

impl Drop for HelloModule {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn conflict(what: &str, err: vfs::FsError) -> HelloError {
    log::error!("{}: {}.", what, err);
    HelloError::RegistrationConflict
}
