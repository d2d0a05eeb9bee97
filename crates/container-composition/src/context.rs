//! 应用上下文
//!
//! 以显式上下文取代全局单例容器：进程启动时构造一个实例，
//! 显式传入启动序列与下游分发层。启动序列同步执行且只执行一次：
//! 加载 → 织入 → 注入，任何失败立即中止，不存在部分成功的有效状态

use crate::config::ContainerConfig;
use container_aop::AspectWeaver;
use container_common::{BeanHandle, BeanRole, ContainerResult};
use container_core::{BeanClass, BeanDiscovery, BeanManifest, BeanRegistry};
use container_inject::DependencyInjector;
use std::any::TypeId;
use std::sync::Arc;
use tracing::{info, warn};

/// 应用上下文
///
/// 启动完成后注册表转入读多写少模式，
/// 查询接口可被任意多个请求线程并发调用
#[derive(Debug, Default)]
pub struct ApplicationContext {
    registry: Arc<BeanRegistry>,
    config: ContainerConfig,
}

impl ApplicationContext {
    /// 以默认配置创建上下文
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 以指定配置创建上下文
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            registry: Arc::new(BeanRegistry::new()),
            config,
        }
    }

    /// 底层注册表
    pub fn registry(&self) -> &Arc<BeanRegistry> {
        &self.registry
    }

    /// 从清单加载受管类
    ///
    /// 幂等：重复加载是空操作，只告警不报错
    pub fn load_beans(&self, manifest: BeanManifest) {
        self.registry.load(manifest);
    }

    /// 通过发现机制按包名加载
    ///
    /// 发现一无所获时记录日志并静默返回
    pub fn load_from(&self, discovery: &dyn BeanDiscovery, package: &str) {
        match discovery.discover(package) {
            Some(manifest) => self.load_beans(manifest),
            None => warn!("包 {} 未发现任何受管类", package),
        }
    }

    /// 执行切面织入
    ///
    /// 必须在 [`load_beans`](Self::load_beans) 之后、
    /// [`inject_dependencies`](Self::inject_dependencies) 之前调用
    pub fn weave(&self) -> ContainerResult<()> {
        if !self.config.weaving_enabled {
            warn!("织入已被配置禁用，跳过");
            return Ok(());
        }
        AspectWeaver::new(&self.registry)
            .with_rethrow_target_errors(self.config.rethrow_target_errors)
            .weave()
    }

    /// 执行依赖注入
    ///
    /// 必须在 [`weave`](Self::weave) 之后调用，
    /// 被代理的引用由此透明地获得通知行为
    pub fn inject_dependencies(&self) -> ContainerResult<()> {
        DependencyInjector::new(&self.registry).inject_dependencies()
    }

    /// 按顺序执行完整启动序列：加载 → 织入 → 注入
    pub fn bootstrap(&self, manifest: BeanManifest) -> ContainerResult<()> {
        info!("开始启动应用上下文: {}", manifest.package);
        self.load_beans(manifest);
        self.weave()?;
        self.inject_dependencies()?;
        info!("应用上下文启动完成，共 {} 个 Bean", self.registry.size());
        Ok(())
    }

    /// 按类型查询完全装配好的单例
    pub fn get_bean(&self, type_id: TypeId) -> Option<BeanHandle> {
        self.registry.lookup(type_id)
    }

    /// 按角色查询受管类集合
    pub fn get_beans_by_role(&self, role: BeanRole) -> Vec<Arc<BeanClass>> {
        self.registry.lookup_by_role(role)
    }

    /// 按父类型查询可赋值的受管类集合
    pub fn get_beans_by_supertype(&self, type_id: TypeId) -> Vec<Arc<BeanClass>> {
        self.registry.lookup_by_supertype(type_id)
    }
}
