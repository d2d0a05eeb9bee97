//! Bean 注册表
//!
//! 进程级的类标识到单例实例映射。注册表自身就是同步边界：
//! 底层并发映射保证读写安全，调用方查找时不需要任何外部锁

use crate::manifest::{BeanClass, BeanManifest};
use container_common::{BeanHandle, BeanRole};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::any::TypeId;
use std::sync::Arc;
use tracing::{debug, warn};

/// Bean 注册表
///
/// 启动序列之后读多写少：写入仅发生在启动序列内部，
/// 或显式的管理性替换（[`register`](Self::register) / [`remove`](Self::remove)）
#[derive(Debug, Default)]
pub struct BeanRegistry {
    /// 受管类声明，按类型ID索引
    classes: DashMap<TypeId, Arc<BeanClass>>,
    /// 当前存活实例：原始对象，或织入后覆盖写入的代理
    beans: DashMap<TypeId, BeanHandle>,
    /// 批量加载守卫
    load_guard: Mutex<bool>,
}

impl BeanRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 批量加载清单
    ///
    /// 幂等：对已加载的注册表再次加载是空操作，只告警不报错
    pub fn load(&self, manifest: BeanManifest) {
        let mut loaded = self.load_guard.lock();
        if *loaded {
            warn!("注册表已加载，忽略重复加载请求: {}", manifest.package);
            return;
        }
        if manifest.is_empty() {
            warn!("清单 {} 未发现任何受管类", manifest.package);
            return;
        }
        for class in manifest.classes {
            let instance = class.construct();
            debug!("注册 Bean: {} ({:?})", class.type_info.name, class.role);
            let id = class.type_info.id;
            self.classes.insert(id, Arc::new(class));
            self.beans.insert(id, instance);
        }
        *loaded = true;
    }

    /// 注册表是否已完成批量加载
    pub fn is_loaded(&self) -> bool {
        *self.load_guard.lock()
    }

    /// 无条件注册实例（upsert）
    ///
    /// 返回被替换的原实例；织入器以此确认原始对象被代理覆盖
    pub fn register(&self, type_id: TypeId, instance: BeanHandle) -> Option<BeanHandle> {
        self.beans.insert(type_id, instance)
    }

    /// 移除一个受管实例及其类声明
    pub fn remove(&self, type_id: TypeId) -> Option<BeanHandle> {
        self.classes.remove(&type_id);
        self.beans.remove(&type_id).map(|(_, handle)| handle)
    }

    /// 按类型查找当前存活实例
    pub fn lookup(&self, type_id: TypeId) -> Option<BeanHandle> {
        self.beans.get(&type_id).map(|entry| entry.value().clone())
    }

    /// 查找实例并转换为具体类型
    ///
    /// 织入后的代理不暴露目标的具体类型，此方法只对未被代理的 Bean 有效
    pub fn lookup_as<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.lookup(TypeId::of::<T>())?.as_any().downcast::<T>().ok()
    }

    /// 按类型查找受管类声明
    pub fn class_of(&self, type_id: TypeId) -> Option<Arc<BeanClass>> {
        self.classes.get(&type_id).map(|entry| entry.value().clone())
    }

    /// 获取所有受管类声明
    pub fn classes(&self) -> Vec<Arc<BeanClass>> {
        self.classes.iter().map(|entry| entry.value().clone()).collect()
    }

    /// 按角色查找受管类集合
    pub fn lookup_by_role(&self, role: BeanRole) -> Vec<Arc<BeanClass>> {
        self.classes
            .iter()
            .filter(|entry| entry.value().role == role)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// 按父类型查找可赋值的受管类集合（不含该类型本身）
    pub fn lookup_by_supertype(&self, type_id: TypeId) -> Vec<Arc<BeanClass>> {
        self.classes
            .iter()
            .filter(|entry| {
                let class = entry.value();
                class.type_info.id != type_id
                    && class.supertypes.iter().any(|s| s.id == type_id)
            })
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// 受管实例数量
    pub fn size(&self) -> usize {
        self.beans.len()
    }
}

/// 便捷函数：按具体类型构造查询键
pub fn type_key<T: ?Sized + 'static>() -> TypeId {
    TypeId::of::<T>()
}
