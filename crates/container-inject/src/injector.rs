//! 依赖注入器
//!
//! 对注册表中每个受管类声明的可注入字段执行解析与装配。
//! 解析先按声明类型直查，未命中时将声明类型视作接口/父类型，
//! 在可赋值的候选实现中按限定名消歧。注入发生在织入之后，
//! 装配进字段的是注册表中的当前实例，被代理的引用因此
//! 透明地获得通知行为

use container_common::{BeanHandle, ContainerError, ContainerResult};
use container_core::{BeanClass, BeanRegistry, InjectionTarget};
use std::sync::Arc;
use tracing::{debug, warn};

/// 依赖注入器
///
/// 任何解析失败都是致命的配置错误，立即中止启动，从不重试
pub struct DependencyInjector<'a> {
    registry: &'a BeanRegistry,
}

impl<'a> DependencyInjector<'a> {
    /// 创建注入器
    pub fn new(registry: &'a BeanRegistry) -> Self {
        Self { registry }
    }

    /// 执行依赖注入
    pub fn inject_dependencies(&self) -> ContainerResult<()> {
        let classes = self.registry.classes();
        if classes.is_empty() {
            warn!("注册表为空，跳过依赖注入");
            return Ok(());
        }
        for class in classes {
            for target in &class.inject_fields {
                let resolved = self.resolve(&class, target)?;
                let bean = self.registry.lookup(class.type_info.id).ok_or_else(|| {
                    ContainerError::BeanNotFound {
                        type_name: class.type_info.name.clone(),
                    }
                })?;
                bean.assign(target.field, resolved)?;
                debug!(
                    "注入 {}.{} <- {}",
                    class.type_info.name, target.field, target.declared_type.name
                );
            }
        }
        Ok(())
    }

    /// 解析单个可注入字段
    fn resolve(
        &self,
        owner: &BeanClass,
        target: &InjectionTarget,
    ) -> ContainerResult<BeanHandle> {
        // 1. 按声明类型直接解析
        if let Some(bean) = self.registry.lookup(target.declared_type.id) {
            return Ok(bean);
        }

        // 2. 将声明类型视作接口/父类型，在可赋值的候选实现中选取
        let candidates = self.registry.lookup_by_supertype(target.declared_type.id);
        let chosen = disambiguate(owner, target, &candidates)?;
        self.registry
            .lookup(chosen.type_info.id)
            .ok_or_else(|| ContainerError::BeanNotFound {
                type_name: chosen.type_info.name.clone(),
            })
    }
}

/// 在候选实现中消歧
///
/// 零候选、限定名不匹配、多候选且无限定名，都是致命错误
fn disambiguate<'c>(
    owner: &BeanClass,
    target: &InjectionTarget,
    candidates: &'c [Arc<BeanClass>],
) -> ContainerResult<&'c Arc<BeanClass>> {
    let names = || {
        candidates
            .iter()
            .map(|c| c.type_info.name.clone())
            .collect::<Vec<_>>()
    };
    match (candidates.len(), target.qualifier.as_deref()) {
        (0, _) => Err(ContainerError::UnresolvedDependency {
            type_name: owner.type_info.name.clone(),
            field: target.field.to_string(),
            declared_type: target.declared_type.name.clone(),
        }),
        (1, None) => Ok(&candidates[0]),
        (_, Some(qualifier)) => candidates
            .iter()
            .find(|c| c.type_info.name == qualifier)
            .ok_or_else(|| ContainerError::QualifierMismatch {
                qualifier: qualifier.to_string(),
                declared_type: target.declared_type.name.clone(),
                candidates: names(),
            }),
        (_, None) => Err(ContainerError::AmbiguousDependency {
            declared_type: target.declared_type.name.clone(),
            candidates: names(),
        }),
    }
}
