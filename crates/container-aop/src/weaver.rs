//! 切面织入器
//!
//! 启动序列中恰好执行一次：发现切面、校验并构建描述符、
//! 对每个非切面受管类做类级粗筛，命中者以代理替换注册表中的原实例

use crate::descriptor::AspectDescriptor;
use crate::executor::AdviceChainExecutor;
use crate::pointcut::PointcutExpression;
use crate::proxy::AdvisedBean;
use container_core::{BeanClass, BeanRegistry};
use container_common::{BeanHandle, BeanRole, ContainerError, ContainerResult};
use std::sync::Arc;
use tracing::{debug, info};

/// 切面织入器
pub struct AspectWeaver<'a> {
    registry: &'a BeanRegistry,
    rethrow_target_errors: bool,
}

impl<'a> AspectWeaver<'a> {
    /// 创建织入器
    pub fn new(registry: &'a BeanRegistry) -> Self {
        Self {
            registry,
            rethrow_target_errors: true,
        }
    }

    /// 设置异常通知链执行完毕后是否重抛原始错误
    pub fn with_rethrow_target_errors(mut self, enabled: bool) -> Self {
        self.rethrow_target_errors = enabled;
        self
    }

    /// 执行织入
    ///
    /// 任何切面声明不合规都立即以配置错误中止启动；
    /// 没有切面命中的目标类保持原样，这不是错误
    pub fn weave(&self) -> ContainerResult<()> {
        let aspect_classes = self.registry.lookup_by_role(BeanRole::Aspect);
        if aspect_classes.is_empty() {
            debug!("未发现切面，跳过织入");
            return Ok(());
        }

        let descriptors = self.collect_descriptors(&aspect_classes)?;
        info!("发现 {} 个切面，开始织入", descriptors.len());

        let mut woven = 0_usize;
        for class in self.registry.classes() {
            // 切面自身不可作为其他切面的织入目标，防止拦截死循环
            if class.is_aspect() {
                continue;
            }
            let rough: Vec<Arc<AspectDescriptor>> = descriptors
                .iter()
                .filter(|d| d.pointcut().rough_matches(&class.type_info))
                .cloned()
                .collect();
            if rough.is_empty() {
                continue;
            }
            self.wrap(&class, rough)?;
            woven += 1;
        }

        info!("织入完成，共代理 {} 个 Bean", woven);
        Ok(())
    }

    /// 校验切面声明并构建描述符
    ///
    /// 切面类必须同时声明优先级与切入点表达式，且其实例必须暴露通知能力
    fn collect_descriptors(
        &self,
        aspect_classes: &[Arc<BeanClass>],
    ) -> ContainerResult<Vec<Arc<AspectDescriptor>>> {
        let mut descriptors = Vec::with_capacity(aspect_classes.len());
        for class in aspect_classes {
            let spec = class.aspect.as_ref().ok_or_else(|| {
                ContainerError::MalformedAspect {
                    type_name: class.type_info.name.clone(),
                    message: "切面类必须同时声明优先级与切入点表达式".to_string(),
                }
            })?;
            let instance = self.registry.lookup(class.type_info.id).ok_or_else(|| {
                ContainerError::BeanNotFound {
                    type_name: class.type_info.name.clone(),
                }
            })?;
            let advice = instance.as_advice().ok_or_else(|| {
                ContainerError::MalformedAspect {
                    type_name: class.type_info.name.clone(),
                    message: "切面类必须暴露 before/after_returning/after_throwing 通知能力"
                        .to_string(),
                }
            })?;
            descriptors.push(Arc::new(AspectDescriptor::new(
                spec.order,
                advice,
                PointcutExpression::parse(&spec.pointcut),
                class.type_info.clone(),
            )));
        }
        Ok(descriptors)
    }

    /// 以代理替换注册表中的原实例
    fn wrap(
        &self,
        class: &BeanClass,
        matched: Vec<Arc<AspectDescriptor>>,
    ) -> ContainerResult<()> {
        let target = self.registry.lookup(class.type_info.id).ok_or_else(|| {
            ContainerError::BeanNotFound {
                type_name: class.type_info.name.clone(),
            }
        })?;
        let executor = AdviceChainExecutor::new(
            class.type_info.clone(),
            matched,
            self.rethrow_target_errors,
        );
        let proxy: BeanHandle = Arc::new(AdvisedBean::new(target, executor));
        let previous = self.registry.register(class.type_info.id, proxy);
        if previous.is_some() {
            debug!("已将 {} 的原始实例替换为代理", class.type_info.name);
        }
        Ok(())
    }
}
