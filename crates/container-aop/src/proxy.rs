//! 代理替换
//!
//! 以包装对象取代字节码生成：包装对象持有被代理的目标实例与
//! 通知链执行器，实现与目标一致的统一调用表面，所有方法调用
//! 先经过拦截逻辑再委派给目标，目标自身的代码对此无感知

use crate::executor::AdviceChainExecutor;
use container_common::{ArgList, BeanHandle, ContainerError, InvocationResult, ManagedBean};
use std::any::Any;
use std::sync::Arc;

/// 织入后的代理 Bean
///
/// 在注册表中以原类标识覆盖原始实例
#[derive(Debug)]
pub struct AdvisedBean {
    /// 被代理的原始实例
    target: BeanHandle,
    /// 通知链执行器
    executor: AdviceChainExecutor,
}

impl AdvisedBean {
    /// 包装目标实例
    pub fn new(target: BeanHandle, executor: AdviceChainExecutor) -> Self {
        Self { target, executor }
    }

    /// 通知链执行器
    pub fn executor(&self) -> &AdviceChainExecutor {
        &self.executor
    }
}

impl ManagedBean for AdvisedBean {
    fn invoke(&self, method: &str, args: &ArgList) -> InvocationResult {
        self.executor.intercept(self.target.as_ref(), method, args)
    }

    /// 字段装配穿透代理，落在真实实例上
    fn assign(&self, field: &str, value: BeanHandle) -> Result<(), ContainerError> {
        self.target.assign(field, value)
    }

    /// 代理不暴露目标的具体类型：经过通知的调用表面是 [`invoke`](ManagedBean::invoke)
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
