//! 受管组件基础接口定义
//!
//! 提供受管 Bean 必须实现的统一调用表面

use crate::advice::Advice;
use crate::errors::{ContainerError, InvocationResult};
use std::any::Any;
use std::sync::Arc;

/// 受管类角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeanRole {
    /// 通用组件
    Component,
    /// 控制器
    Controller,
    /// 服务
    Service,
    /// 仓储
    Repository,
    /// 切面
    Aspect,
}

/// 动态值：方法参数与返回值的统一表示
pub type BeanValue = Arc<dyn Any + Send + Sync>;

/// 参数列表
pub type ArgList = Vec<BeanValue>;

/// 受管 Bean 实例句柄
pub type BeanHandle = Arc<dyn ManagedBean>;

/// 构造空返回值
pub fn unit_value() -> BeanValue {
    Arc::new(())
}

/// 包装一个具体值为动态值
pub fn value<T: Send + Sync + 'static>(v: T) -> BeanValue {
    Arc::new(v)
}

/// 读取动态值中的具体类型
pub fn value_ref<T: 'static>(v: &BeanValue) -> Option<&T> {
    v.downcast_ref::<T>()
}

/// 受管 Bean 的统一调用表面
///
/// 代理替换要求所有受管对象以统一签名暴露方法调用与字段装配：
/// 织入生成的代理实现同一 trait，在委派给目标之前先经过拦截逻辑，
/// 目标自身的代码对此无感知
pub trait ManagedBean: Send + Sync + std::fmt::Debug + 'static {
    /// 以方法名调用目标方法
    fn invoke(&self, method: &str, args: &ArgList) -> InvocationResult;

    /// 向可注入字段装配依赖实例
    ///
    /// 默认实现拒绝一切字段：只有声明了可注入字段的 Bean 才需要覆写
    fn assign(&self, field: &str, _value: BeanHandle) -> Result<(), ContainerError> {
        Err(ContainerError::UnknownField {
            type_name: std::any::type_name::<Self>().to_string(),
            field: field.to_string(),
        })
    }

    /// 暴露通知能力
    ///
    /// 仅切面 Bean 返回 `Some`，织入器以此校验切面声明
    fn as_advice(self: Arc<Self>) -> Option<Arc<dyn Advice>> {
        None
    }

    /// 以 `Any` 形式暴露自身，用于类型化访问
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}
