//! 通知接口定义
//!
//! 定义容器支持的三类通知：前置、后置与异常通知。
//! 切面只需覆写自己关心的通知，未覆写的默认实现不做任何事

use crate::component::{ArgList, BeanValue};
use crate::errors::InvocationError;
use crate::metadata::{MethodDescriptor, TypeInfo};

/// 通知 trait
pub trait Advice: Send + Sync + 'static {
    /// 前置通知
    ///
    /// 在真实方法之前执行；返回错误会立即传播，
    /// 真实方法与其余所有通知都不再执行
    fn before(
        &self,
        _target: &TypeInfo,
        _method: &MethodDescriptor,
        _args: &ArgList,
    ) -> Result<(), InvocationError> {
        Ok(())
    }

    /// 后置通知
    ///
    /// 在真实方法正常返回后执行，可改写返回值；
    /// 链上每个通知收到的都是前一个通知产出的值
    fn after_returning(
        &self,
        _target: &TypeInfo,
        _method: &MethodDescriptor,
        _args: &ArgList,
        return_value: BeanValue,
    ) -> Result<BeanValue, InvocationError> {
        Ok(return_value)
    }

    /// 异常通知
    ///
    /// 在真实方法返回错误后执行，观察到的是目标方法的原始错误
    fn after_throwing(
        &self,
        _target: &TypeInfo,
        _method: &MethodDescriptor,
        _args: &ArgList,
        _error: &InvocationError,
    ) -> Result<(), InvocationError> {
        Ok(())
    }
}
