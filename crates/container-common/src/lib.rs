//! # Container Common
//!
//! 这个 crate 提供了应用容器各层共享的公共契约。
//!
//! ## 核心组件
//!
//! - [`TypeInfo`] / [`MethodDescriptor`] - 受管类与方法的标识信息
//! - [`BeanRole`] - 受管类角色
//! - [`ManagedBean`] - 受管 Bean 的统一调用表面
//! - [`Advice`] - 切面通知接口
//! - [`ContainerError`] / [`InvocationError`] - 错误类型定义
//!
//! ## 设计原则
//!
//! - 启动序列同步执行，失败即中止
//! - 以显式声明取代运行时反射
//! - 代理替换通过统一调用表面实现，目标代码无感知

pub mod advice;
pub mod component;
pub mod errors;
pub mod metadata;

pub use advice::*;
pub use component::*;
pub use errors::*;
pub use metadata::*;
