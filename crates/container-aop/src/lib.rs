//! # Container AOP
//!
//! 这个 crate 提供了切面织入子系统。
//!
//! ## 核心组件
//!
//! - [`PointcutExpression`] - 两阶段切入点匹配（类级粗筛 + 方法级精筛）
//! - [`AspectDescriptor`] - 切面描述符（优先级 + 通知对象 + 匹配器）
//! - [`AdviceChainExecutor`] - 通知链执行器（代理的拦截逻辑）
//! - [`AdvisedBean`] - 织入后的代理包装
//! - [`AspectWeaver`] - 织入器（启动序列中执行一次）

pub mod descriptor;
pub mod executor;
pub mod pointcut;
pub mod proxy;
pub mod weaver;

pub use descriptor::*;
pub use executor::*;
pub use pointcut::*;
pub use proxy::*;
pub use weaver::*;
