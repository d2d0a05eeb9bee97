//! 错误类型定义

use thiserror::Error;

/// 容器配置错误类型
///
/// 启动序列（加载、织入、注入）中的配置错误都是致命的：
/// 同步抛出、中止整个序列、从不重试
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("切面配置无效: {type_name}, 原因: {message}")]
    MalformedAspect { type_name: String, message: String },

    #[error("依赖无法解析: {type_name} 的字段 {field} (声明类型 {declared_type})")]
    UnresolvedDependency {
        type_name: String,
        field: String,
        declared_type: String,
    },

    #[error("依赖存在歧义: {declared_type} 有多个候选实现 {candidates:?}, 请通过限定名指定其一")]
    AmbiguousDependency {
        declared_type: String,
        candidates: Vec<String>,
    },

    #[error("限定名不匹配: {qualifier} 不在 {declared_type} 的候选实现 {candidates:?} 中")]
    QualifierMismatch {
        qualifier: String,
        declared_type: String,
        candidates: Vec<String>,
    },

    #[error("Bean 未注册: {type_name}")]
    BeanNotFound { type_name: String },

    #[error("字段不可注入: {type_name} 没有名为 {field} 的可注入字段")]
    UnknownField { type_name: String, field: String },

    #[error("字段重复装配: {type_name} 的字段 {field} 已被注入")]
    FieldAlreadyAssigned { type_name: String, field: String },
}

/// 方法调用错误类型
///
/// 经由代理的一次方法调用可能产生的错误；
/// 与启动期错误不同，它们只传播给该次调用的调用方
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    #[error("未知方法: {type_name}::{method}")]
    UnknownMethod { type_name: String, method: String },

    #[error("参数无效: {type_name}::{method}, 原因: {message}")]
    InvalidArguments {
        type_name: String,
        method: String,
        message: String,
    },

    #[error("方法执行失败: {message}")]
    ExecutionFailed { message: String },

    #[error("通知执行失败: {aspect}, 原因: {message}")]
    AdviceFailed { aspect: String, message: String },
}

/// 结果类型别名
pub type ContainerResult<T> = Result<T, ContainerError>;
pub type InvocationResult = Result<crate::component::BeanValue, InvocationError>;
