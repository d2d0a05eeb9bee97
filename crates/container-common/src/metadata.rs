//! 类型元数据定义
//!
//! 提供受管类与方法的标识信息

use std::any::TypeId;

/// 类型信息
///
/// 以短名 + `TypeId` + 完整模块路径标识一个受管类型，
/// trait 对象类型（如 `dyn PaymentChannel`）同样拥有独立的标识
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型短名（不含模块路径）
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整模块路径
    pub path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full = std::any::type_name::<T>();
        let path = normalize_path(full);
        Self {
            name: short_name(&path).to_string(),
            id: TypeId::of::<T>(),
            path,
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }
}

/// 方法标识
///
/// 切入点精筛与通知回调都以它定位一次具体的方法调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// 方法所属的类型
    pub owner: TypeInfo,
    /// 方法名
    pub name: String,
}

impl MethodDescriptor {
    /// 创建新的方法标识
    pub fn new(owner: TypeInfo, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }

    /// 获取带模块路径的完整方法名
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.owner.path, self.name)
    }
}

/// 去除 trait 对象类型名的 `dyn ` 前缀
fn normalize_path(full: &str) -> String {
    full.trim_start_matches("dyn ").to_string()
}

fn short_name(path: &str) -> &str {
    path.split("::").last().unwrap_or(path)
}
