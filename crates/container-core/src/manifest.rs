//! 注册清单定义
//!
//! 以显式清单取代类路径扫描：每个受管类在清单中声明角色、实现的
//! 父类型、可注入字段，以及（对切面而言）优先级与切入点表达式

use container_common::{BeanHandle, BeanRole, ManagedBean, TypeInfo};
use std::fmt;
use std::sync::Arc;

/// 可注入字段声明
#[derive(Debug, Clone)]
pub struct InjectionTarget {
    /// 字段名
    pub field: &'static str,
    /// 字段声明类型（可为 trait 对象类型）
    pub declared_type: TypeInfo,
    /// 消歧限定名（候选实现的短名）
    pub qualifier: Option<String>,
}

/// 切面声明
///
/// 优先级与切入点表达式必须成对出现，缺一即为配置错误
#[derive(Debug, Clone)]
pub struct AspectSpec {
    /// 优先级，数值越小前置通知越先执行
    pub order: i32,
    /// 切入点表达式
    pub pointcut: String,
}

/// Bean 构造函数类型
pub type BeanConstructor = Arc<dyn Fn() -> BeanHandle + Send + Sync>;

/// 受管类声明
///
/// 发现期创建一次，单例实例，进程结束前不销毁
#[derive(Clone)]
pub struct BeanClass {
    /// 类型信息
    pub type_info: TypeInfo,
    /// 角色
    pub role: BeanRole,
    /// 显式声明的父类型（接口）集合
    pub supertypes: Vec<TypeInfo>,
    /// 可注入字段集合
    pub inject_fields: Vec<InjectionTarget>,
    /// 切面声明（仅切面角色使用）
    pub aspect: Option<AspectSpec>,
    /// 实例构造函数
    constructor: BeanConstructor,
}

impl BeanClass {
    /// 声明一个受管类
    pub fn new<T, F>(role: BeanRole, constructor: F) -> Self
    where
        T: ManagedBean,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            type_info: TypeInfo::of::<T>(),
            role,
            supertypes: Vec::new(),
            inject_fields: Vec::new(),
            aspect: None,
            constructor: Arc::new(move || Arc::new(constructor())),
        }
    }

    /// 声明该类可赋值给某个父类型（接口）
    pub fn with_supertype<S: ?Sized + 'static>(mut self) -> Self {
        self.supertypes.push(TypeInfo::of::<S>());
        self
    }

    /// 声明一个可注入字段
    pub fn with_injected_field(
        mut self,
        field: &'static str,
        declared_type: TypeInfo,
        qualifier: Option<&str>,
    ) -> Self {
        self.inject_fields.push(InjectionTarget {
            field,
            declared_type,
            qualifier: qualifier.map(str::to_string),
        });
        self
    }

    /// 声明切面的优先级与切入点表达式
    pub fn as_aspect(mut self, order: i32, pointcut: impl Into<String>) -> Self {
        self.aspect = Some(AspectSpec {
            order,
            pointcut: pointcut.into(),
        });
        self
    }

    /// 构造该类的实例
    pub fn construct(&self) -> BeanHandle {
        (self.constructor)()
    }

    /// 该类是否为切面
    pub fn is_aspect(&self) -> bool {
        self.role == BeanRole::Aspect
    }
}

impl fmt::Debug for BeanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanClass")
            .field("type_info", &self.type_info)
            .field("role", &self.role)
            .field("supertypes", &self.supertypes)
            .field("inject_fields", &self.inject_fields)
            .field("aspect", &self.aspect)
            .field("constructor", &"<function>")
            .finish()
    }
}

/// 注册清单
///
/// 一个清单对应一个逻辑包，是类发现的产物
#[derive(Debug, Clone, Default)]
pub struct BeanManifest {
    /// 逻辑包名
    pub package: String,
    /// 受管类声明集合
    pub classes: Vec<BeanClass>,
}

impl BeanManifest {
    /// 创建空清单
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            classes: Vec::new(),
        }
    }

    /// 向清单添加一个受管类声明
    pub fn with_class(mut self, class: BeanClass) -> Self {
        self.classes.push(class);
        self
    }

    /// 清单是否为空
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
