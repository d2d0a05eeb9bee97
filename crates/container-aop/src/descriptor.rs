//! 切面描述符

use crate::pointcut::PointcutExpression;
use container_common::{Advice, TypeInfo};
use std::fmt;
use std::sync::Arc;

/// 切面描述符
///
/// 将一个切面的优先级、通知对象与切入点匹配器捆绑在一起。
/// 织入期由织入器独占构建并匹配，之后以只读方式共享给
/// 它所挂接的每个通知链执行器
pub struct AspectDescriptor {
    order: i32,
    advice: Arc<dyn Advice>,
    pointcut: PointcutExpression,
    aspect_type: TypeInfo,
}

impl AspectDescriptor {
    /// 创建描述符
    pub fn new(
        order: i32,
        advice: Arc<dyn Advice>,
        pointcut: PointcutExpression,
        aspect_type: TypeInfo,
    ) -> Self {
        Self {
            order,
            advice,
            pointcut,
            aspect_type,
        }
    }

    /// 优先级，数值越小前置通知越先执行
    pub fn order(&self) -> i32 {
        self.order
    }

    /// 通知对象
    pub fn advice(&self) -> &dyn Advice {
        self.advice.as_ref()
    }

    /// 切入点匹配器
    pub fn pointcut(&self) -> &PointcutExpression {
        &self.pointcut
    }

    /// 切面自身的类型信息
    pub fn aspect_type(&self) -> &TypeInfo {
        &self.aspect_type
    }
}

impl fmt::Debug for AspectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AspectDescriptor")
            .field("order", &self.order)
            .field("aspect_type", &self.aspect_type)
            .field("pointcut", &self.pointcut.expression())
            .field("advice", &"<advice>")
            .finish()
    }
}
