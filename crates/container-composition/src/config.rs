//! 容器配置

use serde::Deserialize;

/// 容器配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 是否执行织入阶段
    pub weaving_enabled: bool,
    /// 异常通知链执行完毕后是否重抛目标方法的原始错误
    ///
    /// 关闭后目标错误会被吞掉、调用方收到空返回值，
    /// 仅用于与遗留行为做对照
    pub rethrow_target_errors: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            weaving_enabled: true,
            rethrow_target_errors: true,
        }
    }
}
