//! 类发现接口
//!
//! 类发现是容器核心之外的协作者：这里只定义发现接缝，
//! 以及一个基于显式清单的默认实现。不做任何文件系统或类路径扫描

use crate::manifest::BeanManifest;
use std::collections::HashMap;
use tracing::debug;

/// 类发现 trait
///
/// 给定包名，返回该包下的候选受管类清单
pub trait BeanDiscovery: Send + Sync {
    /// 按包名发现清单；一无所获时返回 `None`
    fn discover(&self, package: &str) -> Option<BeanManifest>;
}

/// 基于显式清单的发现实现
///
/// 清单在构建期逐个登记，发现即按包名取回
#[derive(Debug, Default)]
pub struct ManifestDiscovery {
    manifests: HashMap<String, BeanManifest>,
}

impl ManifestDiscovery {
    /// 创建空的发现器
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个清单，以其包名为键
    pub fn with_manifest(mut self, manifest: BeanManifest) -> Self {
        self.manifests.insert(manifest.package.clone(), manifest);
        self
    }
}

impl BeanDiscovery for ManifestDiscovery {
    fn discover(&self, package: &str) -> Option<BeanManifest> {
        let found = self.manifests.get(package).cloned();
        debug!(
            "发现包 {}: {} 个受管类",
            package,
            found.as_ref().map_or(0, |m| m.classes.len())
        );
        found
    }
}
