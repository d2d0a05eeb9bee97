//! 切入点表达式解析与匹配
//!
//! 表达式文法支持两种原语：
//!
//! ```text
//! execution(<类型路径模式>::<方法名模式>(..))
//! within(<类型路径模式>)
//! ```
//!
//! 路径模式以 `::` 分段；段内支持 `*` 通配任意字符序列，
//! 单独的 `..` 段匹配任意数量（含零）的路径段。
//!
//! 匹配分两阶段：类级粗筛保守求值，可有误报、不得漏报，
//! 用于在昂贵的方法级精筛之前廉价地裁剪候选集；
//! 方法级精筛是权威判定，仅当该方法的每次调用都满足表达式时为真。
//! 两阶段都从不报错：无法解析的表达式在粗筛阶段按命中处理，
//! 在精筛阶段不命中任何方法

use container_common::{MethodDescriptor, TypeInfo};
use tracing::debug;

/// 解析后的切入点表达式
#[derive(Debug, Clone)]
pub struct PointcutExpression {
    expression: String,
    primitive: Primitive,
}

#[derive(Debug, Clone)]
enum Primitive {
    /// execution 原语：类型路径模式 + 方法名模式
    Execution {
        type_pattern: PathPattern,
        method_pattern: String,
    },
    /// within 原语：匹配类型下的所有方法
    Within { type_pattern: PathPattern },
    /// 无法解析的表达式
    Unresolved,
}

impl PointcutExpression {
    /// 解析表达式
    ///
    /// 解析失败不报错，降级为保守匹配
    pub fn parse(expression: &str) -> Self {
        let primitive = parse_primitive(expression.trim()).unwrap_or_else(|| {
            debug!("切入点表达式无法解析，降级为保守匹配: {}", expression);
            Primitive::Unresolved
        });
        Self {
            expression: expression.to_string(),
            primitive,
        }
    }

    /// 原始表达式文本
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// 类级粗筛
    ///
    /// 保守判定：可有误报，不得漏报
    pub fn rough_matches(&self, class: &TypeInfo) -> bool {
        match &self.primitive {
            Primitive::Execution { type_pattern, .. } | Primitive::Within { type_pattern } => {
                type_pattern.matches(&class.path)
            }
            Primitive::Unresolved => true,
        }
    }

    /// 方法级精筛
    ///
    /// 权威判定，真正决定通知是否执行
    pub fn accurate_matches(&self, method: &MethodDescriptor) -> bool {
        match &self.primitive {
            Primitive::Execution {
                type_pattern,
                method_pattern,
            } => {
                type_pattern.matches(&method.owner.path)
                    && segment_matches(method_pattern, &method.name)
            }
            Primitive::Within { type_pattern } => type_pattern.matches(&method.owner.path),
            Primitive::Unresolved => false,
        }
    }
}

fn parse_primitive(expr: &str) -> Option<Primitive> {
    if let Some(body) = strip_call(expr, "execution(") {
        let body = body.strip_suffix("(..)")?;
        let (type_part, method_part) = body.rsplit_once("::")?;
        if type_part.is_empty() || method_part.is_empty() {
            return None;
        }
        return Some(Primitive::Execution {
            type_pattern: PathPattern::parse(type_part),
            method_pattern: method_part.to_string(),
        });
    }
    if let Some(body) = strip_call(expr, "within(") {
        if body.is_empty() {
            return None;
        }
        return Some(Primitive::Within {
            type_pattern: PathPattern::parse(body),
        });
    }
    None
}

fn strip_call<'a>(expr: &'a str, prefix: &str) -> Option<&'a str> {
    expr.strip_prefix(prefix)?.strip_suffix(')').map(str::trim)
}

/// 以 `::` 分段的路径模式
#[derive(Debug, Clone)]
struct PathPattern {
    segments: Vec<String>,
}

impl PathPattern {
    fn parse(text: &str) -> Self {
        Self {
            segments: text.split("::").map(|s| s.trim().to_string()).collect(),
        }
    }

    fn matches(&self, path: &str) -> bool {
        let segments: Vec<&str> = path.split("::").collect();
        path_matches(&self.segments, &segments)
    }
}

/// 路径段序列匹配，`..` 段匹配任意数量（含零）的路径段
fn path_matches(pattern: &[String], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((head, rest)) if head == ".." => {
            (0..=path.len()).any(|skip| path_matches(rest, &path[skip..]))
        }
        Some((head, rest)) => match path.split_first() {
            Some((segment, tail)) => segment_matches(head, segment) && path_matches(rest, tail),
            None => false,
        },
    }
}

/// 段内通配匹配，`*` 匹配任意字符序列
fn segment_matches(pattern: &str, text: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == text,
        Some((prefix, rest)) => {
            if !text.starts_with(prefix) {
                return false;
            }
            let remainder = &text[prefix.len()..];
            (0..=remainder.len()).any(|skip| segment_matches(rest, &remainder[skip..]))
        }
    }
}
