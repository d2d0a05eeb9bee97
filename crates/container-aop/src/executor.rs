//! 通知链执行器
//!
//! 代理的拦截逻辑：持有目标类与按优先级升序排列的切面描述符，
//! 围绕真实方法调用执行前置 / 后置 / 异常通知。
//!
//! 执行顺序实现的是调用栈式的嵌套语义：优先级数值最小的切面包在最外层，
//! 它的前置通知最先执行、后置与异常通知最后执行

use crate::descriptor::AspectDescriptor;
use container_common::{
    unit_value, ArgList, InvocationResult, ManagedBean, MethodDescriptor, TypeInfo,
};
use dashmap::DashMap;
use std::sync::Arc;

/// 通知链执行器
///
/// 织入完成后自身只读：方法级精筛结果按方法名惰性求值并缓存，
/// 每次调用的窄化在瞬态下标序列上进行，共享描述符列表从不被修改，
/// 多个请求线程可以并发经由同一个代理调用
#[derive(Debug)]
pub struct AdviceChainExecutor {
    /// 目标类
    target_class: TypeInfo,
    /// 按优先级升序排列的切面描述符
    sorted_aspects: Vec<Arc<AspectDescriptor>>,
    /// 方法级精筛缓存：方法名 -> 命中的描述符下标
    accurate_cache: DashMap<String, Vec<usize>>,
    /// 异常通知链执行完毕后是否重抛原始错误
    rethrow_target_errors: bool,
}

impl AdviceChainExecutor {
    /// 构造执行器，描述符在此按优先级升序排序
    pub fn new(
        target_class: TypeInfo,
        mut aspects: Vec<Arc<AspectDescriptor>>,
        rethrow_target_errors: bool,
    ) -> Self {
        aspects.sort_by_key(|a| a.order());
        Self {
            target_class,
            sorted_aspects: aspects,
            accurate_cache: DashMap::new(),
            rethrow_target_errors,
        }
    }

    /// 目标类
    pub fn target_class(&self) -> &TypeInfo {
        &self.target_class
    }

    /// 排序后的描述符列表
    pub fn aspects(&self) -> &[Arc<AspectDescriptor>] {
        &self.sorted_aspects
    }

    /// 拦截一次方法调用
    pub fn intercept(
        &self,
        target: &dyn ManagedBean,
        method_name: &str,
        args: &ArgList,
    ) -> InvocationResult {
        let matched = self.accurate_matched(method_name);
        if matched.is_empty() {
            // 没有任何切面命中该方法：直接调用真实方法，跳过所有通知
            return target.invoke(method_name, args);
        }
        let method = MethodDescriptor::new(self.target_class.clone(), method_name);

        // 前置通知按优先级升序执行；任何错误立即传播，
        // 真实方法与其余通知都不再执行
        for &i in &matched {
            self.sorted_aspects[i]
                .advice()
                .before(&self.target_class, &method, args)?;
        }

        match target.invoke(method_name, args) {
            Ok(mut return_value) => {
                // 后置通知按优先级降序执行，返回值沿链累积，
                // 最后执行的（优先级数值最小的）通知产出最终返回值
                for &i in matched.iter().rev() {
                    return_value = self.sorted_aspects[i].advice().after_returning(
                        &self.target_class,
                        &method,
                        args,
                        return_value,
                    )?;
                }
                Ok(return_value)
            }
            Err(error) => {
                // 异常通知按优先级降序观察原始错误
                for &i in matched.iter().rev() {
                    self.sorted_aspects[i].advice().after_throwing(
                        &self.target_class,
                        &method,
                        args,
                        &error,
                    )?;
                }
                if self.rethrow_target_errors {
                    Err(error)
                } else {
                    // 遗留行为：吞掉目标错误，向调用方返回空值
                    Ok(unit_value())
                }
            }
        }
    }

    /// 方法级精筛，首次经由代理调用某方法时求值并缓存
    fn accurate_matched(&self, method_name: &str) -> Vec<usize> {
        if let Some(hit) = self.accurate_cache.get(method_name) {
            return hit.clone();
        }
        let method = MethodDescriptor::new(self.target_class.clone(), method_name);
        let matched: Vec<usize> = self
            .sorted_aspects
            .iter()
            .enumerate()
            .filter(|(_, aspect)| aspect.pointcut().accurate_matches(&method))
            .map(|(i, _)| i)
            .collect();
        self.accurate_cache
            .insert(method_name.to_string(), matched.clone());
        matched
    }
}
