//! 容器启动序列的端到端测试
//!
//! 覆盖完整链路：清单加载 → 切面织入 → 依赖注入 → 经由代理的方法调用

use container_common::{
    value, value_ref, Advice, ArgList, BeanHandle, BeanRole, BeanValue, ContainerError,
    InvocationError, InvocationResult, ManagedBean, MethodDescriptor, TypeInfo,
};
use container_composition::{ApplicationContext, ContainerConfig};
use container_core::{type_key, BeanClass, BeanManifest, ManifestDiscovery};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// 观察日志，记录通知与方法体的执行顺序
#[derive(Debug, Default)]
struct Journal(Mutex<Vec<String>>);

impl Journal {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// 支付通道接口（仅作为类型标识使用）
trait PaymentChannel: Send + Sync {}

/// 支付服务：织入目标
#[derive(Debug)]
struct PaymentService {
    journal: Arc<Journal>,
}

impl PaymentChannel for PaymentService {}

impl ManagedBean for PaymentService {
    fn invoke(&self, method: &str, args: &ArgList) -> InvocationResult {
        match method {
            "pay" => {
                let amount = args
                    .first()
                    .and_then(|a| value_ref::<u64>(a).copied())
                    .ok_or_else(|| InvocationError::InvalidArguments {
                        type_name: "PaymentService".to_string(),
                        method: "pay".to_string(),
                        message: "缺少金额参数".to_string(),
                    })?;
                self.journal.push("pay-body");
                Ok(value(format!("receipt-{amount}")))
            }
            "refund" => Err(InvocationError::ExecutionFailed {
                message: "x".to_string(),
            }),
            "audit" => Ok(value("clean".to_string())),
            _ => Err(InvocationError::UnknownMethod {
                type_name: "PaymentService".to_string(),
                method: method.to_string(),
            }),
        }
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// 订单控制器：持有按接口注入的支付通道
#[derive(Debug)]
struct OrderController {
    payment: OnceCell<BeanHandle>,
}

impl ManagedBean for OrderController {
    fn invoke(&self, method: &str, args: &ArgList) -> InvocationResult {
        match method {
            "checkout" => self
                .payment
                .get()
                .ok_or_else(|| InvocationError::ExecutionFailed {
                    message: "payment 字段尚未装配".to_string(),
                })?
                .invoke("pay", args),
            _ => Err(InvocationError::UnknownMethod {
                type_name: "OrderController".to_string(),
                method: method.to_string(),
            }),
        }
    }

    fn assign(&self, field: &str, value: BeanHandle) -> Result<(), ContainerError> {
        match field {
            "payment" => {
                self.payment
                    .set(value)
                    .map_err(|_| ContainerError::FieldAlreadyAssigned {
                        type_name: "OrderController".to_string(),
                        field: field.to_string(),
                    })
            }
            _ => Err(ContainerError::UnknownField {
                type_name: "OrderController".to_string(),
                field: field.to_string(),
            }),
        }
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// 定义一个带标签的跟踪切面类型
macro_rules! trace_aspect {
    ($name:ident, $tag:literal) => {
        #[derive(Debug)]
        struct $name {
            journal: Arc<Journal>,
        }

        impl Advice for $name {
            fn before(
                &self,
                _target: &TypeInfo,
                _method: &MethodDescriptor,
                _args: &ArgList,
            ) -> Result<(), InvocationError> {
                self.journal.push(concat!("before-", $tag));
                Ok(())
            }

            fn after_returning(
                &self,
                _target: &TypeInfo,
                _method: &MethodDescriptor,
                _args: &ArgList,
                return_value: BeanValue,
            ) -> Result<BeanValue, InvocationError> {
                self.journal.push(concat!("after-", $tag));
                Ok(return_value)
            }

            fn after_throwing(
                &self,
                _target: &TypeInfo,
                _method: &MethodDescriptor,
                _args: &ArgList,
                error: &InvocationError,
            ) -> Result<(), InvocationError> {
                self.journal.push(format!(concat!("throw-", $tag, ":{}"), error));
                Ok(())
            }
        }

        impl ManagedBean for $name {
            fn invoke(&self, method: &str, _args: &ArgList) -> InvocationResult {
                Err(InvocationError::UnknownMethod {
                    type_name: stringify!($name).to_string(),
                    method: method.to_string(),
                })
            }

            fn as_advice(self: Arc<Self>) -> Option<Arc<dyn Advice>> {
                Some(self)
            }

            fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
                self
            }
        }
    };
}

trace_aspect!(TraceZeroAspect, "0");
trace_aspect!(TraceFiveAspect, "5");

fn payment_class(journal: &Arc<Journal>) -> BeanClass {
    let journal = journal.clone();
    BeanClass::new(BeanRole::Service, move || PaymentService {
        journal: journal.clone(),
    })
    .with_supertype::<dyn PaymentChannel>()
}

fn controller_class() -> BeanClass {
    BeanClass::new(BeanRole::Controller, || OrderController {
        payment: OnceCell::new(),
    })
    .with_injected_field("payment", TypeInfo::of::<dyn PaymentChannel>(), None)
}

fn trace_zero_class(journal: &Arc<Journal>, pointcut: &str) -> BeanClass {
    let journal = journal.clone();
    BeanClass::new(BeanRole::Aspect, move || TraceZeroAspect {
        journal: journal.clone(),
    })
    .as_aspect(0, pointcut)
}

fn trace_five_class(journal: &Arc<Journal>, pointcut: &str) -> BeanClass {
    let journal = journal.clone();
    BeanClass::new(BeanRole::Aspect, move || TraceFiveAspect {
        journal: journal.clone(),
    })
    .as_aspect(5, pointcut)
}

const PAY_POINTCUT: &str = "execution(..::PaymentService::pay(..))";

#[test]
fn test_advice_chain_order_end_to_end() {
    init_logging();
    let journal = Arc::new(Journal::default());
    let context = ApplicationContext::new();
    context
        .bootstrap(
            BeanManifest::new("demo::payment")
                .with_class(payment_class(&journal))
                .with_class(trace_zero_class(&journal, PAY_POINTCUT))
                .with_class(trace_five_class(&journal, PAY_POINTCUT)),
        )
        .unwrap();

    let payment = context.get_bean(type_key::<PaymentService>()).unwrap();
    let receipt = payment.invoke("pay", &vec![value(100_u64)]).unwrap();

    assert_eq!(
        value_ref::<String>(&receipt),
        Some(&"receipt-100".to_string())
    );
    assert_eq!(
        journal.entries(),
        vec!["before-0", "before-5", "pay-body", "after-5", "after-0"]
    );
}

#[test]
fn test_injected_reference_observes_advised_behavior() {
    let journal = Arc::new(Journal::default());
    let context = ApplicationContext::new();
    context
        .bootstrap(
            BeanManifest::new("demo::payment")
                .with_class(payment_class(&journal))
                .with_class(controller_class())
                .with_class(trace_zero_class(&journal, PAY_POINTCUT)),
        )
        .unwrap();

    // 注入发生在织入之后：控制器拿到的是代理句柄
    let controller = context.get_bean(type_key::<OrderController>()).unwrap();
    let receipt = controller.invoke("checkout", &vec![value(7_u64)]).unwrap();

    assert_eq!(value_ref::<String>(&receipt), Some(&"receipt-7".to_string()));
    assert_eq!(journal.entries(), vec!["before-0", "pay-body", "after-0"]);
}

#[test]
fn test_unmatched_method_is_transparent() {
    let journal = Arc::new(Journal::default());
    let context = ApplicationContext::new();
    context
        .bootstrap(
            BeanManifest::new("demo::payment")
                .with_class(payment_class(&journal))
                .with_class(trace_zero_class(&journal, PAY_POINTCUT)),
        )
        .unwrap();

    let payment = context.get_bean(type_key::<PaymentService>()).unwrap();

    // audit 不被任何切入点精筛命中：结果必须与直接调用完全一致
    let through_proxy = payment.invoke("audit", &vec![]).unwrap();
    let direct = PaymentService {
        journal: journal.clone(),
    }
    .invoke("audit", &vec![])
    .unwrap();
    assert_eq!(
        value_ref::<String>(&through_proxy),
        value_ref::<String>(&direct)
    );
    assert!(journal.entries().is_empty());

    // 错误路径同样透明
    let err = payment.invoke("missing", &vec![]).unwrap_err();
    assert!(matches!(err, InvocationError::UnknownMethod { .. }));
}

#[test]
fn test_after_throwing_observes_exact_error_and_rethrows() {
    let journal = Arc::new(Journal::default());
    let context = ApplicationContext::new();
    context
        .bootstrap(
            BeanManifest::new("demo::payment")
                .with_class(payment_class(&journal))
                .with_class(trace_zero_class(
                    &journal,
                    "execution(..::PaymentService::refund(..))",
                )),
        )
        .unwrap();

    let payment = context.get_bean(type_key::<PaymentService>()).unwrap();
    let err = payment.invoke("refund", &vec![]).unwrap_err();

    // 调用方收到的必须就是目标方法的原始错误，而不是别的错误类型
    assert_eq!(
        err,
        InvocationError::ExecutionFailed {
            message: "x".to_string()
        }
    );
    // 异常通知观察到同一个错误
    assert_eq!(journal.entries(), vec!["throw-0:方法执行失败: x"]);
}

#[test]
fn test_ambiguous_injection_names_the_declared_type() {
    /// 通知接口（仅作为类型标识使用）
    trait Notifier: Send + Sync {}

    #[derive(Debug)]
    struct EmailNotifier;

    #[derive(Debug)]
    struct SmsNotifier;

    impl Notifier for EmailNotifier {}
    impl Notifier for SmsNotifier {}

    macro_rules! inert_bean {
        ($ty:ty) => {
            impl ManagedBean for $ty {
                fn invoke(&self, method: &str, _args: &ArgList) -> InvocationResult {
                    Err(InvocationError::UnknownMethod {
                        type_name: stringify!($ty).to_string(),
                        method: method.to_string(),
                    })
                }

                fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
                    self
                }
            }
        };
    }

    inert_bean!(EmailNotifier);
    inert_bean!(SmsNotifier);

    #[derive(Debug)]
    struct ReportService {
        notifier: OnceCell<BeanHandle>,
    }

    impl ManagedBean for ReportService {
        fn invoke(&self, method: &str, _args: &ArgList) -> InvocationResult {
            Err(InvocationError::UnknownMethod {
                type_name: "ReportService".to_string(),
                method: method.to_string(),
            })
        }

        fn assign(&self, field: &str, value: BeanHandle) -> Result<(), ContainerError> {
            match field {
                "notifier" => self.notifier.set(value).map_err(|_| {
                    ContainerError::FieldAlreadyAssigned {
                        type_name: "ReportService".to_string(),
                        field: field.to_string(),
                    }
                }),
                _ => Err(ContainerError::UnknownField {
                    type_name: "ReportService".to_string(),
                    field: field.to_string(),
                }),
            }
        }

        fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    let context = ApplicationContext::new();
    let err = context
        .bootstrap(
            BeanManifest::new("demo::report")
                .with_class(
                    BeanClass::new(BeanRole::Service, || ReportService {
                        notifier: OnceCell::new(),
                    })
                    .with_injected_field("notifier", TypeInfo::of::<dyn Notifier>(), None),
                )
                .with_class(
                    BeanClass::new(BeanRole::Component, || EmailNotifier)
                        .with_supertype::<dyn Notifier>(),
                )
                .with_class(
                    BeanClass::new(BeanRole::Component, || SmsNotifier)
                        .with_supertype::<dyn Notifier>(),
                ),
        )
        .unwrap_err();

    match err {
        ContainerError::AmbiguousDependency { declared_type, .. } => {
            assert_eq!(declared_type, "Notifier");
        }
        other => panic!("期望歧义错误，实际为 {other:?}"),
    }
}

#[test]
fn test_double_load_performs_no_mutation() {
    let journal = Arc::new(Journal::default());
    let context = ApplicationContext::new();
    context
        .bootstrap(BeanManifest::new("demo::payment").with_class(payment_class(&journal)))
        .unwrap();

    let size_before = context.registry().size();
    let handle_before = context.get_bean(type_key::<PaymentService>()).unwrap();

    // 第二次加载携带更多类，也必须是空操作
    context.load_beans(
        BeanManifest::new("demo::payment")
            .with_class(payment_class(&journal))
            .with_class(controller_class()),
    );

    assert_eq!(context.registry().size(), size_before);
    let handle_after = context.get_bean(type_key::<PaymentService>()).unwrap();
    assert!(Arc::ptr_eq(&handle_before, &handle_after));
}

#[test]
fn test_discovery_backed_load() {
    let journal = Arc::new(Journal::default());
    let discovery = ManifestDiscovery::new().with_manifest(
        BeanManifest::new("demo::payment").with_class(payment_class(&journal)),
    );

    let context = ApplicationContext::new();
    // 未知的包：静默返回，注册表保持未加载
    context.load_from(&discovery, "demo::unknown");
    assert!(!context.registry().is_loaded());

    context.load_from(&discovery, "demo::payment");
    assert!(context.registry().is_loaded());
    assert!(context.get_bean(type_key::<PaymentService>()).is_some());
}

#[test]
fn test_weaving_can_be_disabled_by_config() {
    let journal = Arc::new(Journal::default());
    let context = ApplicationContext::with_config(ContainerConfig {
        weaving_enabled: false,
        ..ContainerConfig::default()
    });
    context
        .bootstrap(
            BeanManifest::new("demo::payment")
                .with_class(payment_class(&journal))
                .with_class(trace_zero_class(&journal, PAY_POINTCUT)),
        )
        .unwrap();

    let payment = context.get_bean(type_key::<PaymentService>()).unwrap();
    payment.invoke("pay", &vec![value(1_u64)]).unwrap();
    // 未织入：只有方法体，没有任何通知
    assert_eq!(journal.entries(), vec!["pay-body"]);
}

#[test]
fn test_legacy_error_swallowing_config() {
    let journal = Arc::new(Journal::default());
    let context = ApplicationContext::with_config(ContainerConfig {
        rethrow_target_errors: false,
        ..ContainerConfig::default()
    });
    context
        .bootstrap(
            BeanManifest::new("demo::payment")
                .with_class(payment_class(&journal))
                .with_class(trace_zero_class(
                    &journal,
                    "execution(..::PaymentService::refund(..))",
                )),
        )
        .unwrap();

    let payment = context.get_bean(type_key::<PaymentService>()).unwrap();
    // 遗留行为：异常通知链执行后错误被吞掉，调用方收到空返回值
    let swallowed = payment.invoke("refund", &vec![]).unwrap();
    assert!(value_ref::<()>(&swallowed).is_some());
    assert_eq!(journal.entries(), vec!["throw-0:方法执行失败: x"]);
}

#[test]
fn test_query_surface_after_bootstrap() {
    let journal = Arc::new(Journal::default());
    let context = ApplicationContext::new();
    context
        .bootstrap(
            BeanManifest::new("demo::payment")
                .with_class(payment_class(&journal))
                .with_class(controller_class())
                .with_class(trace_zero_class(&journal, PAY_POINTCUT)),
        )
        .unwrap();

    assert_eq!(context.get_beans_by_role(BeanRole::Aspect).len(), 1);
    assert_eq!(context.get_beans_by_role(BeanRole::Controller).len(), 1);

    let channels = context.get_beans_by_supertype(type_key::<dyn PaymentChannel>());
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].type_info.short_name(), "PaymentService");
}
