use crate::command::Command;
use crate::command_bus::CommandBus;
use crate::error::DispatchError;
use crate::handler::{AsyncHandler, SyncHandler};
use async_trait::async_trait;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type BoxAnyCmd = Box<dyn Any + Send>;

type ErasedSyncFn = Arc<dyn Fn(BoxAnyCmd) -> Result<(), DispatchError> + Send + Sync>;

type ErasedFuture = Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send>>;

type ErasedAsyncFn = Arc<dyn Fn(BoxAnyCmd) -> ErasedFuture + Send + Sync>;

/// 基于内存的 CommandBus 实现
/// - 通过 TypeId 分别注册同步/异步两套相互独立的处理器存储；
///   同一命令标识可以只在一侧注册、两侧都注册或都不注册
/// - 运行时以类型擦除（Any）方式进行调度
/// - 同一存储内重复注册同一标识直接报错（与协作者注册表一致的严格策略）
pub struct InMemoryCommandBus {
    sync_handlers: DashMap<TypeId, (&'static str, ErasedSyncFn)>,
    async_handlers: DashMap<TypeId, (&'static str, ErasedAsyncFn)>,
}

impl Default for InMemoryCommandBus {
    fn default() -> Self {
        Self {
            sync_handlers: DashMap::new(),
            async_handlers: DashMap::new(),
        }
    }
}

impl InMemoryCommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册同步命令处理器
    pub fn register_sync<C>(&self, handler: SyncHandler<C>) -> Result<(), DispatchError>
    where
        C: Command,
    {
        let key = TypeId::of::<C>();

        let f: ErasedSyncFn = Arc::new(move |boxed_cmd| {
            // 正常情况下这里的 downcast 永远不会失败（键与闭包同一泛型 C）
            match boxed_cmd.downcast::<C>() {
                Ok(cmd) => handler(&cmd),
                Err(_) => Err(DispatchError::TypeMismatch {
                    expected: C::NAME,
                    found: "unknown",
                }),
            }
        });

        if self.sync_handlers.contains_key(&key) {
            return Err(DispatchError::AlreadyRegisteredCommand { command: C::NAME });
        }

        self.sync_handlers.insert(key, (C::NAME, f));

        Ok(())
    }

    /// 注册异步命令处理器
    pub fn register_async<C>(&self, handler: AsyncHandler<C>) -> Result<(), DispatchError>
    where
        C: Command,
    {
        let key = TypeId::of::<C>();

        let f: ErasedAsyncFn = Arc::new(move |boxed_cmd| {
            let handler = handler.clone();

            Box::pin(async move {
                match boxed_cmd.downcast::<C>() {
                    Ok(cmd) => {
                        let cmd = *cmd;
                        handler(&cmd).await
                    }
                    Err(_) => Err(DispatchError::TypeMismatch {
                        expected: C::NAME,
                        found: "unknown",
                    }),
                }
            })
        });

        if self.async_handlers.contains_key(&key) {
            return Err(DispatchError::AlreadyRegisteredCommand { command: C::NAME });
        }

        self.async_handlers.insert(key, (C::NAME, f));

        Ok(())
    }

    /// 同步存储中是否已注册该命令
    pub fn contains_sync<C: Command>(&self) -> bool {
        self.sync_handlers.contains_key(&TypeId::of::<C>())
    }

    /// 异步存储中是否已注册该命令
    pub fn contains_async<C: Command>(&self) -> bool {
        self.async_handlers.contains_key(&TypeId::of::<C>())
    }

    /// 获取已注册的同步命令名列表（只读视图）
    pub fn registered_sync(&self) -> Vec<&'static str> {
        self.sync_handlers.iter().map(|e| e.value().0).collect()
    }

    /// 获取已注册的异步命令名列表（只读视图）
    pub fn registered_async(&self) -> Vec<&'static str> {
        self.async_handlers.iter().map(|e| e.value().0).collect()
    }
}

#[async_trait]
impl CommandBus for InMemoryCommandBus {
    fn dispatch<C>(&self, cmd: C) -> Result<(), DispatchError>
    where
        C: Command,
    {
        let Some(f) = self
            .sync_handlers
            .get(&TypeId::of::<C>())
            .map(|e| e.value().1.clone())
        else {
            return Ok(());
        };

        (f)(Box::new(cmd))
    }

    async fn dispatch_async<C>(&self, cmd: C) -> Result<(), DispatchError>
    where
        C: Command,
    {
        let Some(f) = self
            .async_handlers
            .get(&TypeId::of::<C>())
            .map(|e| e.value().1.clone())
        else {
            return Ok(());
        };

        (f)(Box::new(cmd)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{async_handler, sync_handler};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Ping;

    impl Command for Ping {
        const NAME: &'static str = "ping";
    }

    struct Pong;

    impl Command for Pong {
        const NAME: &'static str = "pong";
    }

    fn counting_handler(counter: &Arc<AtomicUsize>) -> SyncHandler<Ping> {
        let counter = counter.clone();
        sync_handler(move |_: &Ping| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn dispatch_runs_registered_handler() {
        let bus = InMemoryCommandBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        bus.register_sync::<Ping>(counting_handler(&counter)).unwrap();

        bus.dispatch(Ping).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dispatch_without_registration_is_a_noop() {
        let bus = InMemoryCommandBus::new();
        bus.dispatch(Ping).unwrap();
        assert!(!bus.contains_sync::<Ping>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn dispatch_async_without_registration_is_a_noop() {
        let bus = InMemoryCommandBus::new();
        bus.dispatch_async(Ping).await.unwrap();
        assert!(!bus.contains_async::<Ping>());
    }

    #[test]
    fn dispatch_n_times_invokes_handler_n_times_without_crosstalk() {
        let bus = InMemoryCommandBus::new();
        let ping_count = Arc::new(AtomicUsize::new(0));
        let pong_count = Arc::new(AtomicUsize::new(0));
        bus.register_sync::<Ping>(counting_handler(&ping_count)).unwrap();
        bus.register_sync::<Pong>({
            let pong_count = pong_count.clone();
            sync_handler(move |_: &Pong| {
                pong_count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        })
        .unwrap();

        for _ in 0..5 {
            bus.dispatch(Ping).unwrap();
        }
        assert_eq!(ping_count.load(Ordering::SeqCst), 5);
        assert_eq!(pong_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn duplicate_sync_registration_is_an_error() {
        let bus = InMemoryCommandBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        bus.register_sync::<Ping>(counting_handler(&counter)).unwrap();

        let err = bus
            .register_sync::<Ping>(counting_handler(&counter))
            .unwrap_err();
        match err {
            DispatchError::AlreadyRegisteredCommand { command } => assert_eq!(command, "ping"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_async_registration_is_an_error() {
        let bus = InMemoryCommandBus::new();
        let noop = || async_handler(|_: &Ping| Box::pin(async { Ok(()) }));
        bus.register_async::<Ping>(noop()).unwrap();

        let err = bus.register_async::<Ping>(noop()).unwrap_err();
        match err {
            DispatchError::AlreadyRegisteredCommand { command } => assert_eq!(command, "ping"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn sync_and_async_stores_are_independent() {
        let bus = InMemoryCommandBus::new();
        let sync_count = Arc::new(AtomicUsize::new(0));
        let async_count = Arc::new(AtomicUsize::new(0));

        bus.register_sync::<Ping>(counting_handler(&sync_count)).unwrap();
        bus.register_async::<Ping>({
            let async_count = async_count.clone();
            async_handler(move |_: &Ping| {
                let async_count = async_count.clone();
                Box::pin(async move {
                    async_count.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
            })
        })
        .unwrap();

        bus.dispatch(Ping).unwrap();
        bus.dispatch_async(Ping).await.unwrap();

        assert_eq!(sync_count.load(Ordering::SeqCst), 1);
        assert_eq!(async_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handler_error_propagates_to_dispatch_caller() {
        let bus = InMemoryCommandBus::new();
        bus.register_sync::<Ping>(sync_handler(|_: &Ping| {
            Err(DispatchError::Handler(anyhow::anyhow!("boom")))
        }))
        .unwrap();

        let err = bus.dispatch(Ping).unwrap_err();
        assert!(matches!(err, DispatchError::Handler(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_handler_error_surfaces_through_pending_result() {
        let bus = InMemoryCommandBus::new();
        bus.register_async::<Ping>(async_handler(|_: &Ping| {
            Box::pin(async { Err(DispatchError::Handler(anyhow::anyhow!("boom"))) })
        }))
        .unwrap();

        let err = bus.dispatch_async(Ping).await.unwrap_err();
        assert!(matches!(err, DispatchError::Handler(_)));
    }

    #[test]
    fn type_mismatch_error_when_command_downcast_fails() {
        // 手动插入一个错误的条目：键是 Ping，但闭包期待 Pong
        let bus = InMemoryCommandBus::new();
        let f: ErasedSyncFn = Arc::new(|boxed_cmd| match boxed_cmd.downcast::<Pong>() {
            Ok(_) => Ok(()),
            Err(_) => Err(DispatchError::TypeMismatch {
                expected: Pong::NAME,
                found: "unknown",
            }),
        });
        bus.sync_handlers
            .insert(TypeId::of::<Ping>(), (Ping::NAME, f));

        let err = bus.dispatch(Ping).unwrap_err();
        match err {
            DispatchError::TypeMismatch { expected, .. } => assert_eq!(expected, "pong"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
