use crate::collaborator::Collaborator;
use crate::command::Command;
use crate::error::DispatchError;
use crate::handler::{AsyncHandler, HandlerFuture, SyncHandler};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// 协作者注册表（Dependency Registry）
/// - 通过 TypeId 保存各协作者标识对应的活动实例
/// - 解析失败即硬失败，绝不退化为默认值/空操作
/// - 重复注册同一标识直接报错，尽早暴露装配错误
pub struct CollaboratorRegistry {
    entries: DashMap<TypeId, (&'static str, Arc<dyn Any + Send + Sync>)>,
}

impl Default for CollaboratorRegistry {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl CollaboratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册协作者实例
    ///
    /// 同一标识已有实例时返回 `AlreadyRegisteredCollaborator`。
    pub fn register<T: Collaborator>(&self, instance: T) -> Result<(), DispatchError> {
        let key = TypeId::of::<T>();

        if self.entries.contains_key(&key) {
            return Err(DispatchError::AlreadyRegisteredCollaborator {
                collaborator: T::NAME,
            });
        }

        self.entries.insert(key, (T::NAME, Arc::new(instance)));

        Ok(())
    }

    /// 解析协作者实例
    ///
    /// 未注册时返回 `UnresolvedCollaborator`。
    pub fn resolve<T: Collaborator>(&self) -> Result<Arc<T>, DispatchError> {
        let Some(instance) = self
            .entries
            .get(&TypeId::of::<T>())
            .map(|e| e.value().1.clone())
        else {
            return Err(DispatchError::UnresolvedCollaborator {
                collaborator: T::NAME,
            });
        };

        // 正常情况下这里的 downcast 永远不会失败（键与实例同一泛型 T）
        instance
            .downcast::<T>()
            .map_err(|_| DispatchError::TypeMismatch {
                expected: T::NAME,
                found: "unknown",
            })
    }

    /// 获取已注册的协作者名称列表（只读视图）
    pub fn registered(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.value().0).collect()
    }
}

/// 依赖绑定：把多参处理器变换为单参处理器的纯变换。
///
/// 协作者在注册时刻立即解析并部分应用（而非分发时刻），
/// 缺失的协作者在任何命令分发之前就会暴露。
impl CollaboratorRegistry {
    /// 绑定一个协作者到同步处理器
    pub fn bind_sync<C, D, F>(&self, f: F) -> Result<SyncHandler<C>, DispatchError>
    where
        C: Command,
        D: Collaborator,
        F: Fn(&C, &D) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        let d = self.resolve::<D>()?;
        Ok(Arc::new(move |cmd| f(cmd, &d)))
    }

    /// 绑定两个协作者到同步处理器
    pub fn bind_sync2<C, D1, D2, F>(&self, f: F) -> Result<SyncHandler<C>, DispatchError>
    where
        C: Command,
        D1: Collaborator,
        D2: Collaborator,
        F: Fn(&C, &D1, &D2) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        let d1 = self.resolve::<D1>()?;
        let d2 = self.resolve::<D2>()?;
        Ok(Arc::new(move |cmd| f(cmd, &d1, &d2)))
    }

    /// 绑定一个协作者到异步处理器
    ///
    /// 异步侧以 `Arc<D>` 传递，便于返回的 future 跨 await 持有协作者。
    pub fn bind_async<C, D, F>(&self, f: F) -> Result<AsyncHandler<C>, DispatchError>
    where
        C: Command,
        D: Collaborator,
        F: for<'a> Fn(&'a C, Arc<D>) -> HandlerFuture<'a> + Send + Sync + 'static,
    {
        let d = self.resolve::<D>()?;
        Ok(Arc::new(move |cmd| f(cmd, d.clone())))
    }

    /// 绑定两个协作者到异步处理器
    pub fn bind_async2<C, D1, D2, F>(&self, f: F) -> Result<AsyncHandler<C>, DispatchError>
    where
        C: Command,
        D1: Collaborator,
        D2: Collaborator,
        F: for<'a> Fn(&'a C, Arc<D1>, Arc<D2>) -> HandlerFuture<'a> + Send + Sync + 'static,
    {
        let d1 = self.resolve::<D1>()?;
        let d2 = self.resolve::<D2>()?;
        Ok(Arc::new(move |cmd| f(cmd, d1.clone(), d2.clone())))
    }
}
