use crate::command::Command;
use crate::error::DispatchError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// 同步处理器：一等函数值（闭包），接收命令引用并就地执行完毕。
///
/// 处理器不是带状态的对象；需要协作者时以闭包捕获
/// （见 [`CollaboratorRegistry`](crate::collaborator_registry::CollaboratorRegistry) 的 bind 系列）。
pub type SyncHandler<C> = Arc<dyn Fn(&C) -> Result<(), DispatchError> + Send + Sync>;

/// 异步处理器的挂起结果：在处理器全部工作（含其自行调度并等待的部分）完成时解析
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>>;

/// 异步处理器：借用命令、返回挂起结果的一等函数值
pub type AsyncHandler<C> = Arc<dyn for<'a> Fn(&'a C) -> HandlerFuture<'a> + Send + Sync>;

/// 将普通闭包包装为 [`SyncHandler`]
pub fn sync_handler<C, F>(f: F) -> SyncHandler<C>
where
    C: Command,
    F: Fn(&C) -> Result<(), DispatchError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 将返回 [`HandlerFuture`] 的闭包包装为 [`AsyncHandler`]
pub fn async_handler<C, F>(f: F) -> AsyncHandler<C>
where
    C: Command,
    F: for<'a> Fn(&'a C) -> HandlerFuture<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}
