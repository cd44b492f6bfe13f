//! 处理器装饰（Decoration）
//!
//! 用前置/后置回调包裹已有处理器，得到契约不变的新处理器：
//! - 装饰不修改原处理器值，总是返回新值，可任意嵌套；
//! - 嵌套时外层装饰包裹内层（外层 before 最先、外层 after 最后）；
//! - 回调收到的命令引用与处理器收到的完全相同，装饰不改变路由；
//! - 任一步返回错误即中止后续步骤，错误原样传给分发方。
//!
use crate::command::Command;
use crate::error::DispatchError;
use crate::handler::{AsyncHandler, SyncHandler};
use std::sync::Arc;

/// 前置装饰：先执行 `before`，再执行原处理器。
///
/// `before` 返回错误时原处理器不执行。
pub fn decorate_before<C, F>(handler: SyncHandler<C>, before: F) -> SyncHandler<C>
where
    C: Command,
    F: Fn(&C) -> Result<(), DispatchError> + Send + Sync + 'static,
{
    Arc::new(move |cmd| {
        before(cmd)?;
        handler(cmd)
    })
}

/// 环绕装饰：依次执行 `before`、原处理器、`after`。
///
/// 顺序组合而非清理保证：处理器返回错误时 `after` 不执行。
pub fn decorate_around<C, F, G>(handler: SyncHandler<C>, before: F, after: G) -> SyncHandler<C>
where
    C: Command,
    F: Fn(&C) -> Result<(), DispatchError> + Send + Sync + 'static,
    G: Fn(&C) -> Result<(), DispatchError> + Send + Sync + 'static,
{
    Arc::new(move |cmd| {
        before(cmd)?;
        handler(cmd)?;
        after(cmd)
    })
}

/// [`decorate_before`] 的异步处理器版本；回调本身仍是同步步骤
pub fn decorate_before_async<C, F>(handler: AsyncHandler<C>, before: F) -> AsyncHandler<C>
where
    C: Command,
    F: Fn(&C) -> Result<(), DispatchError> + Send + Sync + 'static,
{
    let before = Arc::new(before);
    Arc::new(move |cmd| {
        let handler = handler.clone();
        let before = before.clone();
        Box::pin(async move {
            before(cmd)?;
            handler(cmd).await
        })
    })
}

/// [`decorate_around`] 的异步处理器版本；回调本身仍是同步步骤
pub fn decorate_around_async<C, F, G>(
    handler: AsyncHandler<C>,
    before: F,
    after: G,
) -> AsyncHandler<C>
where
    C: Command,
    F: Fn(&C) -> Result<(), DispatchError> + Send + Sync + 'static,
    G: Fn(&C) -> Result<(), DispatchError> + Send + Sync + 'static,
{
    let before = Arc::new(before);
    let after = Arc::new(after);
    Arc::new(move |cmd| {
        let handler = handler.clone();
        let before = before.clone();
        let after = after.clone();
        Box::pin(async move {
            before(cmd)?;
            handler(cmd).await?;
            after(cmd)
        })
    })
}
