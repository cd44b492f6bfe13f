use crate::command::Command;
use crate::error::DispatchError;
use async_trait::async_trait;

/// 命令总线（Command Bus）
///
/// - 负责根据命令的具体类型路由到对应处理器；被动路由器，自身不做并发控制；
/// - 同步分发在调用方栈帧内执行完毕；异步分发返回挂起结果；
/// - 该 trait 带有泛型方法，通常以具体实现类型注入使用。
#[async_trait]
pub trait CommandBus: Send + Sync {
    /// 同步分发：在当前调用帧内执行匹配的处理器直至完成
    ///
    /// 未注册的命令静默跳过（返回 `Ok(())`）；需要严格路由的调用方
    /// 应显式检查注册状态。
    fn dispatch<C>(&self, cmd: C) -> Result<(), DispatchError>
    where
        C: Command;

    /// 异步分发：返回在处理器全部工作完成时解析的挂起结果
    ///
    /// 未注册时的策略与 [`dispatch`](CommandBus::dispatch) 一致。
    async fn dispatch_async<C>(&self, cmd: C) -> Result<(), DispatchError>
    where
        C: Command;
}
