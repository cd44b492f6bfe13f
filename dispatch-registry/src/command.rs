/// 命令（Command）
///
/// 表达一次待分发的工作单元，分发前由调用方构造、分发期间不被修改。
/// - 路由标识是命令的静态类型（`TypeId`），而非运行时字段或字符串；
///   两个不同的命令形状不可能在标识上冲突，也不存在通配/回退匹配。
/// - 建议保持语义化的“动宾结构”命名，如 `AddNumbers`、`CloseOrder`。
///
/// 关联常量：
/// - `NAME`：命令的稳定名称，仅用于错误信息与已注册列表，不参与路由。
///   避免依赖 `type_name::<T>()`。
pub trait Command: Send + Sync + 'static {
    /// 命令的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;
}
