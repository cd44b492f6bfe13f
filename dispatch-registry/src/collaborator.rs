/// 协作者（Collaborator）
///
/// 处理器依赖的具名能力（如二元运算函数、任意值的输出端），
/// 以自身的静态类型为标识，与命令标识空间相互独立。
/// 同一标识同一时刻至多存在一个活动实例（见
/// [`CollaboratorRegistry`](crate::collaborator_registry::CollaboratorRegistry)）。
///
/// 协作者可能被多个并发分发同时调用，其内部逻辑的线程安全由协作者自身负责。
pub trait Collaborator: Send + Sync + 'static {
    /// 协作者的稳定名称（用于错误信息）
    const NAME: &'static str;
}
