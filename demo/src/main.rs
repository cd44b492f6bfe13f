use dispatch_registry::collaborator::Collaborator;
use dispatch_registry::command::Command;
use dispatch_registry::command_bus::CommandBus;
use dispatch_registry::decorate::{decorate_around, decorate_before};
use dispatch_registry::handler::sync_handler;
use dispatch_registry::{CollaboratorRegistry, InMemoryCommandBus};
use std::sync::Arc;

struct DoSomething {
    name: String,
}

impl Command for DoSomething {
    const NAME: &'static str = "do_something";
}

struct AddNumbers {
    a: i64,
    b: i64,
}

impl Command for AddNumbers {
    const NAME: &'static str = "add_numbers";
}

struct Adder(pub fn(i64, i64) -> i64);

impl Collaborator for Adder {
    const NAME: &'static str = "adder";
}

struct Printer(pub Box<dyn Fn(i64) + Send + Sync>);

impl Collaborator for Printer {
    const NAME: &'static str = "printer";
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = InMemoryCommandBus::new();
    let deps = CollaboratorRegistry::new();

    // 装饰：日志前置 + 审计环绕
    let handler = sync_handler(|cmd: &DoSomething| {
        println!("handling do_something with name {}", cmd.name);
        Ok(())
    });
    let handler = decorate_before(handler, |_: &DoSomething| {
        println!("doing logging");
        Ok(())
    });
    let handler = decorate_around(
        handler,
        |_: &DoSomething| {
            println!("starting audit");
            Ok(())
        },
        |_: &DoSomething| {
            println!("ending audit");
            Ok(())
        },
    );
    bus.register_sync::<DoSomething>(handler)?;

    bus.dispatch(DoSomething {
        name: "World".into(),
    })?;

    // 依赖注入：注册协作者，再绑定到处理器
    deps.register(Adder(|a, b| a + b))?;
    deps.register(Printer(Box::new(|v| println!("{v}"))))?;

    bus.register_sync::<AddNumbers>(deps.bind_sync2(
        |cmd: &AddNumbers, adder: &Adder, printer: &Printer| {
            let result = (adder.0)(cmd.a, cmd.b);
            (printer.0)(result);
            Ok(())
        },
    )?)?;

    bus.register_async::<AddNumbers>(deps.bind_async2(
        |cmd: &AddNumbers, adder: Arc<Adder>, printer: Arc<Printer>| {
            let (a, b) = (cmd.a, cmd.b);
            Box::pin(async move {
                let result = (adder.0)(a, b);
                tokio::task::spawn_blocking(move || (printer.0)(result))
                    .await
                    .map_err(anyhow::Error::from)?;
                Ok(())
            })
        },
    )?)?;

    // 同步分发 -> 打印 8
    bus.dispatch(AddNumbers { a: 3, b: 5 })?;

    // 异步分发 -> 挂起结果在打印 12 之后解析
    bus.dispatch_async(AddNumbers { a: 8, b: 4 }).await?;

    // 未注册的命令 -> 静默跳过；严格路由的调用方显式检查注册状态
    struct Unrouted;
    impl Command for Unrouted {
        const NAME: &'static str = "unrouted";
    }
    bus.dispatch(Unrouted)?;
    if !bus.contains_sync::<Unrouted>() {
        eprintln!("no handler registered for command: {}", Unrouted::NAME);
    }

    Ok(())
}
