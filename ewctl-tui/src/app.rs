//! 主循环
//!
//! 循环本身是同步的：
//!
//! ```text
//! 1. 渲染
//! 2. 用 try_recv 取出已完成命令的结果
//! 3. 轮询终端事件 100ms，超时产生 Tick
//! 4. 更新状态，把返回的异步命令交给执行器
//! ```

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::backend::CommandExecutor;
use crate::event;
use crate::message::Message;
use crate::model::App;
use crate::update;
use crate::util::Term;
use crate::view;

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// 处理一条消息并调度产生的命令
pub fn dispatch(app: &mut App, executor: &CommandExecutor, msg: Message) {
    for command in update::process(app, msg) {
        executor.spawn(command);
    }
}

pub fn run(
    terminal: &mut Term,
    app: &mut App,
    executor: &CommandExecutor,
    results: &mut UnboundedReceiver<Message>,
) -> Result<()> {
    loop {
        // 1. 渲染 UI
        terminal.draw(|frame| {
            view::render(app, frame);
        })?;

        // 2. 检查是否应该退出
        if app.should_quit {
            break;
        }

        // 3. 取出异步结果
        while let Ok(msg) = results.try_recv() {
            dispatch(app, executor, msg);
        }

        // 4. 轮询事件（100ms 超时）
        let msg = match event::poll_event(POLL_TIMEOUT)? {
            Some(event) => event::handle_event(event),
            None => Some(Message::Tick),
        };

        // 5. 更新状态
        if let Some(msg) = msg {
            dispatch(app, executor, msg);
        }
    }

    Ok(())
}
