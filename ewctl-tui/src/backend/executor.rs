//! 命令执行器
//!
//! 事件循环本身是同步的。执行器把每条命令作为一个 tokio 任务运行，
//! 任务结束时恰好向结果通道发送一条消息；主循环每一帧用 `try_recv` 取出。

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use super::Services;
use crate::message::{Command, Message};

/// 命令执行器
#[derive(Clone)]
pub struct CommandExecutor {
    handle: Handle,
    services: Arc<Services>,
    tx: UnboundedSender<Message>,
}

impl CommandExecutor {
    pub fn new(handle: Handle, services: Arc<Services>, tx: UnboundedSender<Message>) -> Self {
        Self {
            handle,
            services,
            tx,
        }
    }

    /// 调度一条命令，不阻塞调用方
    pub fn spawn(&self, command: Command) {
        if let Command::Emit(message) = command {
            if self.tx.send(message).is_err() {
                log::debug!("result channel closed, dropping emitted message");
            }
            return;
        }

        if let Some(ticket) = command.ticket() {
            log::debug!(
                "dispatch {} #{} from {:?}",
                command.name(),
                ticket.id,
                ticket.origin
            );
        }

        let services = Arc::clone(&self.services);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let message = services.execute(command).await;
            if tx.send(message).is_err() {
                log::debug!("result channel closed, dropping command result");
            }
        });
    }
}
