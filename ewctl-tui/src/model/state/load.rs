//! 异步加载状态
//!
//! 列表、仪表盘和编辑视图共用的状态机：
//!
//! ```text
//!   Idle ──start──▶ Loading ──ok──▶ Ready ──start/force──▶ Loading
//!                      │
//!                      └──err──▶ Failed ──retry──▶ Loading
//! ```
//!
//! `pending` 保存最近一次签发的票据。结果消息的票据与之不符时直接丢弃，
//! 因此迟到的旧结果不会覆盖新数据。

use crate::error::AppError;
use crate::message::Ticket;
use crate::model::ViewId;

/// 加载阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// 渲染模式，四者互斥
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Error,
    Loading,
    Done,
    Normal,
}

/// 按优先级选择渲染模式：错误 > 加载中 > 完成 > 正常
pub fn render_mode(has_error: bool, loading: bool, done: bool) -> RenderMode {
    if has_error {
        RenderMode::Error
    } else if loading {
        RenderMode::Loading
    } else if done {
        RenderMode::Done
    } else {
        RenderMode::Normal
    }
}

/// 可加载的数据
#[derive(Debug, Clone)]
pub struct Loadable<T> {
    data: Option<T>,
    error: Option<AppError>,
    pending: Option<Ticket>,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            pending: None,
        }
    }
}

impl<T> Loadable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前阶段
    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.data.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    /// 正在等待的票据
    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    /// 开始加载，已有加载在途时返回 None
    pub fn start(&mut self, origin: ViewId) -> Option<Ticket> {
        if self.pending.is_some() {
            return None;
        }
        Some(self.force(origin))
    }

    /// 强制加载，总是签发新票据，旧票据的结果将被丢弃
    pub fn force(&mut self, origin: ViewId) -> Ticket {
        let ticket = Ticket::issue(origin);
        self.pending = Some(ticket);
        self.error = None;
        ticket
    }

    /// 用户手动重试：不可重试的错误返回 None
    pub fn retry(&mut self, origin: ViewId) -> Option<Ticket> {
        if self.error.as_ref().is_some_and(|e| !e.is_retryable()) {
            return None;
        }
        self.start(origin)
    }

    /// 票据是否为当前等待的那张
    pub fn accepts(&self, ticket: Ticket) -> bool {
        self.pending == Some(ticket)
    }

    /// 应用结果，票据不匹配时丢弃并返回 false
    pub fn resolve(&mut self, ticket: Ticket, result: Result<T, AppError>) -> bool {
        if !self.accepts(ticket) {
            log::debug!(
                "dropping stale result #{} for {:?}",
                ticket.id,
                ticket.origin
            );
            return false;
        }
        self.pending = None;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
        true
    }

    /// 直接进入失败状态（不经过命令）
    pub fn fail(&mut self, error: AppError) {
        self.pending = None;
        self.error = Some(error);
    }

    /// 清除错误，保留数据
    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_noop_while_loading() {
        let mut l: Loadable<u32> = Loadable::new();
        assert_eq!(l.phase(), Phase::Idle);
        assert!(l.start(ViewId::FormsList).is_some());
        assert!(l.start(ViewId::FormsList).is_none());
        assert_eq!(l.phase(), Phase::Loading);
    }

    #[test]
    fn force_supersedes_pending_ticket() {
        let mut l: Loadable<u32> = Loadable::new();
        let old = l.start(ViewId::FormsList).unwrap();
        let new = l.force(ViewId::FormsList);
        assert!(!l.resolve(old, Ok(1)));
        assert!(l.is_loading());
        assert!(l.resolve(new, Ok(2)));
        assert_eq!(l.data(), Some(&2));
        assert_eq!(l.phase(), Phase::Ready);
    }

    #[test]
    fn failure_then_retry() {
        let mut l: Loadable<u32> = Loadable::new();
        let t = l.start(ViewId::ContactsList).unwrap();
        l.resolve(t, Err(AppError::LoadFailed("boom".into())));
        assert_eq!(l.phase(), Phase::Failed);
        assert!(l.retry(ViewId::ContactsList).is_some());
        assert!(l.error().is_none());
    }

    #[test]
    fn not_initialized_blocks_retry() {
        let mut l: Loadable<u32> = Loadable::new();
        l.fail(AppError::NotInitialized("D1 client"));
        assert!(l.retry(ViewId::ContactsList).is_none());
        assert_eq!(l.phase(), Phase::Failed);
    }

    #[test]
    fn render_mode_priority() {
        assert_eq!(render_mode(true, true, true), RenderMode::Error);
        assert_eq!(render_mode(false, true, true), RenderMode::Loading);
        assert_eq!(render_mode(false, false, true), RenderMode::Done);
        assert_eq!(render_mode(false, false, false), RenderMode::Normal);
    }
}
