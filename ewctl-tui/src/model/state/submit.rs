//! 提交状态
//!
//! 新建/编辑视图的提交流程：`begin` 签发票据，`finish` 应用结果。
//! 成功后进入完成状态，之后视图不再接受输入，因此不可能重复提交；
//! 失败时只记录错误，草稿由视图保留。

use crate::error::AppError;
use crate::message::Ticket;
use crate::model::ViewId;

use super::{render_mode, RenderMode};

#[derive(Debug, Clone, Default)]
pub struct Submission {
    pending: Option<Ticket>,
    error: Option<AppError>,
    done: bool,
}

impl Submission {
    /// 开始提交
    pub fn begin(&mut self, origin: ViewId) -> Ticket {
        let ticket = Ticket::issue(origin);
        self.pending = Some(ticket);
        self.error = None;
        ticket
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    /// 是否在等待或已完成，此时不再处理输入
    pub fn is_locked(&self) -> bool {
        self.pending.is_some() || self.done
    }

    /// 应用结果，票据不符时返回 None；成功时进入完成状态并返回值
    pub fn finish<T>(&mut self, ticket: Ticket, result: Result<T, AppError>) -> Option<T> {
        if self.pending != Some(ticket) {
            log::debug!("dropping stale submit result #{}", ticket.id);
            return None;
        }
        self.pending = None;
        match result {
            Ok(value) => {
                self.done = true;
                Some(value)
            }
            Err(e) => {
                log::warn!("submit from {:?} failed: {e}", ticket.origin);
                self.error = Some(e);
                None
            }
        }
    }

    /// 关闭错误面板，返回是否有错误被关闭
    pub fn dismiss_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    pub fn render_mode(&self) -> RenderMode {
        render_mode(self.error.is_some(), self.pending.is_some(), self.done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_locks_submission() {
        let mut s = Submission::default();
        let t = s.begin(ViewId::FormCreate);
        assert!(s.is_locked());
        assert_eq!(s.finish(t, Ok(7)), Some(7));
        assert!(s.is_done());
        assert!(s.is_locked());
        assert_eq!(s.render_mode(), RenderMode::Done);
    }

    #[test]
    fn failure_keeps_error_until_dismissed() {
        let mut s = Submission::default();
        let t = s.begin(ViewId::ContactCreate);
        assert_eq!(
            s.finish::<()>(t, Err(AppError::SubmitFailed("nope".into()))),
            None
        );
        assert_eq!(s.render_mode(), RenderMode::Error);
        assert!(!s.is_locked());
        assert!(s.dismiss_error());
        assert_eq!(s.render_mode(), RenderMode::Normal);
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut s = Submission::default();
        let old = s.begin(ViewId::FormEdit);
        let _new = s.begin(ViewId::FormEdit);
        assert_eq!(s.finish(old, Ok(())), None);
        assert!(s.is_pending());
    }
}
