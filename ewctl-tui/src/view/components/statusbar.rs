//! 底部状态栏组件

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::model::ViewId;
use crate::view::theme::Styles;

/// 当前视图的快捷键提示，仅由视图决定
pub fn help_text(view: ViewId) -> &'static str {
    match view {
        ViewId::Dashboard => "1-5: Navigate • ?: Help • q: Quit",
        ViewId::FormsList => {
            "↑↓/jk: Navigate • n: New • e: Edit • d: Delete • t: Test • r: Refresh • Esc: Back"
        }
        ViewId::ContactsList => {
            "↑↓/jk: Navigate • a: Add • e: Edit • d: Delete • /: Filter • r: Refresh • Esc: Back"
        }
        ViewId::FormCreate | ViewId::FormEdit | ViewId::ContactCreate | ViewId::ContactEdit => {
            "Tab: Next Field • Enter: Submit • Esc: Cancel"
        }
        ViewId::WebhookTest => "Tab: Next Field • Enter: Send • Ctrl+G: Sample • Esc: Back",
        ViewId::Settings => "↑↓: Navigate • Enter: Toggle • s: Save • Esc: Back",
    }
}

/// 渲染状态栏
pub fn render(frame: &mut Frame, area: Rect, view: ViewId) {
    let mut spans = Vec::new();

    for (i, hint) in help_text(view).split(" • ").enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        match hint.split_once(": ") {
            Some((key, desc)) => {
                spans.push(Span::styled(key, Styles::hint_key()));
                spans.push(Span::raw(" "));
                spans.push(Span::styled(desc, Styles::hint_desc()));
            }
            None => spans.push(Span::styled(hint, Styles::hint_desc())),
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Styles::statusbar());
    frame.render_widget(paragraph, area);
}
