//! 通用面板：加载中、错误、完成、确认

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::error::AppError;
use crate::view::theme::{colors, Styles};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// 计算居中区域
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// 旋转指示器的当前帧
pub fn spinner(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

/// 渲染加载中
pub fn render_loading(frame: &mut Frame, area: Rect, label: &str, tick: usize) {
    let line = Line::from(vec![
        Span::styled(spinner(tick), Style::default().fg(colors().highlight)),
        Span::raw(" "),
        Span::styled(label.to_string(), Styles::muted()),
    ]);
    let y = area.y + area.height / 2;
    let row = Rect::new(area.x, y.min(area.bottom().saturating_sub(1)), area.width, 1);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
}

/// 渲染错误面板
pub fn render_error(frame: &mut Frame, area: Rect, error: &AppError, hint: &str) {
    let lines = vec![
        Line::from(""),
        Line::styled(format!("  Error: {error}"), Styles::error()),
        Line::from(""),
        Line::styled(format!("  {hint}"), Styles::muted()),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

/// 渲染完成面板
pub fn render_done(frame: &mut Frame, area: Rect, title: &str, details: Vec<Line<'static>>) {
    let mut lines = vec![
        Line::from(""),
        Line::styled(format!("  ✓ {title}"), Styles::success()),
        Line::from(""),
    ];
    lines.extend(details);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

/// 渲染确认弹窗
pub fn render_confirm(frame: &mut Frame, area: Rect, question: &str) {
    let width = u16::try_from(question.chars().count() + 8)
        .unwrap_or(u16::MAX)
        .max(30);
    let popup = centered_rect(width, 5, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Confirm ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors().warning));

    let lines = vec![
        Line::from(question.to_string()),
        Line::from(vec![
            Span::styled("y", Styles::hint_key()),
            Span::raw(": Yes   "),
            Span::styled("n", Styles::hint_key()),
            Span::raw(": No"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        popup,
    );
}
