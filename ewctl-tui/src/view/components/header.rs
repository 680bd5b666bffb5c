//! 顶部标题栏

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::view::theme::{colors, Styles};

/// 应用标题
pub const APP_TITLE: &str = " 📋 Elementor WhatsApp Manager";

/// 面包屑分隔符
pub const CRUMB_SEPARATOR: &str = " › ";

/// 渲染标题栏：左侧标题和面包屑，右侧 profile
pub fn render(frame: &mut Frame, area: Rect, breadcrumbs: &[String], profile: &str) {
    let c = colors();
    let bar = Style::default().bg(c.highlight).fg(c.selected_fg);

    let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);

    let status = format!("Profile: {profile} ");
    let status_width = u16::try_from(status.chars().count()).unwrap_or(u16::MAX);
    let cols = Layout::horizontal([Constraint::Min(1), Constraint::Length(status_width)])
        .split(rows[0]);

    frame.render_widget(
        Paragraph::new(APP_TITLE).style(bar.patch(Styles::title().fg(c.selected_fg))),
        cols[0],
    );
    frame.render_widget(
        Paragraph::new(status).style(bar).alignment(Alignment::Right),
        cols[1],
    );

    let crumbs = format!(" {}", breadcrumbs.join(CRUMB_SEPARATOR));
    frame.render_widget(Paragraph::new(Line::styled(crumbs, Styles::muted())), rows[1]);
}
