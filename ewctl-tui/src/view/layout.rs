//! 主布局渲染

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders},
    Frame,
};

use crate::model::App;
use crate::pages::SubView;

use super::components::{header, panel, statusbar};
use super::theme::colors;

/// 渲染主布局
pub fn render(app: &App, frame: &mut Frame) {
    let size = frame.area();

    // 顶层错误覆盖一切
    if let Some(error) = &app.error {
        panel::render_error(frame, size, error, "Press any key to continue");
        return;
    }

    // 三层布局：标题栏 + 主内容区 + 状态栏
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // 标题 + 面包屑
            Constraint::Min(1),    // 主内容区
            Constraint::Length(1), // 状态栏
        ])
        .split(size);

    header::render(
        frame,
        main_layout[0],
        app.navigation.breadcrumbs(),
        &app.profile,
    );
    render_content(app, frame, main_layout[1]);
    statusbar::render(frame, main_layout[2], app.active());
}

/// 渲染当前视图
fn render_content(app: &App, frame: &mut Frame, area: Rect) {
    let c = colors();
    let Some(view) = app.active_view() else {
        return;
    };

    let area = match view.desired_size() {
        Some((width, _)) => fit_width(width, area),
        None => area,
    };

    let block = Block::default()
        .title(format!(" {} ", app.active().title()))
        .title_style(Style::default().fg(c.fg).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(c.border_focused));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);
    view.render(frame, inner_area);
}

/// 水平居中，宽度不超过可用区域
fn fit_width(width: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let x = area.x + (area.width - width) / 2;
    Rect::new(x, area.y, width, area.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_header_and_footer() {
        let app = App::default();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Elementor WhatsApp Manager"));
        assert!(text.contains("Profile: default"));
        assert!(text.contains("Quit"));
    }

    #[test]
    fn top_level_error_preempts_layout() {
        let mut app = App::default();
        app.error = Some(AppError::Navigation("no such view".into()));
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("no such view"));
        assert!(!text.contains("Profile:"));
    }

    #[test]
    fn fit_width_centers() {
        let area = Rect::new(0, 3, 120, 20);
        assert_eq!(fit_width(96, area), Rect::new(12, 3, 96, 20));
        assert_eq!(fit_width(200, area), area);
    }
}
