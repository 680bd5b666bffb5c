//! 输入表单渲染

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::model::state::{Field, FieldKind, InputForm};
use crate::view::theme::{colors, Styles};

/// 渲染表单，`notice` 显示在末尾（校验提示等）
pub fn render(form: &InputForm, frame: &mut Frame, area: Rect, notice: Option<&str>) {
    let mut lines = Vec::new();

    for (i, field) in form.fields().iter().enumerate() {
        let focused = i == form.focused();
        lines.push(label_line(field, focused));
        lines.push(value_line(field, focused));
        lines.push(Line::from(""));
    }

    if let Some(notice) = notice {
        lines.push(Line::styled(format!("  ⚠ {notice}"), Styles::warning()));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn label_line(field: &Field, focused: bool) -> Line<'static> {
    let c = colors();
    let marker = if focused { "▶ " } else { "  " };
    let style = if focused {
        Style::default()
            .fg(c.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(c.fg)
    };
    let mut spans = vec![Span::styled(format!("{marker}{}", field.label), style)];
    if field.read_only {
        spans.push(Span::styled(" (read-only)", Styles::muted()));
    }
    if focused && field.kind == FieldKind::Choice {
        spans.push(Span::styled(" (←→ move, Space select)", Styles::muted()));
    }
    Line::from(spans)
}

fn value_line(field: &Field, focused: bool) -> Line<'static> {
    let c = colors();
    match field.kind {
        FieldKind::Text => {
            if field.value.is_empty() && !focused {
                Line::styled(format!("    {}", field.placeholder), Styles::muted())
            } else {
                let cursor = if focused && !field.read_only { "▎" } else { "" };
                Line::styled(
                    format!("    {}{cursor}", field.value),
                    Style::default().fg(c.fg),
                )
            }
        }
        FieldKind::Toggle => {
            let (mark, text) = if field.checked {
                ("[x]", "Yes")
            } else {
                ("[ ]", "No")
            };
            let style = if field.checked {
                Styles::success()
            } else {
                Style::default().fg(c.fg)
            };
            Line::styled(format!("    {mark} {text}"), style)
        }
        FieldKind::Choice => {
            if field.options.is_empty() {
                return Line::styled(format!("    {}", field.placeholder), Styles::muted());
            }
            let mut spans = vec![Span::raw("    ")];
            for (i, option) in field.options.iter().enumerate() {
                let mark = if option.selected { "[x]" } else { "[ ]" };
                let style = if focused && i == field.cursor {
                    Styles::selected()
                } else if option.selected {
                    Style::default().fg(c.success)
                } else {
                    Style::default().fg(c.fg)
                };
                spans.push(Span::styled(format!("{mark} {}", option.label), style));
                spans.push(Span::raw("  "));
            }
            Line::from(spans)
        }
    }
}
