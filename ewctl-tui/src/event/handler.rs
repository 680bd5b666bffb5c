//! 事件处理器：把 crossterm 事件翻译成消息

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::message::Message;

/// 轮询事件
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// 处理事件，返回对应的消息；无关事件返回 None
pub fn handle_event(event: Event) -> Option<Message> {
    match event {
        Event::Key(key) => Some(Message::Key(key)),
        Event::Resize(width, height) => Some(Message::Resize { width, height }),
        Event::Mouse(mouse) => handle_mouse_event(mouse),
        _ => None,
    }
}

/// 滚轮映射为上下方向键
fn handle_mouse_event(mouse: MouseEvent) -> Option<Message> {
    let code = match mouse.kind {
        MouseEventKind::ScrollUp => KeyCode::Up,
        MouseEventKind::ScrollDown => KeyCode::Down,
        _ => return None,
    };
    Some(Message::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_becomes_message() {
        assert_eq!(
            handle_event(Event::Resize(80, 24)),
            Some(Message::Resize {
                width: 80,
                height: 24
            })
        );
    }

    #[test]
    fn scroll_maps_to_arrows() {
        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            handle_event(Event::Mouse(scroll)),
            Some(Message::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)))
        );
        assert_eq!(handle_event(Event::FocusGained), None);
    }
}
