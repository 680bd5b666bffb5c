//! 输入表单状态
//!
//! 新建/编辑视图和 webhook 测试共用的简单表单：一列字段，一个焦点。
//! 字段分三类：
//!     · Text      单行文本
//!     · Toggle    开关（空格 / ←→ / y / n）
//!     · Choice    多选列表（←→ 移动光标，空格选中）

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// 字段类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Toggle,
    Choice,
}

/// 多选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            selected: false,
        }
    }
}

/// 表单字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
    pub checked: bool,
    pub options: Vec<ChoiceOption>,
    /// Choice 字段的光标
    pub cursor: usize,
    pub read_only: bool,
    /// 输入框为空时的提示
    pub placeholder: &'static str,
}

impl Field {
    fn base(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            value: String::new(),
            checked: false,
            options: Vec::new(),
            cursor: 0,
            read_only: false,
            placeholder: "",
        }
    }

    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self::base(key, label, FieldKind::Text)
    }

    pub fn toggle(key: &'static str, label: &'static str) -> Self {
        Self::base(key, label, FieldKind::Toggle)
    }

    pub fn choice(key: &'static str, label: &'static str) -> Self {
        Self::base(key, label, FieldKind::Choice)
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// 按键处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// 没有影响字段值（焦点移动或未识别的按键）
    None,
    /// 某个字段的值变了
    Changed(&'static str),
    /// 请求提交
    Submit,
}

/// 输入表单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputForm {
    fields: Vec<Field>,
    focused: usize,
}

impl InputForm {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields, focused: 0 }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// 当前焦点下标
    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn focused_key(&self) -> Option<&'static str> {
        self.fields.get(self.focused).map(|f| f.key)
    }

    pub fn focus(&mut self, key: &str) {
        if let Some(i) = self.fields.iter().position(|f| f.key == key) {
            self.focused = i;
        }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    fn is_last(&self) -> bool {
        self.focused + 1 == self.fields.len()
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    /// 文本值（去除首尾空白），字段不存在时为空串
    pub fn value(&self, key: &str) -> &str {
        self.field(key).map_or("", |f| f.value.trim())
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        if let Some(f) = self.field_mut(key) {
            f.value = value.into();
        }
    }

    pub fn checked(&self, key: &str) -> bool {
        self.field(key).is_some_and(|f| f.checked)
    }

    pub fn set_checked(&mut self, key: &str, checked: bool) {
        if let Some(f) = self.field_mut(key) {
            f.checked = checked;
        }
    }

    /// 替换多选项，保留仍然存在的已选值
    pub fn set_options(&mut self, key: &str, options: Vec<ChoiceOption>) {
        if let Some(f) = self.field_mut(key) {
            let keep: Vec<String> = f
                .options
                .iter()
                .filter(|o| o.selected)
                .map(|o| o.value.clone())
                .collect();
            f.options = options;
            for o in &mut f.options {
                if keep.contains(&o.value) {
                    o.selected = true;
                }
            }
            f.cursor = f.cursor.min(f.options.len().saturating_sub(1));
        }
    }

    /// 已选中的值
    pub fn selected_values(&self, key: &str) -> Vec<String> {
        self.field(key)
            .map(|f| {
                f.options
                    .iter()
                    .filter(|o| o.selected)
                    .map(|o| o.value.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 处理按键
    pub fn handle_key(&mut self, key: &KeyEvent) -> InputAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('s') {
            return InputAction::Submit;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                return InputAction::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                return InputAction::None;
            }
            KeyCode::Enter => {
                if self.is_last() {
                    return InputAction::Submit;
                }
                self.focus_next();
                return InputAction::None;
            }
            _ => {}
        }

        if ctrl || key.modifiers.contains(KeyModifiers::ALT) {
            return InputAction::None;
        }

        let Some(field) = self.fields.get_mut(self.focused) else {
            return InputAction::None;
        };
        if field.read_only {
            return InputAction::None;
        }

        let changed = match field.kind {
            FieldKind::Text => match key.code {
                KeyCode::Char(c) => {
                    field.value.push(c);
                    true
                }
                KeyCode::Backspace => field.value.pop().is_some(),
                _ => false,
            },
            FieldKind::Toggle => match key.code {
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    field.checked = !field.checked;
                    true
                }
                KeyCode::Char('y' | 'Y') => {
                    field.checked = true;
                    true
                }
                KeyCode::Char('n' | 'N') => {
                    field.checked = false;
                    true
                }
                _ => false,
            },
            FieldKind::Choice => match key.code {
                KeyCode::Left => {
                    field.cursor = field.cursor.saturating_sub(1);
                    false
                }
                KeyCode::Right => {
                    if field.cursor + 1 < field.options.len() {
                        field.cursor += 1;
                    }
                    false
                }
                KeyCode::Char(' ') => match field.options.get_mut(field.cursor) {
                    Some(option) => {
                        option.selected = !option.selected;
                        true
                    }
                    None => false,
                },
                _ => false,
            },
        };

        if changed {
            InputAction::Changed(field.key)
        } else {
            InputAction::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn form() -> InputForm {
        InputForm::new(vec![
            Field::text("name", "Name"),
            Field::choice("recipients", "Recipients"),
            Field::toggle("confirm", "Confirm"),
        ])
    }

    #[test]
    fn typing_edits_focused_text_field() {
        let mut f = form();
        assert_eq!(f.handle_key(&key(KeyCode::Char('A'))), InputAction::Changed("name"));
        f.handle_key(&key(KeyCode::Char('b')));
        f.handle_key(&key(KeyCode::Backspace));
        assert_eq!(f.value("name"), "A");
    }

    #[test]
    fn enter_submits_only_on_last_field() {
        let mut f = form();
        assert_eq!(f.handle_key(&key(KeyCode::Enter)), InputAction::None);
        assert_eq!(f.focused_key(), Some("recipients"));
        f.handle_key(&key(KeyCode::Tab));
        assert_eq!(f.handle_key(&key(KeyCode::Enter)), InputAction::Submit);
    }

    #[test]
    fn ctrl_s_submits_anywhere() {
        let mut f = form();
        let k = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(f.handle_key(&k), InputAction::Submit);
        assert_eq!(f.value("name"), "");
    }

    #[test]
    fn toggle_accepts_y_and_n() {
        let mut f = form();
        f.focus("confirm");
        f.handle_key(&key(KeyCode::Char('y')));
        assert!(f.checked("confirm"));
        f.handle_key(&key(KeyCode::Char(' ')));
        assert!(!f.checked("confirm"));
    }

    #[test]
    fn choice_selection_survives_option_refresh() {
        let mut f = form();
        f.set_options(
            "recipients",
            vec![ChoiceOption::new("Ana", "1"), ChoiceOption::new("Bo", "2")],
        );
        f.focus("recipients");
        f.handle_key(&key(KeyCode::Right));
        f.handle_key(&key(KeyCode::Char(' ')));
        assert_eq!(f.selected_values("recipients"), ["2"]);

        f.set_options(
            "recipients",
            vec![ChoiceOption::new("Bo", "2"), ChoiceOption::new("Cy", "3")],
        );
        assert_eq!(f.selected_values("recipients"), ["2"]);
    }

    #[test]
    fn read_only_field_ignores_typing() {
        let mut f = InputForm::new(vec![Field::text("id", "ID").with_value("x").read_only()]);
        assert_eq!(f.handle_key(&key(KeyCode::Char('y'))), InputAction::None);
        assert_eq!(f.value("id"), "x");
    }
}
