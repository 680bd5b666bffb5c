//! 联系人编辑器：新建和编辑视图共用

use crossterm::event::KeyEvent;
use ewctl_store::types::validate_phone;
use ewctl_store::Contact;

use crate::model::state::{Field, InputAction, InputForm};

/// 联系人编辑器
#[derive(Debug, Clone)]
pub struct ContactEditor {
    input: InputForm,
    base: Contact,
}

impl ContactEditor {
    fn with_fields(base: Contact, confirm_label: &'static str) -> Self {
        let input = InputForm::new(vec![
            Field::text("name", "Contact Name")
                .with_value(base.name.clone())
                .with_placeholder("Full name of the contact"),
            Field::text("phone", "WhatsApp Number")
                .with_value(base.phone_number.clone())
                .with_placeholder("Country code included, e.g. 5511999999999"),
            Field::text("company", "Company").with_value(base.company.clone()),
            Field::text("role", "Role/Position").with_value(base.role.clone()),
            Field::text("notes", "Notes").with_value(base.notes.clone()),
            Field::toggle("confirm", confirm_label),
        ]);
        Self { input, base }
    }

    /// 空白联系人
    pub fn blank() -> Self {
        Self::with_fields(Contact::default(), "Create this contact?")
    }

    /// 由已有记录构建
    pub fn from_contact(contact: Contact) -> Self {
        Self::with_fields(contact, "Save changes?")
    }

    pub fn input(&self) -> &InputForm {
        &self.input
    }

    pub fn confirmed(&self) -> bool {
        self.input.checked("confirm")
    }

    pub fn confirm_label(&self) -> &'static str {
        self.input.field("confirm").map_or("Confirm", |f| f.label)
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> InputAction {
        self.input.handle_key(key)
    }

    /// 校验并生成记录，编辑时沿用原 ID
    pub fn build(&self) -> Result<Contact, String> {
        let name = self.input.value("name");
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        let phone = self.input.value("phone");
        if phone.is_empty() {
            return Err("Phone number is required".to_string());
        }
        if validate_phone(phone).is_err() {
            return Err("Invalid phone number format".to_string());
        }

        Ok(Contact {
            name: name.to_string(),
            phone_number: phone.to_string(),
            company: self.input.value("company").to_string(),
            role: self.input.value("role").to_string(),
            notes: self.input.value("notes").to_string(),
            ..self.base.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn type_text(editor: &mut ContactEditor, text: &str) {
        for c in text.chars() {
            editor.handle_key(&KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn phone_is_validated() {
        let mut editor = ContactEditor::blank();
        type_text(&mut editor, "Ana");
        editor.input.focus("phone");
        type_text(&mut editor, "12ab");
        assert_eq!(editor.build(), Err("Invalid phone number format".to_string()));

        let mut editor = ContactEditor::blank();
        type_text(&mut editor, "Ana");
        assert_eq!(editor.build(), Err("Phone number is required".to_string()));
    }

    #[test]
    fn edit_keeps_identity() {
        let editor = ContactEditor::from_contact(Contact {
            id: 7,
            name: "Ana".into(),
            phone_number: "+5511999999999".into(),
            ..Contact::default()
        });
        let built = editor.build().unwrap();
        assert_eq!(built.id, 7);
        assert_eq!(editor.confirm_label(), "Save changes?");
    }
}
