//! 表单编辑器：新建和编辑视图共用的字段与校验

use crossterm::event::KeyEvent;
use ewctl_store::types::{default_fields, generate_form_id};
use ewctl_store::{Contact, Form, FormField, FormNumber};

use crate::model::state::{ChoiceOption, Field, InputAction, InputForm};

/// 表单编辑器
#[derive(Debug, Clone)]
pub struct FormEditor {
    input: InputForm,
    contacts: Vec<Contact>,
    /// 用户改过 ID 后不再随名称自动生成
    id_touched: bool,
    /// 编辑时的原始记录，提交时沿用其余字段
    base: Form,
    /// 不属于任何已知联系人的号码，原样保留
    loose_numbers: Vec<FormNumber>,
}

impl FormEditor {
    /// 空白表单，字段使用默认模板
    pub fn blank() -> Self {
        Self {
            input: InputForm::new(vec![
                Field::text("id", "Form ID").with_placeholder("auto-generated from the name"),
                Field::text("name", "Name").with_placeholder("Contact Form"),
                Field::text("description", "Description"),
                Field::text("fields", "Fields (elementor_id|Label|type|* ; ...)")
                    .with_value(format_fields(&default_fields())),
                Field::choice("recipients", "Recipients").with_placeholder("No contacts available"),
                Field::toggle("confirm", "Create this form?"),
            ]),
            contacts: Vec::new(),
            id_touched: false,
            base: Form::default(),
            loose_numbers: Vec::new(),
        }
    }

    /// 由已有记录构建，ID 只读
    pub fn from_form(form: &Form, contacts: Vec<Contact>) -> Self {
        let mut input = InputForm::new(vec![
            Field::text("id", "Form ID").with_value(form.id.clone()).read_only(),
            Field::text("name", "Name").with_value(form.name.clone()),
            Field::text("description", "Description").with_value(form.description.clone()),
            Field::text("fields", "Fields (elementor_id|Label|type|* ; ...)")
                .with_value(format_fields(&form.fields)),
            Field::choice("recipients", "Recipients").with_placeholder("No contacts available"),
            Field::toggle("confirm", "Save changes?"),
        ]);
        input.focus("name");

        let known: Vec<i64> = contacts.iter().map(|c| c.id).collect();
        let loose_numbers = form
            .numbers
            .iter()
            .filter(|n| n.contact_id.is_none_or(|id| !known.contains(&id)))
            .cloned()
            .collect();
        let linked: Vec<i64> = form.numbers.iter().filter_map(|n| n.contact_id).collect();

        let mut editor = Self {
            input,
            contacts: Vec::new(),
            id_touched: true,
            base: form.clone(),
            loose_numbers,
        };
        editor.set_contacts(contacts);
        editor.select_contacts(&linked);
        editor
    }

    pub fn input(&self) -> &InputForm {
        &self.input
    }

    /// 更新可选的接收人，保留已选中的
    pub fn set_contacts(&mut self, contacts: Vec<Contact>) {
        let options = contacts
            .iter()
            .map(|c| ChoiceOption::new(format!("{} ({})", c.name, c.phone_number), c.id.to_string()))
            .collect();
        self.input.set_options("recipients", options);
        self.contacts = contacts;
    }

    fn select_contacts(&mut self, ids: &[i64]) {
        let mut options: Vec<ChoiceOption> = self
            .input
            .field("recipients")
            .map(|f| f.options.clone())
            .unwrap_or_default();
        for option in &mut options {
            option.selected = option
                .value
                .parse::<i64>()
                .is_ok_and(|id| ids.contains(&id));
        }
        self.input.set_options("recipients", options);
    }

    pub fn confirmed(&self) -> bool {
        self.input.checked("confirm")
    }

    pub fn set_confirmed(&mut self, confirmed: bool) {
        self.input.set_checked("confirm", confirmed);
    }

    /// 处理按键；名称变化时同步生成 ID
    pub fn handle_key(&mut self, key: &KeyEvent) -> InputAction {
        let action = self.input.handle_key(key);
        match action {
            InputAction::Changed("id") => self.id_touched = true,
            InputAction::Changed("name") if !self.id_touched => {
                let id = generate_form_id(self.input.value("name"));
                self.input.set_value("id", id);
            }
            _ => {}
        }
        action
    }

    /// 校验并生成记录
    pub fn build(&self) -> Result<Form, String> {
        let id = self.input.value("id");
        if id.is_empty() {
            return Err("Form ID is required".to_string());
        }
        if id.chars().any(char::is_whitespace) {
            return Err("Form ID cannot contain spaces".to_string());
        }
        let name = self.input.value("name");
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        let fields = parse_fields(self.input.value("fields"))?;

        let mut numbers: Vec<FormNumber> = self
            .input
            .selected_values("recipients")
            .iter()
            .filter_map(|v| v.parse::<i64>().ok())
            .filter_map(|id| self.contacts.iter().find(|c| c.id == id))
            .map(FormNumber::from_contact)
            .collect();
        numbers.extend(self.loose_numbers.iter().cloned());

        Ok(Form {
            id: id.to_string(),
            name: name.to_string(),
            description: self.input.value("description").to_string(),
            fields,
            numbers,
            ..self.base.clone()
        })
    }
}

/// 解析字段描述：`elementor_id|Label|type|*`，多个以 `;` 分隔
///
/// 标签缺省为 ID，类型缺省为 `text`，第四段为 `*` 表示必填。
pub fn parse_fields(spec: &str) -> Result<Vec<FormField>, String> {
    let mut fields = Vec::new();
    for (i, entry) in spec
        .split(';')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .enumerate()
    {
        let parts: Vec<&str> = entry.split('|').map(str::trim).collect();
        let id = parts.first().copied().unwrap_or_default();
        if id.is_empty() {
            return Err(format!("Field {} is missing an id", i + 1));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(format!("Field id '{id}' cannot contain spaces"));
        }
        let label = parts.get(1).copied().filter(|s| !s.is_empty()).unwrap_or(id);
        let field_type = parts.get(2).copied().filter(|s| !s.is_empty()).unwrap_or("text");
        let required = parts.get(3).is_some_and(|p| *p == "*");

        let mut field = FormField::new(id, label, field_type, required);
        field.position = i64::try_from(i).unwrap_or(i64::MAX);
        fields.push(field);
    }

    if fields.is_empty() {
        return Err("At least one field is required".to_string());
    }
    Ok(fields)
}

/// 字段列表转回描述文本
pub fn format_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|f| {
            let mut entry = format!("{}|{}|{}", f.elementor_id, f.label, f.field_type);
            if f.required {
                entry.push_str("|*");
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("; ")
}
