//! 表单相关视图

mod create;
mod edit;
pub mod editor;
mod list;

pub use create::FormCreateView;
pub use edit::FormEditView;
pub use list::FormsListView;
