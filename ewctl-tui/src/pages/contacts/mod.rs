//! 联系人相关视图

mod create;
mod edit;
pub mod editor;
mod list;

pub use create::ContactCreateView;
pub use edit::ContactEditView;
pub use list::ContactsListView;
