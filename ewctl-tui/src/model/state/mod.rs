//! 视图共用的状态片段

mod input;
mod list;
mod load;
mod settings;
mod submit;

pub use input::{ChoiceOption, Field, FieldKind, InputAction, InputForm};
pub use list::ListCursor;
pub use load::{render_mode, Loadable, Phase, RenderMode};
pub use settings::SettingItem;
pub use submit::Submission;
