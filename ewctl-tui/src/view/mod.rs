//! View 层：纯渲染，只读取 Model
//!
//! ```text
//! layout.rs       页眉 + 当前视图 + 页脚的整体布局
//! components/     页眉、页脚、表单、通用面板
//! theme.rs        主题与样式
//! ```
//!
//! 各视图自己的渲染在 `pages/` 中，由 layout 通过 `SubView::render` 调用。

pub mod components;
mod layout;
pub mod theme;

pub use layout::render;
