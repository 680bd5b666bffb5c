//! 可复用的界面组件

pub mod form;
pub mod header;
pub mod panel;
pub mod statusbar;
