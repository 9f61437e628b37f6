//! 数据模型层

pub mod text_model;

pub use text_model::{ReadOnlyError, TextModel};
