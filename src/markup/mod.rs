//! 标记层（Markup）
//!
//! 把 LLM 输出的类 XML 标记读成一棵通用树，供上层解析使用。
//! 标签名与属性名一律小写化，读取过程尽量宽容。

pub mod node;
pub mod reader;

pub use node::{Element, MarkupNode};
pub use reader::parse_markup;
