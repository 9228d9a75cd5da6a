//! 文本块构建 - 业务能力层
//!
//! 递归遍历标记节点，产出有序的文本块序列

use crate::markup::{Element, MarkupNode};
use crate::models::{Chunk, Text};
use crate::services::text_classifier::classify;

/// 把一组节点转换为文本块
///
/// 文本先累积在缓冲区，遇到元素时按规则处理：
/// - `blank`：先清空缓冲区，再产出空栏块（id 取自 `index` 或 `id` 属性）
/// - 换行元素：往缓冲区追加一个空格，不清空
/// - 其他元素：递归，递归结果非空时先清空缓冲区再追加
pub fn build_chunks<'a>(nodes: impl IntoIterator<Item = &'a MarkupNode>) -> Text {
    let mut chunks = Vec::new();
    let mut buffer = String::new();

    for node in nodes {
        match node {
            MarkupNode::Text(text) => buffer.push_str(text),
            MarkupNode::Element(el) if el.is("blank") => {
                flush(&mut buffer, &mut chunks);
                chunks.push(Chunk::Blank { id: blank_id(el) });
            }
            MarkupNode::Element(el) if el.is("br") => buffer.push(' '),
            MarkupNode::Element(el) => {
                let inner = build_chunks(&el.children);
                if !inner.is_empty() {
                    flush(&mut buffer, &mut chunks);
                    chunks.extend(inner);
                }
            }
        }
    }
    flush(&mut buffer, &mut chunks);

    chunks.retain(|chunk| chunk.is_blank() || chunk.text().is_some_and(|t| !t.is_empty()));
    chunks
}

/// 元素全部子节点的文本块
pub fn element_chunks(el: &Element) -> Text {
    build_chunks(&el.children)
}

/// 跳过指定名字的直接子元素后构建文本块
pub fn element_chunks_without(el: &Element, skip: &[&str]) -> Text {
    build_chunks(el.children.iter().filter(|node| match node {
        MarkupNode::Element(child) => !skip.contains(&child.name.as_str()),
        MarkupNode::Text(_) => true,
    }))
}

pub fn blank_id(el: &Element) -> Option<String> {
    el.attr_trimmed("index")
        .or_else(|| el.attr_trimmed("id"))
        .map(str::to_string)
}

fn flush(buffer: &mut String, chunks: &mut Vec<Chunk>) {
    if let Some(chunk) = classify(buffer) {
        chunks.push(chunk);
    }
    buffer.clear();
}
