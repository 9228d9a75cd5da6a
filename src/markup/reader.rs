//! 宽容的标记读取器
//!
//! LLM 输出经常出现未闭合、错配或多余的结束标签，这里不做校验，
//! 只尽量还原出树结构。

use crate::markup::node::{Element, MarkupNode};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// 合成根节点的名字
pub const DOCUMENT: &str = "#document";

/// 没有结束标签的 HTML 元素，`<br>` 与 `<br/>` 同样处理
const VOID_TAGS: [&str; 3] = ["br", "hr", "img"];

/// 预定义实体与数字字符引用
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(lt|gt|amp|quot|apos|#[0-9]+|#[xX][0-9a-fA-F]+);").expect("ENTITY_RE")
});

/// 把标记文本读成以 `#document` 为根的元素树
///
/// - 结束标签关闭最近的同名元素，找不到同名元素时忽略
/// - 文件结束时仍未闭合的元素自动闭合
/// - 无值属性（`<choice answer>`）读为空串
/// - `<br>` 等空元素不需要写成自闭合
/// - 后面不是标签名的 `<`（如 `score < 5`）按普通文本读入
/// - 实体解码失败的文本保留原文，其中能识别的实体仍然解码
pub fn parse_markup(input: &str) -> Element {
    let input = escape_stray_lt(input);
    let mut reader = Reader::from_str(&input);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut stack = vec![Element::new(DOCUMENT)];

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let element = element_from(e);
                if VOID_TAGS.contains(&element.name.as_str()) {
                    push_child(&mut stack, element.into());
                } else {
                    stack.push(element);
                }
            }
            Ok(Event::Empty(ref e)) => push_child(&mut stack, element_from(e).into()),
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
                match stack.iter().rposition(|el| el.name == name) {
                    Some(pos) if pos > 0 => {
                        while stack.len() > pos {
                            close_top(&mut stack);
                        }
                    }
                    _ => debug!("忽略多余的结束标签 </{}>", name),
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map(|t| t.into_owned())
                    .unwrap_or_else(|_| unescape_lenient(&String::from_utf8_lossy(&e[..])));
                push_text(&mut stack, text);
            }
            Ok(Event::CData(ref e)) => {
                push_text(&mut stack, String::from_utf8_lossy(&e[..]).into_owned());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                let position = reader.error_position() as usize;
                warn!(
                    "标记解析在位置 {} 中断，之后的 {} 字节未能读入: {}",
                    position,
                    input.len().saturating_sub(position),
                    e
                );
                break;
            }
            _ => {}
        }
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }
    stack.pop().unwrap_or_else(|| Element::new(DOCUMENT))
}

/// 把不能开始标签的 `<` 转义为 `&lt;`
///
/// 标签必须以字母、`/`、`!` 或 `?` 紧跟在 `<` 之后，其余的 `<` 都视为文本。
fn escape_stray_lt(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let stray = |i: usize| match bytes.get(i + 1) {
        Some(b) => !(b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?')),
        None => true,
    };
    if !bytes.iter().enumerate().any(|(i, &b)| b == b'<' && stray(i)) {
        return Cow::Borrowed(input);
    }

    let mut escaped = String::with_capacity(input.len() + 8);
    for (i, ch) in input.char_indices() {
        if ch == '<' && stray(i) {
            escaped.push_str("&lt;");
        } else {
            escaped.push(ch);
        }
    }
    debug!("已转义文本中的裸 `<`");
    Cow::Owned(escaped)
}

/// 只解码能识别的实体，其余（包括裸 `&`）原样保留
fn unescape_lenient(raw: &str) -> String {
    ENTITY_RE
        .replace_all(raw, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let digits = &entity[1..];
                    let code = match digits.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => digits.parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn element_from(e: &BytesStart) -> Element {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
    let mut element = Element::new(name);
    for attr in e.html_attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
        let value = attr
            .unescape_value()
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        element.attrs.push((key, value));
    }
    element
}

fn close_top(stack: &mut Vec<Element>) {
    if let Some(done) = stack.pop() {
        push_child(stack, done.into());
    }
}

fn push_child(stack: &mut [Element], node: MarkupNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

fn push_text(stack: &mut [Element], text: String) {
    if text.is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        // 相邻文本合并，保持叶子完整
        if let Some(MarkupNode::Text(prev)) = parent.children.last_mut() {
            prev.push_str(&text);
            return;
        }
        parent.children.push(MarkupNode::Text(text));
    }
}
