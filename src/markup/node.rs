//! 通用标记树节点

/// 标记树中的一个节点：文本叶子或元素
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Text(String),
    Element(Element),
}

impl MarkupNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            MarkupNode::Element(el) => Some(el),
            MarkupNode::Text(_) => None,
        }
    }
}

impl From<Element> for MarkupNode {
    fn from(el: Element) -> Self {
        MarkupNode::Element(el)
    }
}

impl From<&str> for MarkupNode {
    fn from(text: &str) -> Self {
        MarkupNode::Text(text.to_string())
    }
}

/// 带标签名、属性和有序子节点的元素
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// 小写标签名
    pub name: String,
    /// 按出现顺序保存的属性（键已小写）
    pub attrs: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into().to_lowercase(), value.into()));
        self
    }

    pub fn with_child(mut self, child: impl Into<MarkupNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// 读取属性值（键不区分大小写）
    pub fn attr(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.attrs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 读取属性并去掉首尾空白，空串视为不存在
    pub fn attr_trimmed(&self, key: &str) -> Option<&str> {
        self.attr(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// 小写化后的 `type` 属性
    pub fn type_attr(&self) -> Option<String> {
        self.attr_trimmed("type").map(str::to_lowercase)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(MarkupNode::as_element)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.child_elements().filter(move |el| el.is(name))
    }

    pub fn first_child_named(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.is(name))
    }

    /// 深度优先收集所有同名后代元素（不含自身）
    pub fn descendants_named(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_descendants(self, name, &mut found);
        found
    }

    pub fn has_descendant(&self, name: &str) -> bool {
        self.child_elements()
            .any(|el| el.is(name) || el.has_descendant(name))
    }

    /// 拼接所有后代文本，`br` 与 `line` 之间补一个空格
    pub fn text_content(&self) -> String {
        self.text_content_without(&[])
    }

    /// 同 `text_content`，但跳过指定名字的直接子元素
    pub fn text_content_without(&self, skip: &[&str]) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                MarkupNode::Element(inner) if skip.contains(&inner.name.as_str()) => {}
                _ => push_node_text(child, &mut out),
            }
        }
        out
    }
}

fn collect_descendants<'a>(el: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    for child in el.child_elements() {
        if child.is(name) {
            found.push(child);
        }
        collect_descendants(child, name, found);
    }
}

fn push_node_text(node: &MarkupNode, out: &mut String) {
    match node {
        MarkupNode::Text(text) => out.push_str(text),
        MarkupNode::Element(inner) if inner.is("br") => out.push(' '),
        MarkupNode::Element(inner) => {
            let separated = inner.is("line");
            if separated {
                out.push(' ');
            }
            for child in &inner.children {
                push_node_text(child, out);
            }
            if separated {
                out.push(' ');
            }
        }
    }
}
