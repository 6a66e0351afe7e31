// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node, Selector};

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n+").unwrap());
static INLINE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg", "head"];
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "br", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "section",
    "article", "header", "footer", "table",
];

/// 将HTML转换为适合发送给模型的纯文本
///
/// 跳过脚本和样式，块级元素之间换行，压缩多余空白；保留页面标题
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();

    if let Some(title) = document.select(&TITLE).next() {
        let title = title.text().collect::<String>();
        let title = title.trim();
        if !title.is_empty() {
            out.push_str(title);
            out.push_str("\n\n");
        }
    }

    for node in document.root_element().descendants() {
        match node.value() {
            Node::Text(text) => {
                let skipped = node.ancestors().any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|e| SKIPPED_TAGS.contains(&e.name()))
                });
                if !skipped {
                    out.push_str(text);
                }
            }
            Node::Element(element) if BLOCK_TAGS.contains(&element.name()) => out.push('\n'),
            _ => {}
        }
    }

    let collapsed = INLINE_SPACE.replace_all(&out, " ");
    let lines = collapsed
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_LINES.replace_all(&lines, "\n\n").trim().to_string()
}

/// 按字符数截断，不会切断UTF-8字符
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
