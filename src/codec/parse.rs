use super::{ENCODING_DIRECTIVE, PATH_DIRECTIVE, TEXT_CLOSE, TEXT_OPEN};
use crate::encoding::TextEncoding;
use crate::escape::unescape;
use std::collections::HashMap;
use std::mem;
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// 解析结束时生效的编码
    pub encoding: TextEncoding,
    /// 路径 -> 解码后的文本（同一路径以最后出现的为准）
    pub updates: HashMap<String, String>,
}

/// 解析交换文件
///
/// 每行按当前编码解码；`# ENCODING:` 头会切换后续行的编码，除非调用方强制指定。
/// 首行以 `\r\n` 结尾时视为整体 CRLF 文件，每行去掉一个 `\r`；
/// 否则块内各行逐字保留，标记和指令比较时忽略行尾 `\r`。
/// 缺少路径或缺少结束标记的块被静默丢弃。
pub fn parse_document(bytes: &[u8], forced_encoding: Option<TextEncoding>) -> ParsedDocument {
    let mut encoding = forced_encoding.unwrap_or_default();
    let mut updates = HashMap::new();
    let mut pending_path = String::new();
    let mut block: Option<Vec<String>> = None;

    for raw in split_lines(bytes) {
        let line = encoding.decode(raw);
        let trimmed = line.strip_suffix('\r').unwrap_or(&*line);

        if let Some(lines) = block.as_mut() {
            if trimmed != TEXT_CLOSE {
                lines.push(line.into_owned());
                continue;
            }
            let text = lines.join("\n");
            block = None;
            if pending_path.is_empty() {
                debug!("text block without path dropped");
            } else {
                updates.insert(mem::take(&mut pending_path), text);
            }
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix(PATH_DIRECTIVE) {
            pending_path = rest.trim_start_matches(' ').to_string();
        } else if let Some(rest) = trimmed.strip_prefix(ENCODING_DIRECTIVE) {
            if forced_encoding.is_none() {
                encoding = TextEncoding::from_header(rest);
            }
        } else if trimmed == TEXT_OPEN {
            block = Some(Vec::new());
        } else if !trimmed.is_empty() && !trimmed.starts_with('#') {
            if let Some((path, value)) = trimmed.split_once('\t') {
                updates.insert(path.to_string(), unescape(value));
            }
        }
    }

    if block.is_some() {
        debug!(path = %pending_path, "unterminated text block dropped");
    }

    ParsedDocument { encoding, updates }
}

/// 按 `\n` 切分行，去掉开头的 UTF-8 BOM；整体 CRLF 文件每行去掉一个 `\r`
fn split_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let crlf = bytes
        .split(|&b| b == b'\n')
        .next()
        .is_some_and(|first| first.ends_with(b"\r"));

    bytes.split(|&b| b == b'\n').map(move |line| {
        if crlf {
            line.strip_suffix(b"\r").unwrap_or(line)
        } else {
            line
        }
    })
}
