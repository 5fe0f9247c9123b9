use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, warn};

/// 文本文件编码模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    /// UTF-8
    #[default]
    Utf8,
    /// ANSI 代码页（Windows-1252）
    Ansi,
}

impl TextEncoding {
    /// `# ENCODING:` 头中使用的标签
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF8",
            TextEncoding::Ansi => "ANSI",
        }
    }

    /// 解析 `# ENCODING:` 头的值
    ///
    /// 包含 "ansi"（不区分大小写）即为 ANSI，其余一律视为 UTF-8。
    pub fn from_header(value: &str) -> Self {
        if value.to_ascii_lowercase().contains("ansi") {
            TextEncoding::Ansi
        } else {
            TextEncoding::Utf8
        }
    }

    fn codec(self) -> &'static Encoding {
        match self {
            TextEncoding::Utf8 => UTF_8,
            TextEncoding::Ansi => WINDOWS_1252,
        }
    }

    /// 编码文本
    ///
    /// ANSI 代码页无法表示的字符写成数字字符引用（`&#NNNN;`），
    /// 原文中的 `&#` 写成 `&#38;#`，解码时据此还原。
    pub fn encode(self, text: &str) -> Cow<'_, [u8]> {
        if self == TextEncoding::Ansi && text.contains(CHAR_REF_PREFIX) {
            let escaped = text.replace(CHAR_REF_PREFIX, ESCAPED_CHAR_REF_PREFIX);
            return Cow::Owned(self.encode_raw(&escaped).into_owned());
        }
        self.encode_raw(text)
    }

    fn encode_raw(self, text: &str) -> Cow<'_, [u8]> {
        let (bytes, _, had_errors) = self.codec().encode(text);
        if had_errors {
            warn!(
                encoding = self.label(),
                "some characters are not representable, written as numeric references"
            );
        }
        bytes
    }

    /// 解码字节
    ///
    /// 无效序列替换为 U+FFFD；ANSI 模式下还原数字字符引用。
    pub fn decode(self, bytes: &[u8]) -> Cow<'_, str> {
        let (text, had_errors) = self.codec().decode_without_bom_handling(bytes);
        if had_errors {
            debug!(encoding = self.label(), "malformed byte sequence replaced");
        }
        if self == TextEncoding::Ansi && text.contains(CHAR_REF_PREFIX) {
            return Cow::Owned(decode_char_refs(&text));
        }
        text
    }
}

const CHAR_REF_PREFIX: &str = "&#";
const ESCAPED_CHAR_REF_PREFIX: &str = "&#38;#";

/// 还原 `&#十进制;` 引用，不合法的引用原样保留
fn decode_char_refs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(CHAR_REF_PREFIX) {
        out.push_str(&rest[..start]);
        let tail = &rest[start + CHAR_REF_PREFIX.len()..];
        let digits = tail.bytes().take_while(u8::is_ascii_digit).count();
        let decoded = if digits > 0 && tail[digits..].starts_with(';') {
            tail[..digits].parse::<u32>().ok().and_then(char::from_u32)
        } else {
            None
        };

        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &tail[digits + 1..];
            }
            None => {
                out.push_str(CHAR_REF_PREFIX);
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
