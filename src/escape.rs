//! 旧版制表符格式的转义
//!
//! 旧版每行一个条目：`路径<TAB>转义文本`。文本中的换行、回车、制表符和反斜杠需要转义。

/// 转义文本，使其可以放入单行
pub fn escape(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    for c in src.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// 反转义
///
/// `\n`、`\r`、`\t` 还原为控制字符，其他被转义的字符原样保留，
/// 末尾孤立的反斜杠也原样保留。
pub fn unescape(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
