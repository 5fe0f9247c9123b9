/// 可识别的语言名称（按匹配优先级排列）
pub const KNOWN_LANGUAGES: &[&str] = &[
    "English",
    "French",
    "German",
    "Italian",
    "Spanish",
    "Portuguese",
    "Russian",
    "Japanese",
    "Chinese",
    "Korean",
];

/// 无法识别时的语言标签
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// 根据路径猜测文本语言
///
/// 路径中包含语言名（不区分大小写）即视为该语言，按 [`KNOWN_LANGUAGES`] 顺序取第一个匹配。
pub fn guess_language(path: &str) -> &'static str {
    let lower = path.to_lowercase();
    KNOWN_LANGUAGES
        .iter()
        .find(|language| lower.contains(&language.to_lowercase()))
        .copied()
        .unwrap_or(UNKNOWN_LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_language() {
        assert_eq!(guess_language("prop.english.title"), "English");
        assert_eq!(guess_language("prop.Lang_FRENCH[0]"), "French");
        assert_eq!(guess_language("prop.text{3}"), "Unknown");
    }

    #[test]
    fn test_first_match_wins() {
        // English 在列表中优先于 German
        assert_eq!(guess_language("prop.german.english"), "English");
    }
}
