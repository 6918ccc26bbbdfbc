use regex::Regex;
use std::sync::OnceLock;

fn list_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+(,\d+)*$").expect("static list pattern"))
}

/// 解析逗號分隔的非負整數清單，例如 `"500,249,251"`。
///
/// 不接受空白、空項目、負號或超出 u64 的數字。
pub fn parse_integer_list(input: &str) -> Option<Vec<u64>> {
    if !list_pattern().is_match(input) {
        return None;
    }

    input
        .split(',')
        .map(|item| item.parse::<u64>().ok())
        .collect()
}
