use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 近似浏览器 `localeCompare`（ICU 默认规则）的字符串比较，分三级：
/// 1. 去掉重音、忽略大小写的基本字符（"é" 与 "e" 相同）
/// 2. 重音，不带重音的在前（"eclair" < "éclair"）
/// 3. 大小写，小写在前（"a" < "A"）
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| case_key(a).cmp(case_key(b)))
}

fn primary_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

// 每个基本字符后面跟着的重音符号
fn accent_key(s: &str) -> Vec<Vec<char>> {
    let mut groups: Vec<Vec<char>> = Vec::new();
    for c in s.nfd() {
        if is_combining_mark(c) {
            if let Some(last) = groups.last_mut() {
                last.push(c);
            }
        } else {
            groups.push(Vec::new());
        }
    }
    groups
}

fn case_key(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
}
