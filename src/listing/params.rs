use serde::Deserialize;
use std::num::IntErrorKind;

pub const DEFAULT_PAGE_NUMBER: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 列表接口的原始查询参数，例如
/// `?search=name:foo&sort=name:asc&page_number=1&page_size=10`
///
/// 数字参数也按字符串接收，非法值在解析时回落到默认值，而不是让请求失败。
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page_number: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
    /// 既不是 asc 也不是 desc，保持原顺序
    Unspecified,
}

impl SortOrder {
    fn parse(raw: &str) -> Self {
        match raw {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            _ => SortOrder::Unspecified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQueryParams {
    pub search_field: Option<String>,
    pub search_value: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: SortOrder,
    pub page_number: usize,
    pub page_size: usize,
}

impl Default for ListQueryParams {
    fn default() -> Self {
        Self {
            search_field: None,
            search_value: None,
            sort_field: None,
            sort_order: SortOrder::Unspecified,
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl From<&ListQuery> for ListQueryParams {
    fn from(query: &ListQuery) -> Self {
        let (search_field, search_value) = match query.search.as_deref().and_then(split_token) {
            Some((field, value)) => (Some(field), Some(value)),
            None => (None, None),
        };

        let (sort_field, sort_order) = match query.sort.as_deref().and_then(split_token) {
            Some((field, order)) => (Some(field), SortOrder::parse(&order)),
            None => (None, SortOrder::Unspecified),
        };

        Self {
            search_field,
            search_value,
            sort_field,
            sort_order,
            page_number: parse_positive(query.page_number.as_deref()).unwrap_or(DEFAULT_PAGE_NUMBER),
            page_size: parse_positive(query.page_size.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

// "field:value" 形式，只按第一个冒号切分，value 中允许再出现冒号
fn split_token(token: &str) -> Option<(String, String)> {
    let (field, value) = token.split_once(':')?;
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    Some((field.to_string(), value.to_string()))
}

// 与 parseInt 一致：取开头的整数部分，"12abc" 视为 12；0 和负数视为无效
fn parse_positive(raw: Option<&str>) -> Option<usize> {
    let raw = raw?.trim_start();
    let digits: &str = match raw.strip_prefix('+') {
        Some(rest) => rest,
        None => raw,
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    let number = match digits[..end].parse::<usize>() {
        Ok(n) => n,
        // 全是数字但超出范围，按最大页处理，结果为空页
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => usize::MAX,
        Err(_) => return None,
    };
    Some(number).filter(|n| *n >= 1)
}
