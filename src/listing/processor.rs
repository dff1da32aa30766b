use log::debug;

use super::collation::locale_compare;
use super::page::PageEnvelope;
use super::params::{ListQueryParams, SortOrder};

/// 可以被列表接口搜索、排序的记录类型
pub trait Listable {
    /// 允许 `search=field:value` 使用的字段
    const SEARCHABLE_FIELDS: &'static [&'static str];
    /// 允许 `sort=field:order` 使用的字段
    const SORTABLE_FIELDS: &'static [&'static str];

    /// 按字段名取值，未知字段返回 None
    fn field(&self, name: &str) -> Option<&str>;
}

/// 过滤、排序并截取一页数据。
///
/// 不会修改传入的切片，排序在引用的副本上进行；未识别的字段直接忽略。
pub fn process<T>(records: &[T], params: &ListQueryParams) -> PageEnvelope<T>
where
    T: Listable + Clone,
{
    let mut selected: Vec<&T> = records.iter().collect();

    // 过滤
    if let (Some(field), Some(value)) = (&params.search_field, &params.search_value) {
        if T::SEARCHABLE_FIELDS.contains(&field.as_str()) {
            let needle = value.to_lowercase();
            selected.retain(|record| {
                record
                    .field(field)
                    .map(|v| v.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            });
            debug!("按 {} 过滤后剩余 {} 条", field, selected.len());
        } else {
            debug!("忽略不支持搜索的字段: {}", field);
        }
    }

    // 排序，sort_by 是稳定排序
    if let Some(field) = &params.sort_field {
        if T::SORTABLE_FIELDS.contains(&field.as_str()) {
            match params.sort_order {
                SortOrder::Asc => {
                    selected.sort_by(|a, b| locale_compare(sort_key(*a, field), sort_key(*b, field)))
                }
                SortOrder::Desc => {
                    selected.sort_by(|a, b| locale_compare(sort_key(*b, field), sort_key(*a, field)))
                }
                SortOrder::Unspecified => {}
            }
        } else {
            debug!("忽略不支持排序的字段: {}", field);
        }
    }

    // 分页
    let count = selected.len();
    let start = params
        .page_number
        .saturating_sub(1)
        .saturating_mul(params.page_size)
        .min(count);
    let end = start.saturating_add(params.page_size).min(count);
    let data = selected[start..end].iter().map(|r| (*r).clone()).collect();

    PageEnvelope::new(params.page_number, params.page_size, count, data)
}

fn sort_key<'a, T: Listable>(record: &'a T, field: &str) -> &'a str {
    record.field(field).unwrap_or("")
}
