use serde::Serialize;

/// 分页响应
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageEnvelope<T> {
    pub page_number: usize,
    pub page_size: usize,
    /// 过滤之后、分页之前的总条数
    pub count: usize,
    pub total_pages: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub data: Vec<T>,
}

impl<T> PageEnvelope<T> {
    pub fn new(page_number: usize, page_size: usize, count: usize, data: Vec<T>) -> Self {
        let total_pages = count.div_ceil(page_size.max(1));
        Self {
            page_number,
            page_size,
            count,
            total_pages,
            has_previous_page: page_number > 1,
            has_next_page: page_number < total_pages,
            data,
        }
    }
}
