use crate::error::ValidationError;

/// 单本涂色书允许的最大总页数（含封面）
pub const MAX_PAGE_COUNT: i64 = 200;

/// 一次涂色书生成请求
///
/// 在提交时由用户输入构造，一次生成过程中不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRequest {
    theme: String,
    page_count: usize,
}

impl BookRequest {
    /// 校验并创建请求
    ///
    /// # 参数
    /// - `theme`: 主题，去除首尾空白后不能为空
    /// - `page_count`: 总页数（含封面），范围 `1..=MAX_PAGE_COUNT`
    pub fn new(theme: impl AsRef<str>, page_count: i64) -> Result<Self, ValidationError> {
        let theme = theme.as_ref().trim();
        if theme.is_empty() {
            return Err(ValidationError::EmptyTheme);
        }
        if page_count <= 0 {
            return Err(ValidationError::NonPositivePageCount(page_count));
        }
        if page_count > MAX_PAGE_COUNT {
            return Err(ValidationError::PageCountTooLarge {
                max: MAX_PAGE_COUNT,
                actual: page_count,
            });
        }
        let page_count = usize::try_from(page_count)
            .map_err(|_| ValidationError::NonPositivePageCount(page_count))?;

        Ok(Self {
            theme: theme.to_string(),
            page_count,
        })
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// 需要通过批次生成的内页数量
    pub fn pages_to_generate(&self) -> usize {
        self.page_count - 1
    }
}

/// 图片服务返回的一张图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

impl GeneratedImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: None,
        }
    }
}

/// 涂色书中的一页
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    /// 页码，0 为封面
    pub index: usize,
    pub image: GeneratedImage,
    pub is_cover: bool,
}

impl GeneratedPage {
    pub fn cover(image: GeneratedImage) -> Self {
        Self {
            index: 0,
            image,
            is_cover: true,
        }
    }

    pub fn interior(index: usize, image: GeneratedImage) -> Self {
        Self {
            index,
            image,
            is_cover: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_request_trims_theme() {
        let request = BookRequest::new("  Space  ", 9).unwrap();
        assert_eq!(request.theme(), "Space");
        assert_eq!(request.page_count(), 9);
        assert_eq!(request.pages_to_generate(), 8);
    }

    #[test]
    fn test_book_request_rejects_invalid_input() {
        assert_eq!(BookRequest::new("   ", 3), Err(ValidationError::EmptyTheme));
        assert_eq!(
            BookRequest::new("Cats", 0),
            Err(ValidationError::NonPositivePageCount(0))
        );
        assert_eq!(
            BookRequest::new("Cats", -2),
            Err(ValidationError::NonPositivePageCount(-2))
        );
    }

    #[test]
    fn test_book_request_rejects_oversized_page_count() {
        assert_eq!(
            BookRequest::new("Cats", i64::MAX),
            Err(ValidationError::PageCountTooLarge {
                max: MAX_PAGE_COUNT,
                actual: i64::MAX,
            })
        );
        assert!(BookRequest::new("Cats", MAX_PAGE_COUNT + 1).is_err());

        let largest = BookRequest::new("Cats", MAX_PAGE_COUNT).unwrap();
        assert_eq!(largest.page_count(), MAX_PAGE_COUNT as usize);
    }

    #[test]
    fn test_single_page_book_has_no_interior_pages() {
        let request = BookRequest::new("Cats", 1).unwrap();
        assert_eq!(request.pages_to_generate(), 0);
    }
}
