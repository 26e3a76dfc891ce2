//! 画廊 - 已渲染页面的有序视图
//!
//! 画廊是导出功能读取的唯一数据来源：导出看到的是"当前渲染出来的内容"，
//! 而不是生成流程内部的序列。

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{GeneratedPage, RunProgress};
use crate::utils::{page_file_name, sanitize_theme};

/// 画廊中的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub page: GeneratedPage,
    /// 预先计算好的单页文件名
    pub file_name: String,
}

/// 页面渲染订阅者
///
/// 每当一页加入画廊时被调用一次，调用期间画廊处于写锁定状态，
/// 实现方不能回头访问控制器的画廊。
pub trait PageRenderer: Send + Sync {
    fn render(&self, item: &GalleryItem, progress: RunProgress);
}

/// 有序画廊
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    theme: String,
    sanitized_theme: String,
    items: Vec<GalleryItem>,
}

impl Gallery {
    pub fn new(theme: &str) -> Self {
        Self {
            theme: theme.to_string(),
            sanitized_theme: sanitize_theme(theme),
            items: Vec::new(),
        }
    }

    /// 开始新的一次生成，清空旧内容
    pub fn reset(&mut self, theme: &str) {
        *self = Self::new(theme);
    }

    /// 追加一页
    ///
    /// 页码必须紧接着上一页，封面必须是第 0 页。
    pub fn render_page(&mut self, page: GeneratedPage) -> AppResult<&GalleryItem> {
        let expected = self.items.len();
        if page.index != expected {
            return Err(AppError::Unexpected(format!(
                "页码不连续: 期望 {}, 实际 {}",
                expected, page.index
            )));
        }
        if page.is_cover != (page.index == 0) {
            return Err(AppError::Unexpected(format!(
                "封面标记错误: 页码 {}, is_cover={}",
                page.index, page.is_cover
            )));
        }

        let file_name = page_file_name(&self.sanitized_theme, page.index, page.is_cover);
        self.items.push(GalleryItem { page, file_name });
        Ok(&self.items[expected])
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn sanitized_theme(&self) -> &str {
        &self.sanitized_theme
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cover(&self) -> Option<&GalleryItem> {
        self.items.first().filter(|item| item.page.is_cover)
    }

    /// 除封面外的所有页面，按页码顺序
    pub fn interior_pages(&self) -> impl Iterator<Item = &GalleryItem> {
        self.items.iter().filter(|item| !item.page.is_cover)
    }
}

/// 把每一页的到达写入日志
#[derive(Debug, Default)]
pub struct ProgressLogger {
    verbose: bool,
}

impl ProgressLogger {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl PageRenderer for ProgressLogger {
    fn render(&self, item: &GalleryItem, progress: RunProgress) {
        let kind = if item.page.is_cover { "封面" } else { "内页" };
        info!(
            "🖼️ {} 已就绪 ({}/{}): {}",
            kind, progress.completed, progress.total, item.file_name
        );
        if self.verbose {
            info!(
                "   大小: {} KB, 格式: {}",
                item.page.image.bytes.len() / 1024,
                item.page.image.mime_type.as_deref().unwrap_or("未知")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeneratedImage;

    fn image() -> GeneratedImage {
        GeneratedImage::new(vec![0xFF, 0xD8])
    }

    #[test]
    fn test_render_pages_in_order() {
        let mut gallery = Gallery::new(" Deep  Sea ");
        gallery.render_page(GeneratedPage::cover(image())).unwrap();
        gallery
            .render_page(GeneratedPage::interior(1, image()))
            .unwrap();

        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery.cover().unwrap().file_name, "Deep_Sea_cover.jpg");
        let names: Vec<&str> = gallery
            .interior_pages()
            .map(|item| item.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["Deep_Sea_page_1.jpg"]);
    }

    #[test]
    fn test_rejects_gaps_and_duplicates() {
        let mut gallery = Gallery::new("Cats");
        assert!(gallery
            .render_page(GeneratedPage::interior(1, image()))
            .is_err());

        gallery.render_page(GeneratedPage::cover(image())).unwrap();
        assert!(gallery.render_page(GeneratedPage::cover(image())).is_err());
        assert!(gallery
            .render_page(GeneratedPage::interior(2, image()))
            .is_err());
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn test_reset_clears_previous_run() {
        let mut gallery = Gallery::new("Cats");
        gallery.render_page(GeneratedPage::cover(image())).unwrap();

        gallery.reset("Dogs");
        assert!(gallery.is_empty());
        assert_eq!(gallery.theme(), "Dogs");
        assert!(gallery.cover().is_none());
    }
}
