//! 导出层（Export Layer）
//!
//! ## 职责
//!
//! 读取当前画廊中已经渲染的页面，生成输出文件。导出只依赖画廊，
//! 不接触生成流程内部的序列。
//!
//! ## 模块划分
//!
//! ### `pdf_writer` - 固定页面尺寸的 PDF 文档
//! ### `download_queue` - 按固定间隔逐个保存文件的队列
//!
//! ## 两种导出
//!
//! 1. **PDF**：只包含内页，每页一张图片，四周统一边距，拉伸填满
//! 2. **单张图片**：包含封面在内的所有页面，使用预先计算的文件名

pub mod download_queue;
pub mod pdf_writer;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::orchestrator::Gallery;
use crate::utils::{document_file_name, is_plain_file_name};

pub use download_queue::{DownloadHandle, DownloadQueue, DownloadReport, DownloadTask};
pub use pdf_writer::{EmbeddedImage, Orientation, PageFormat, PdfDocument};

/// PDF 页面布局
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentLayout {
    pub orientation: Orientation,
    pub format: PageFormat,
    /// 四周统一边距（毫米）
    pub margin_mm: f32,
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            format: PageFormat::A4,
            margin_mm: 10.0,
        }
    }
}

impl DocumentLayout {
    pub fn with_margin(margin_mm: f32) -> Self {
        Self {
            margin_mm,
            ..Self::default()
        }
    }

    /// 图片放置区域 `(x, y, w, h)`，单位毫米
    ///
    /// 区域大小与图片原始比例无关，图片会被拉伸填满。
    pub fn image_area(&self) -> (f32, f32, f32, f32) {
        let page = self.format.oriented(self.orientation);
        (
            self.margin_mm,
            self.margin_mm,
            page.width_mm - 2.0 * self.margin_mm,
            page.height_mm - 2.0 * self.margin_mm,
        )
    }
}

/// 导出 PDF
///
/// # 参数
/// - `gallery`: 当前画廊
/// - `layout`: 页面布局
/// - `output_dir`: 输出目录
///
/// # 返回
/// 没有内页时不创建文档，返回 `None`；否则返回 PDF 路径
pub fn export_document(
    gallery: &Gallery,
    layout: &DocumentLayout,
    output_dir: &Path,
) -> AppResult<Option<PathBuf>> {
    let pages: Vec<_> = gallery.interior_pages().collect();
    if pages.is_empty() {
        info!("没有可导出的内页，跳过 PDF 导出");
        return Ok(None);
    }

    info!("📚 正在导出 PDF，共 {} 页...", pages.len());

    let mut pdf = PdfDocument::new(layout.orientation, layout.format);
    let (x, y, w, h) = layout.image_area();

    for (i, item) in pages.iter().enumerate() {
        if i > 0 {
            pdf.add_page();
        }
        let image = EmbeddedImage::from_bytes(&item.page.image.bytes)?;
        pdf.add_image(&image, x, y, w, h);
    }

    let file_name = document_file_name(gallery.sanitized_theme());
    if !is_plain_file_name(&file_name) {
        return Err(AppError::Unexpected(format!("无效的 PDF 文件名: {}", file_name)));
    }

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);
    pdf.save(&path)?;

    info!("✓ PDF 已保存: {}", path.display());
    Ok(Some(path))
}

/// 逐个保存所有页面（含封面）
///
/// # 参数
/// - `gallery`: 当前画廊
/// - `output_dir`: 输出目录
/// - `interval`: 相邻两个文件之间的间隔
///
/// # 返回
/// 队列句柄，可以等待全部保存完成
pub fn export_individual_files(
    gallery: &Gallery,
    output_dir: &Path,
    interval: Duration,
) -> AppResult<DownloadHandle> {
    let mut queue = DownloadQueue::new(interval);
    for item in gallery.items() {
        queue.push(DownloadTask {
            file_name: item.file_name.clone(),
            bytes: item.page.image.bytes.clone(),
        });
    }

    if !queue.is_empty() {
        fs::create_dir_all(output_dir)?;
        info!(
            "📥 开始逐个保存 {} 个文件，间隔 {} 毫秒",
            queue.len(),
            interval.as_millis()
        );
    }

    Ok(queue.start(output_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_area_uses_uniform_margin() {
        let layout = DocumentLayout::default();
        assert_eq!(layout.image_area(), (10.0, 10.0, 190.0, 277.0));

        let landscape = DocumentLayout {
            orientation: Orientation::Landscape,
            ..DocumentLayout::with_margin(5.0)
        };
        assert_eq!(landscape.image_area(), (5.0, 5.0, 287.0, 200.0));
    }
}
