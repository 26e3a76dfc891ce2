use std::str::FromStr;

use tracing::warn;

/// 逐个保存图片的最大间隔（毫秒）
pub const MAX_DOWNLOAD_INTERVAL_MS: u64 = 60_000;

/// 导出方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportMode {
    /// 只导出 PDF
    Pdf,
    /// 只导出单张图片
    Files,
    /// 两者都导出
    Both,
    /// 不导出
    None,
}

impl ExportMode {
    pub fn wants_document(self) -> bool {
        matches!(self, ExportMode::Pdf | ExportMode::Both)
    }

    pub fn wants_files(self) -> bool {
        matches!(self, ExportMode::Files | ExportMode::Both)
    }
}

impl FromStr for ExportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportMode::Pdf),
            "files" | "images" => Ok(ExportMode::Files),
            "both" | "all" => Ok(ExportMode::Both),
            "none" => Ok(ExportMode::None),
            other => Err(format!("未知的导出方式: {}", other)),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 图片生成服务配置 ---
    pub image_api_key: String,
    pub image_api_base_url: String,
    pub image_model_name: String,
    /// 固定宽高比
    pub image_aspect_ratio: String,
    /// 固定输出格式
    pub image_output_mime_type: String,
    // --- 涂色书请求 ---
    pub book_theme: String,
    /// 保持原始输入，校验在 BookRequest 中完成
    pub book_page_count: i64,
    // --- 导出配置 ---
    pub export_mode: ExportMode,
    /// 导出文件目录
    pub output_dir: String,
    /// PDF 页面四周统一边距（毫米）
    pub pdf_margin_mm: f32,
    /// 逐个保存图片时每个文件之间的间隔（毫秒）
    pub download_interval_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_api_key: String::new(),
            image_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            image_model_name: "imagen-4.0-generate-001".to_string(),
            image_aspect_ratio: "3:4".to_string(),
            image_output_mime_type: "image/jpeg".to_string(),
            book_theme: "Dinosaurs".to_string(),
            book_page_count: 5,
            export_mode: ExportMode::Both,
            output_dir: "output_books".to_string(),
            pdf_margin_mm: 10.0,
            download_interval_ms: 300,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            image_api_key: std::env::var("IMAGE_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .unwrap_or(default.image_api_key),
            image_api_base_url: std::env::var("IMAGE_API_BASE_URL").unwrap_or(default.image_api_base_url),
            image_model_name: std::env::var("IMAGE_MODEL_NAME").unwrap_or(default.image_model_name),
            image_aspect_ratio: std::env::var("IMAGE_ASPECT_RATIO").unwrap_or(default.image_aspect_ratio),
            image_output_mime_type: std::env::var("IMAGE_OUTPUT_MIME_TYPE").unwrap_or(default.image_output_mime_type),
            book_theme: std::env::var("BOOK_THEME").unwrap_or(default.book_theme),
            book_page_count: std::env::var("BOOK_PAGE_COUNT").ok().and_then(|v| v.trim().parse().ok()).unwrap_or(default.book_page_count),
            export_mode: std::env::var("EXPORT_MODE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.export_mode),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            pdf_margin_mm: std::env::var("PDF_MARGIN_MM").ok().and_then(|v| v.parse().ok()).unwrap_or(default.pdf_margin_mm),
            download_interval_ms: std::env::var("DOWNLOAD_INTERVAL_MS").ok().and_then(|v| v.trim().parse().ok()).map(bounded_interval_ms).unwrap_or(default.download_interval_ms),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}

/// 限制保存间隔不超过上限
fn bounded_interval_ms(value: u64) -> u64 {
    if value > MAX_DOWNLOAD_INTERVAL_MS {
        warn!(
            "DOWNLOAD_INTERVAL_MS={} 超过上限，使用 {}",
            value, MAX_DOWNLOAD_INTERVAL_MS
        );
        MAX_DOWNLOAD_INTERVAL_MS
    } else {
        value
    }
}
