//! 导出文件命名

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("静态正则表达式")
});

/// 路径分隔符和常见文件系统不接受的字符
static UNSAFE_FILE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[/\\:*?"<>|\x00-\x1F]"#).expect("静态正则表达式")
});

/// 清理主题字符串用作文件名
///
/// 去除首尾空白，内部连续空白折叠为单个下划线。
pub fn sanitize_theme(theme: &str) -> String {
    WHITESPACE_RUN.replace_all(theme.trim(), "_").into_owned()
}

/// 文件名前缀，路径分隔符等字符替换为 `_`
fn file_stem(sanitized_theme: &str) -> String {
    UNSAFE_FILE_CHARS
        .replace_all(sanitized_theme, "_")
        .into_owned()
}

/// 单页图片文件名
///
/// - 封面: `<主题>_cover.jpg`
/// - 内页: `<主题>_page_<页码>.jpg`
pub fn page_file_name(sanitized_theme: &str, index: usize, is_cover: bool) -> String {
    let stem = file_stem(sanitized_theme);
    if is_cover {
        format!("{}_cover.jpg", stem)
    } else {
        format!("{}_page_{}.jpg", stem, index)
    }
}

/// PDF 文件名
pub fn document_file_name(sanitized_theme: &str) -> String {
    format!("{}_coloring_book.pdf", file_stem(sanitized_theme))
}

/// 是否为单个普通文件名（不含目录，不是 `.` 或 `..`）
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}
