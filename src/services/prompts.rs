//! 提示词构建
//!
//! 提示词只由主题决定，相同主题总是得到相同的提示词。

/// 构建封面提示词
pub fn cover_prompt(theme: &str) -> String {
    format!(
        "A vibrant, playful cover for a children's coloring book about \"{}\". \
         Bright cheerful colors, friendly cartoon style, a clear empty area at the top \
         for the book title, no text.",
        theme
    )
}

/// 构建内页线稿提示词
pub fn page_prompt(theme: &str) -> String {
    format!(
        "A black and white line-art coloring page for young children, theme: \"{}\". \
         Thick clean outlines, simple shapes, no shading, no grayscale, no color, \
         pure white background, one clear subject filling the page.",
        theme
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_are_deterministic() {
        assert_eq!(cover_prompt("Space"), cover_prompt("Space"));
        assert_eq!(page_prompt("Space"), page_prompt("Space"));
        assert_ne!(cover_prompt("Space"), page_prompt("Space"));
        assert!(page_prompt("Dinosaurs").contains("\"Dinosaurs\""));
        assert!(page_prompt("Dinosaurs").contains("line-art"));
    }
}
