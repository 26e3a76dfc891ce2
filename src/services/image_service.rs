//! 图片生成服务 - 业务能力层
//!
//! 只描述"给一个提示词，生成若干张图片"的能力，不关心批次和页码。

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::GeneratedImage;

/// 单次调用最多可请求的图片数量
pub const MAX_IMAGES_PER_CALL: usize = 4;

/// 一次图片生成请求
///
/// 模型、输出格式和宽高比由具体实现的配置固定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    /// 取值范围 1..=4
    pub number_of_images: usize,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>, number_of_images: usize) -> Self {
        Self {
            prompt: prompt.into(),
            number_of_images: number_of_images.clamp(1, MAX_IMAGES_PER_CALL),
        }
    }
}

/// 图片生成能力
///
/// 职责：
/// - 调用外部服务生成图片
/// - 按服务返回的顺序给出图片
/// - 服务无结果时返回空列表，由调用方决定如何处理
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_images(&self, request: &ImageRequest) -> AppResult<Vec<GeneratedImage>>;
}
