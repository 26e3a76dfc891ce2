#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use coloring_book::{AppError, AppResult, GeneratedImage, ImageGenerator, ImageRequest};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use parking_lot::Mutex;

/// 预设的一次响应
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// 返回指定数量的图片（0 表示空结果）
    Images(usize),
    /// 返回网络层错误
    Fail,
}

/// 测试用图片生成器
///
/// 按预设脚本依次响应；脚本用完后按请求数量返回图片。
pub struct FakeGenerator {
    script: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<ImageRequest>>,
    delay: Option<Duration>,
}

impl FakeGenerator {
    pub fn fulfilling() -> Self {
        Self::scripted(&[])
    }

    pub fn scripted(replies: &[Reply]) -> Self {
        Self {
            script: Mutex::new(replies.iter().copied().collect()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// 每次调用请求的图片数量
    pub fn call_sizes(&self) -> Vec<usize> {
        self.calls
            .lock()
            .iter()
            .map(|request| request.number_of_images)
            .collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|request| request.prompt.clone())
            .collect()
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate_images(&self, request: &ImageRequest) -> AppResult<Vec<GeneratedImage>> {
        let call = {
            let mut calls = self.calls.lock();
            calls.push(request.clone());
            calls.len()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .script
            .lock()
            .pop_front()
            .unwrap_or(Reply::Images(request.number_of_images));

        match reply {
            Reply::Images(count) => Ok((0..count).map(|i| sample_image(call, i)).collect()),
            Reply::Fail => Err(AppError::BadResponse {
                endpoint: "fake:predict".to_string(),
                status: 503,
                body: "unavailable".to_string(),
            }),
        }
    }
}

/// 一张可解码的小 JPEG
pub fn sample_jpeg(shade: u8) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 10, Rgb([shade, shade, shade])));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .unwrap();
    bytes
}

fn sample_image(call: usize, local_index: usize) -> GeneratedImage {
    let mut image = GeneratedImage::new(sample_jpeg((call * 16 + local_index) as u8));
    image.mime_type = Some("image/jpeg".to_string());
    image
}
