//! 页面生成流程 - 流程层
//!
//! 核心职责：定义"一本涂色书"的生成顺序，产出一个惰性的页面序列
//!
//! 流程顺序：
//! 1. 封面（1 张）
//! 2. 内页批次（每批最多 4 张，严格按顺序逐批请求）
//!
//! 序列是有限的、只能消费一次。任何一步失败都会产出一个错误并结束序列，
//! 之后的批次不会再发起请求。本模块不持有任何展示状态，渲染由订阅方负责。

use std::collections::VecDeque;

use futures::stream::{self, Stream};
use tracing::{info, warn};

use crate::error::{AppError, AppResult, FailedStage};
use crate::models::{BookRequest, GeneratedPage};
use crate::services::{cover_prompt, page_prompt, ImageGenerator, ImageRequest};
use crate::utils::logging;
use crate::workflow::batch_plan::{plan_batches, BatchSpec};

#[derive(Debug, Clone, Copy)]
enum Step {
    Cover,
    Batch(BatchSpec),
}

struct PageSequence<'a, G: ?Sized> {
    generator: &'a G,
    theme: &'a str,
    total_pages: usize,
    total_batches: usize,
    steps: VecDeque<Step>,
    ready: VecDeque<GeneratedPage>,
    finished: bool,
}

impl<'a, G: ImageGenerator + ?Sized> PageSequence<'a, G> {
    async fn run_step(&self, step: Step) -> AppResult<Vec<GeneratedPage>> {
        match step {
            Step::Cover => self.generate_cover().await,
            Step::Batch(batch) => self.generate_batch(batch).await,
        }
    }

    async fn generate_cover(&self) -> AppResult<Vec<GeneratedPage>> {
        info!("[涂色书 {}] 🎨 正在生成封面...", self.theme);

        let request = ImageRequest::new(cover_prompt(self.theme), 1);
        let mut images = self.generator.generate_images(&request).await?;

        if images.is_empty() {
            warn!("[涂色书 {}] ⚠️ 封面请求没有返回图片", self.theme);
            return Err(AppError::generation_failed(FailedStage::Cover));
        }
        if images.len() > 1 {
            warn!(
                "[涂色书 {}] 封面请求返回了 {} 张，只保留第一张",
                self.theme,
                images.len()
            );
        }

        info!("[涂色书 {}] ✓ 封面生成成功", self.theme);
        Ok(vec![GeneratedPage::cover(images.swap_remove(0))])
    }

    async fn generate_batch(&self, batch: BatchSpec) -> AppResult<Vec<GeneratedPage>> {
        let (first, last) = batch.page_range();
        logging::log_batch_start(
            batch.number,
            self.total_batches,
            first,
            last,
            self.total_pages - 1,
        );

        let request = ImageRequest::new(page_prompt(self.theme), batch.size);
        let mut images = self.generator.generate_images(&request).await?;

        // 数量不足会导致页码不连续，整批视为失败
        if images.len() < batch.size {
            warn!(
                "[涂色书 {}] ⚠️ {} 只收到 {}/{} 张",
                self.theme,
                batch,
                images.len(),
                batch.size
            );
            return Err(AppError::generation_failed(FailedStage::Batch {
                start: batch.start,
            }));
        }
        if images.len() > batch.size {
            warn!(
                "[涂色书 {}] {} 多返回了 {} 张，已丢弃",
                self.theme,
                batch,
                images.len() - batch.size
            );
            images.truncate(batch.size);
        }

        logging::log_batch_complete(batch.number, images.len(), batch.size);

        Ok(images
            .into_iter()
            .enumerate()
            .map(|(local_index, image)| GeneratedPage::interior(batch.page_index(local_index), image))
            .collect())
    }
}

/// 生成一本涂色书的页面序列
///
/// # 参数
/// - `generator`: 图片生成能力
/// - `request`: 已校验的请求
///
/// # 返回
/// 按页码顺序产出页面的异步序列；遇到第一个错误后结束
pub fn generate_pages<'a, G>(
    generator: &'a G,
    request: &'a BookRequest,
) -> impl Stream<Item = AppResult<GeneratedPage>> + 'a
where
    G: ImageGenerator + ?Sized,
{
    let batches = plan_batches(request.pages_to_generate());
    logging::log_batch_plan(request.pages_to_generate(), batches.len());

    let mut steps = VecDeque::with_capacity(batches.len() + 1);
    steps.push_back(Step::Cover);
    steps.extend(batches.iter().copied().map(Step::Batch));

    let sequence = PageSequence {
        generator,
        theme: request.theme(),
        total_pages: request.page_count(),
        total_batches: batches.len(),
        steps,
        ready: VecDeque::new(),
        finished: false,
    };

    stream::unfold(sequence, |mut sequence| async move {
        loop {
            if let Some(page) = sequence.ready.pop_front() {
                return Some((Ok(page), sequence));
            }
            if sequence.finished {
                return None;
            }
            let step = sequence.steps.pop_front()?;
            match sequence.run_step(step).await {
                Ok(pages) => sequence.ready.extend(pages),
                Err(e) => {
                    sequence.finished = true;
                    return Some((Err(e), sequence));
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeneratedImage;
    use async_trait::async_trait;
    use futures::StreamExt;
    use parking_lot::Mutex;

    /// 按调用顺序返回预设数量的图片
    struct ScriptedGenerator {
        responses: Mutex<VecDeque<usize>>,
        calls: Mutex<Vec<usize>>,
    }

    impl ScriptedGenerator {
        fn new(responses: &[usize]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().copied().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ImageGenerator for ScriptedGenerator {
        async fn generate_images(&self, request: &ImageRequest) -> AppResult<Vec<GeneratedImage>> {
            let call = self.calls.lock().len() as u8;
            self.calls.lock().push(request.number_of_images);
            let count = self.responses.lock().pop_front().unwrap_or(0);
            Ok((0..count)
                .map(|i| GeneratedImage::new(vec![call, i as u8]))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_sequence_is_lazy() {
        let generator = ScriptedGenerator::new(&[1, 4]);
        let request = BookRequest::new("Dinosaurs", 5).unwrap();

        let stream = generate_pages(&generator, &request);
        assert!(generator.calls.lock().is_empty());

        let pages: Vec<_> = stream.collect().await;
        assert_eq!(pages.len(), 5);
        assert_eq!(*generator.calls.lock(), vec![1, 4]);
    }

    #[tokio::test]
    async fn test_pages_keep_service_order_within_batch() {
        let generator = ScriptedGenerator::new(&[1, 4]);
        let request = BookRequest::new("Dinosaurs", 5).unwrap();

        let pages: Vec<GeneratedPage> = generate_pages(&generator, &request)
            .map(|item| item.unwrap())
            .collect()
            .await;

        assert!(pages[0].is_cover);
        for (local, page) in pages[1..].iter().enumerate() {
            assert_eq!(page.index, local + 1);
            assert_eq!(page.image.bytes, vec![1, local as u8]);
            assert!(!page.is_cover);
        }
    }

    #[tokio::test]
    async fn test_short_batch_fails_and_ends_sequence() {
        let generator = ScriptedGenerator::new(&[1, 3, 4]);
        let request = BookRequest::new("Space", 9).unwrap();

        let items: Vec<_> = generate_pages(&generator, &request).collect().await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(
            items[1],
            Err(AppError::GenerationFailed {
                stage: FailedStage::Batch { start: 0 }
            })
        ));
        assert_eq!(*generator.calls.lock(), vec![1, 4]);
    }

    #[tokio::test]
    async fn test_extra_images_are_dropped() {
        let generator = ScriptedGenerator::new(&[2, 4]);
        let request = BookRequest::new("Space", 3).unwrap();

        let pages: Vec<_> = generate_pages(&generator, &request).collect().await;

        assert_eq!(pages.len(), 3);
        assert_eq!(*generator.calls.lock(), vec![1, 2]);
    }
}
