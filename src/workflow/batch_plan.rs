//! 批次划分
//!
//! 封装"这是第几批、从第几页开始、要几张"这一信息

use std::fmt::Display;

use crate::services::MAX_IMAGES_PER_CALL;

/// 一个内页批次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSpec {
    /// 批次编号（从1开始，仅用于日志显示）
    pub number: usize,
    /// 本批之前已生成的内页数量
    pub start: usize,
    /// 本批请求的图片数量
    pub size: usize,
}

impl BatchSpec {
    /// 本批第 `local_index` 张图片对应的全局页码（封面为 0）
    pub fn page_index(&self, local_index: usize) -> usize {
        self.start + local_index + 1
    }

    /// 本批覆盖的页码范围（闭区间）
    pub fn page_range(&self) -> (usize, usize) {
        (self.page_index(0), self.page_index(self.size - 1))
    }
}

impl Display for BatchSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (first, last) = self.page_range();
        write!(
            f,
            "[批次#{} 页码#{}-{} 数量#{}]",
            self.number, first, last, self.size
        )
    }
}

/// 将需要生成的内页划分为批次
///
/// 批次数为 `ceil(k / 4)`，每批请求 `min(4, 剩余数量)` 张。
pub fn plan_batches(pages_to_generate: usize) -> Vec<BatchSpec> {
    (0..pages_to_generate)
        .step_by(MAX_IMAGES_PER_CALL)
        .enumerate()
        .map(|(i, start)| BatchSpec {
            number: i + 1,
            start,
            size: MAX_IMAGES_PER_CALL.min(pages_to_generate - start),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_batches_counts() {
        for k in 0..=21 {
            let plan = plan_batches(k);
            assert_eq!(plan.len(), k.div_ceil(4), "k = {}", k);
            assert_eq!(plan.iter().map(|b| b.size).sum::<usize>(), k);
            assert!(plan.iter().all(|b| (1..=4).contains(&b.size)));
        }
    }

    #[test]
    fn test_plan_batches_sizes() {
        let sizes: Vec<usize> = plan_batches(8).iter().map(|b| b.size).collect();
        assert_eq!(sizes, vec![4, 4]);

        let sizes: Vec<usize> = plan_batches(10).iter().map(|b| b.size).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn test_page_indices_are_contiguous() {
        let indices: Vec<usize> = plan_batches(6)
            .iter()
            .flat_map(|b| (0..b.size).map(move |i| b.page_index(i)))
            .collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_display() {
        let batch = plan_batches(6)[1];
        assert_eq!(batch.to_string(), "[批次#2 页码#5-6 数量#2]");
    }
}
