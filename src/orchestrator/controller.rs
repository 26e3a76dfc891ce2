//! 涂色书控制器 - 编排层
//!
//! ## 职责
//!
//! 持有"当前这一次生成"的全部可变状态，是唯一会修改运行状态的地方。
//!
//! ## 核心功能
//!
//! 1. **并发保护**：已有任务运行时拒绝新的提交
//! 2. **渐进渲染**：订阅页面序列，每到一页就写入画廊并通知渲染器
//! 3. **状态收尾**：无论成功、失败还是任务被丢弃，运行状态都会离开 Running
//! 4. **失败保留**：失败时已渲染的页面保留在画廊中，但不开放导出

use futures::StreamExt;
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{BookRequest, GeneratedPage, RunProgress, RunState};
use crate::orchestrator::gallery::{Gallery, PageRenderer};
use crate::services::ImageGenerator;
use crate::workflow::generate_pages;

/// 涂色书控制器
pub struct BookController<G> {
    generator: G,
    state: Mutex<RunState>,
    gallery: RwLock<Gallery>,
    renderers: Vec<Box<dyn PageRenderer>>,
}

/// 离开作用域时确保运行状态不再停留在 Running
struct RunGuard<'a> {
    state: &'a Mutex<RunState>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.is_running() {
            warn!("⚠️ 生成任务未正常结束，已重置运行状态");
            *state = RunState::Failed("生成任务被中断".to_string());
        }
    }
}

impl<G: ImageGenerator> BookController<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            state: Mutex::new(RunState::Idle),
            gallery: RwLock::new(Gallery::default()),
            renderers: Vec::new(),
        }
    }

    /// 注册一个页面渲染订阅者
    pub fn with_renderer(mut self, renderer: impl PageRenderer + 'static) -> Self {
        self.renderers.push(Box::new(renderer));
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn state(&self) -> RunState {
        self.state.lock().clone()
    }

    pub fn export_enabled(&self) -> bool {
        self.state.lock().export_enabled()
    }

    /// 读取当前画廊
    pub fn gallery(&self) -> RwLockReadGuard<'_, Gallery> {
        self.gallery.read()
    }

    /// 从原始表单输入提交
    ///
    /// 校验失败时立即返回，不会启动任务，也不会改变运行状态。
    pub async fn submit_form(&self, theme: &str, page_count: i64) -> AppResult<usize> {
        let request = BookRequest::new(theme, page_count)?;
        self.submit(&request).await
    }

    /// 执行一次完整的生成
    ///
    /// # 返回
    /// 成功时返回渲染的总页数
    pub async fn submit(&self, request: &BookRequest) -> AppResult<usize> {
        let _guard = self.begin_run(request)?;

        let outcome = self.drive(request).await;

        {
            let mut state = self.state.lock();
            match &outcome {
                Ok(rendered) => {
                    info!("[涂色书 {}] ✅ 生成完成，共 {} 页", request.theme(), rendered);
                    *state = RunState::Succeeded;
                }
                Err(e) => {
                    error!("[涂色书 {}] ❌ 生成失败: {}", request.theme(), e);
                    *state = RunState::Failed(e.to_string());
                }
            }
        }

        outcome
    }

    fn begin_run(&self, request: &BookRequest) -> AppResult<RunGuard<'_>> {
        {
            let mut state = self.state.lock();
            if state.is_running() {
                warn!(
                    "[涂色书 {}] ⚠️ 已有任务在运行，忽略本次提交",
                    request.theme()
                );
                return Err(AppError::RunInProgress);
            }
            *state = RunState::Running(RunProgress::new(request.page_count()));
        }

        self.gallery.write().reset(request.theme());
        info!(
            "[涂色书 {}] 开始生成，共 {} 页",
            request.theme(),
            request.page_count()
        );

        Ok(RunGuard { state: &self.state })
    }

    async fn drive(&self, request: &BookRequest) -> AppResult<usize> {
        let pages = generate_pages(&self.generator, request);
        futures::pin_mut!(pages);

        while let Some(page) = pages.next().await {
            self.render(page?)?;
        }

        let rendered = self.gallery.read().len();
        if rendered != request.page_count() {
            return Err(AppError::Unexpected(format!(
                "页数不符: 期望 {}, 实际 {}",
                request.page_count(),
                rendered
            )));
        }
        Ok(rendered)
    }

    fn render(&self, page: GeneratedPage) -> AppResult<()> {
        let mut gallery = self.gallery.write();
        gallery.render_page(page)?;

        let progress = {
            let mut state = self.state.lock();
            match &mut *state {
                RunState::Running(progress) => {
                    progress.completed = gallery.len();
                    *progress
                }
                _ => RunProgress {
                    completed: gallery.len(),
                    total: gallery.len(),
                },
            }
        };

        if let Some(item) = gallery.items().last() {
            for renderer in &self.renderers {
                renderer.render(item, progress);
            }
        }
        Ok(())
    }
}
