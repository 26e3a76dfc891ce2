//! 生成任务状态

/// 生成进度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunProgress {
    /// 已渲染的页数（含封面）
    pub completed: usize,
    /// 请求的总页数
    pub total: usize,
}

impl RunProgress {
    pub fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }
}

/// 当前生成任务的状态
///
/// 由控制器独占修改，提交入口只读取它来拒绝并发提交。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running(RunProgress),
    Succeeded,
    Failed(String),
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running(_))
    }

    /// 只有成功完成的任务才允许导出
    pub fn export_enabled(&self) -> bool {
        matches!(self, RunState::Succeeded)
    }
}
