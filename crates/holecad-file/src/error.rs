//! 导出错误定义

use holecad_core::PatternError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    /// 参数无效（基圆直径或阵列参数），此时不会产生任何输出
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// 写入图纸失败
    #[error("Failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    #[error("DXF error: {0}")]
    Dxf(String),
}

impl ExportError {
    /// 是否为参数校验错误（可由用户修改输入后重试）
    pub fn is_validation(&self) -> bool {
        matches!(self, ExportError::Pattern(_))
    }
}
