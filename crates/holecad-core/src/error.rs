//! 参数校验与CAD桥接错误定义

use std::fmt;
use thiserror::Error;

/// 孔阵参数中的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayField {
    /// 阵列直径
    ArrayDiameter,
    /// 孔数
    HolesCount,
    /// 孔径
    HoleDiameter,
    /// 旋转角度
    Rotation,
}

impl ArrayField {
    pub fn name(&self) -> &'static str {
        match self {
            ArrayField::ArrayDiameter => "array diameter",
            ArrayField::HolesCount => "holes count",
            ArrayField::HoleDiameter => "hole diameter",
            ArrayField::Rotation => "rotation",
        }
    }
}

impl fmt::Display for ArrayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 几何计算前的参数错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    #[error("Invalid main diameter: {0}")]
    InvalidMainDiameter(String),

    /// `index` 为阵列在列表中的位置（从0开始），消息中显示为从1开始的序号
    #[error("Invalid array parameter in array #{number}: {field} {reason}", number = .index + 1)]
    InvalidArrayParameter {
        index: usize,
        field: ArrayField,
        reason: String,
    },
}

impl PatternError {
    pub fn array(index: usize, field: ArrayField, reason: impl Into<String>) -> Self {
        PatternError::InvalidArrayParameter {
            index,
            field,
            reason: reason.into(),
        }
    }
}

/// CAD 宿主桥接错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CadError {
    #[error("CAD host unavailable: {0}")]
    Unavailable(String),

    #[error("CAD automation failed: {0}")]
    Automation(String),

    #[error("Invalid thickness: {0} (must be > 0)")]
    InvalidThickness(f64),

    #[error("Invalid part: {0}")]
    InvalidPart(String),
}

impl CadError {
    /// 是否属于"宿主不可用"一类（包括调用失败）
    pub fn is_host_unavailable(&self) -> bool {
        matches!(self, CadError::Unavailable(_) | CadError::Automation(_))
    }
}
