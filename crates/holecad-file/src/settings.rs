//! 导出设置

use serde::{Deserialize, Serialize};

/// 输出的 DXF 版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DxfVersion {
    R12,
    R2000,
    #[default]
    R2010,
}

impl DxfVersion {
    pub fn to_acad(self) -> dxf::enums::AcadVersion {
        match self {
            DxfVersion::R12 => dxf::enums::AcadVersion::R12,
            DxfVersion::R2000 => dxf::enums::AcadVersion::R2000,
            DxfVersion::R2010 => dxf::enums::AcadVersion::R2010,
        }
    }
}

/// DXF 导出设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub dxf_version: DxfVersion,
    /// 所有圆放在同一图层
    pub layer: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            dxf_version: DxfVersion::R2010,
            layer: "0".to_string(),
        }
    }
}
