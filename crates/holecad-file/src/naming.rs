//! 零件名称与导出文件名
//!
//! - 名称为空时默认为 `D_<基圆直径，两位小数>`
//! - 有代号时文件名为 `<代号>_<名称>.dxf`，否则为 `<名称>.dxf`
//! - 用户选择的路径不以 `.dxf` 结尾时追加扩展名

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 导出文件扩展名
pub const DXF_EXTENSION: &str = "dxf";

/// 用户输入的零件信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailInfo {
    /// 代号（可为空）
    pub designation: String,
    /// 名称（可为空）
    pub name: String,
}

impl DetailInfo {
    pub fn new(designation: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            designation: designation.into(),
            name: name.into(),
        }
    }

    /// 名称，为空时由基圆直径生成
    pub fn effective_name(&self, main_diameter: f64) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            format!("D_{:.2}", main_diameter)
        } else {
            name.to_string()
        }
    }

    /// 零件全名：`<代号>_<名称>` 或 `<名称>`
    pub fn detail_name(&self, main_diameter: f64) -> String {
        let name = self.effective_name(main_diameter);
        let designation = self.designation.trim();
        if designation.is_empty() {
            name
        } else {
            format!("{}_{}", designation, name)
        }
    }

    /// 默认导出文件名
    pub fn file_name(&self, main_diameter: f64) -> String {
        format!("{}.{}", self.detail_name(main_diameter), DXF_EXTENSION)
    }
}

/// 确保路径以 `.dxf` 结尾（不区分大小写），否则追加扩展名
///
/// 追加而不是替换：`part.v2` 变为 `part.v2.dxf`。
pub fn ensure_dxf_extension(path: &Path) -> PathBuf {
    // 按文件名后缀判断：`.dxf` 这样的文件名没有 `extension()`
    let suffix = format!(".{}", DXF_EXTENSION);
    let has_extension = path
        .file_name()
        .map(|name| name.to_string_lossy().to_ascii_lowercase().ends_with(&suffix))
        .unwrap_or(false);

    if has_extension {
        return path.to_path_buf();
    }

    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(".");
    raw.push(DXF_EXTENSION);
    PathBuf::from(raw)
}
