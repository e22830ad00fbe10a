//! 应用配置
//!
//! 保存在 `<config_dir>/holecad/config.json`，文件不存在或无法读取时使用默认值。

use anyhow::{Context, Result};
use holecad_core::preview::PREVIEW_MARGIN;
use holecad_file::ExportSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "holecad";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub export: ExportSettings,
    /// 预览视图边距
    pub preview_margin: f64,
    pub window_size: [f32; 2],
    /// 上次导出的目录，下次保存对话框从这里打开
    pub last_export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export: ExportSettings::default(),
            preview_margin: PREVIEW_MARGIN,
            window_size: [1000.0, 720.0],
            last_export_dir: None,
        }
    }
}

impl AppConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON config {}", path.display()))?;
        Ok(config.sanitized())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// 从默认位置加载，失败时回退到默认配置
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Using default config: {:#}", e);
                Self::default()
            }
        }
    }

    /// 保存到默认位置，失败只记录日志
    pub fn save_default(&self) {
        let Some(path) = Self::default_path() else {
            return;
        };
        if let Err(e) = self.save_to_file(&path) {
            tracing::warn!("Failed to save config: {:#}", e);
        }
    }

    /// 修正不合理的取值
    fn sanitized(mut self) -> Self {
        if !self.preview_margin.is_finite() || self.preview_margin < 0.0 {
            self.preview_margin = PREVIEW_MARGIN;
        }
        if self.window_size.iter().any(|v| !v.is_finite() || *v < 200.0) {
            self.window_size = Self::default().window_size;
        }
        self
    }
}
