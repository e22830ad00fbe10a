//! HoleCAD 文件导出
//!
//! 支持：
//! - 孔阵零件导出为 `.dxf`（只包含圆图元）
//! - 默认文件名生成（代号 + 名称）
//! - 读取导出的 `.dxf` 中的圆，用于核对

pub mod document;
pub mod dxf_io;
pub mod error;
pub mod naming;
pub mod settings;

pub use document::{DrawingExporter, DrawingSink, ExportDocument};
pub use dxf_io::{read_circles, DxfDrawingSink};
pub use error::ExportError;
pub use naming::{ensure_dxf_extension, DetailInfo, DXF_EXTENSION};
pub use settings::{DxfVersion, ExportSettings};
