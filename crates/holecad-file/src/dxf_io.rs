//! DXF文件导出/读取
//!
//! 只输出圆图元，默认 AutoCAD R2010 格式，常见 CAD 软件均可打开。

use crate::document::DrawingSink;
use crate::error::ExportError;
use crate::settings::ExportSettings;
use holecad_core::geometry::Circle;
use holecad_core::math::Point2;
use std::path::Path;

/// 基于 `dxf` crate 的图纸输出目标
pub struct DxfDrawingSink {
    drawing: dxf::Drawing,
    layer: String,
}

impl DxfDrawingSink {
    /// 新建空白图纸
    pub fn new(settings: &ExportSettings) -> Self {
        let mut drawing = dxf::Drawing::new();
        drawing.header.version = settings.dxf_version.to_acad();

        Self {
            drawing,
            layer: settings.layer.clone(),
        }
    }

    /// 已添加的实体数量
    pub fn entity_count(&self) -> usize {
        self.drawing.entities().count()
    }
}

impl DrawingSink for DxfDrawingSink {
    fn add_circle(&mut self, circle: &Circle) {
        let mut dxf_circle = dxf::entities::Circle::default();
        dxf_circle.center = dxf::Point::new(circle.center.x, circle.center.y, 0.0);
        dxf_circle.radius = circle.radius;

        let mut entity = dxf::entities::Entity::new(dxf::entities::EntityType::Circle(dxf_circle));
        entity.common.layer = self.layer.clone();

        self.drawing.add_entity(entity);
    }

    fn save(&self, path: &Path) -> Result<(), ExportError> {
        self.drawing
            .save_file(path)
            .map_err(|e| ExportError::Write {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

/// 读取 DXF 文件中的所有圆（按文件中的顺序）
///
/// 用于检查导出的图纸能被标准 DXF 读取器打开，并与导出文档一致。
pub fn read_circles(path: &Path) -> Result<Vec<Circle>, ExportError> {
    let drawing = dxf::Drawing::load_file(path).map_err(|e| ExportError::Dxf(e.to_string()))?;

    let circles = drawing
        .entities()
        .filter_map(|entity| match &entity.specific {
            dxf::entities::EntityType::Circle(circle) => Some(Circle::new(
                Point2::new(circle.center.x, circle.center.y),
                circle.radius,
            )),
            _ => None,
        })
        .collect();

    Ok(circles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DrawingExporter;
    use crate::naming::DetailInfo;
    use crate::settings::DxfVersion;
    use holecad_core::pattern::ArraySpec;

    /// DXF 文本中浮点数的读写容差
    const FILE_TOLERANCE: f64 = 1e-6;

    fn assert_same_circles(actual: &[Circle], expected: &[Circle]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a.center.x - e.center.x).abs() < FILE_TOLERANCE, "{:?} vs {:?}", a, e);
            assert!((a.center.y - e.center.y).abs() < FILE_TOLERANCE, "{:?} vs {:?}", a, e);
            assert!((a.radius - e.radius).abs() < FILE_TOLERANCE, "{:?} vs {:?}", a, e);
        }
    }

    #[test]
    fn test_export_read_back() {
        let spec = ArraySpec::new(0, 100.0, 4, 10.0, 0.0).unwrap();
        let doc = DrawingExporter::build(200.0, &[spec], &DetailInfo::default()).unwrap();

        let file_path = std::env::temp_dir().join("holecad_test_read_back");
        let exporter = DrawingExporter::default();

        // 路径没有扩展名，写入时自动补全
        let written = exporter.write(&doc, &file_path).expect("Failed to export");
        assert_eq!(written, file_path.with_extension("dxf"));

        let circles = read_circles(&written).expect("Failed to read back");
        assert_eq!(circles.len(), 5);
        assert_same_circles(&circles, &doc.circles);

        std::fs::remove_file(&written).ok();
    }

    #[test]
    fn test_export_r12() {
        let spec = ArraySpec::new(0, 60.0, 6, 4.0, 15.0).unwrap();
        let doc = DrawingExporter::build(80.0, &[spec], &DetailInfo::new("R12", "")).unwrap();

        let settings = ExportSettings {
            dxf_version: DxfVersion::R12,
            ..Default::default()
        };
        let file_path = std::env::temp_dir().join(&doc.file_name);
        let written = DrawingExporter::new(settings)
            .write(&doc, &file_path)
            .expect("Failed to export");
        assert_eq!(written, file_path);

        let circles = read_circles(&written).expect("Failed to read back");
        assert_same_circles(&circles, &doc.circles);

        std::fs::remove_file(&written).ok();
    }

    #[test]
    fn test_sink_counts_entities() {
        let mut sink = DxfDrawingSink::new(&ExportSettings::default());
        assert_eq!(sink.entity_count(), 0);
        sink.add_circle(&Circle::at_origin(10.0));
        sink.add_circle(&Circle::new(Point2::new(5.0, 0.0), 1.0));
        assert_eq!(sink.entity_count(), 2);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let doc = DrawingExporter::build(50.0, &[], &DetailInfo::default()).unwrap();
        let file_path = std::env::temp_dir()
            .join("holecad_missing_dir")
            .join("nested")
            .join("part.dxf");

        let err = DrawingExporter::default().write(&doc, &file_path).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_read_missing_file() {
        let file_path = std::env::temp_dir().join("holecad_does_not_exist.dxf");
        assert!(matches!(read_circles(&file_path), Err(ExportError::Dxf(_))));
    }
}
