//! 导出文档
//!
//! 每次导出都重新生成：基圆 + 所有孔（独立的圆图元）+ 默认文件名。
//! 坐标与几何计算结果完全一致，不做任何缩放或单位转换。

use crate::dxf_io::DxfDrawingSink;
use crate::error::ExportError;
use crate::naming::{ensure_dxf_extension, DetailInfo};
use crate::settings::ExportSettings;
use holecad_core::geometry::Circle;
use holecad_core::input::PatternForm;
use holecad_core::pattern::{ArraySpec, PatternGeometry};
use std::path::{Path, PathBuf};

/// 图纸输出目标：新建文档、添加圆、保存到路径
pub trait DrawingSink {
    /// 添加圆图元
    fn add_circle(&mut self, circle: &Circle);

    /// 保存到文件
    fn save(&self, path: &Path) -> Result<(), ExportError>;
}

/// 内存中的导出文档
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub geometry: PatternGeometry,
    /// 基圆在前，然后按阵列、孔序号排列
    pub circles: Vec<Circle>,
    pub detail_name: String,
    pub file_name: String,
}

impl ExportDocument {
    fn from_geometry(geometry: PatternGeometry, detail: &DetailInfo, main_diameter: f64) -> Self {
        let circles = std::iter::once(geometry.base_circle)
            .chain(geometry.holes().copied())
            .collect();

        Self {
            geometry,
            circles,
            detail_name: detail.detail_name(main_diameter),
            file_name: detail.file_name(main_diameter),
        }
    }

    /// 圆图元数量
    pub fn primitive_count(&self) -> usize {
        self.circles.len()
    }

    /// 按顺序写入所有图元
    pub fn write_to<S: DrawingSink + ?Sized>(&self, sink: &mut S) {
        for circle in &self.circles {
            sink.add_circle(circle);
        }
    }
}

/// DXF 图纸导出器
#[derive(Debug, Clone, Default)]
pub struct DrawingExporter {
    settings: ExportSettings,
}

impl DrawingExporter {
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    /// 由已解析的参数生成导出文档
    ///
    /// 参数无效时返回错误，不产生任何输出。
    pub fn build(
        main_diameter: f64,
        specs: &[ArraySpec],
        detail: &DetailInfo,
    ) -> Result<ExportDocument, ExportError> {
        let geometry = PatternGeometry::compute(main_diameter, specs)?;
        Ok(ExportDocument::from_geometry(geometry, detail, main_diameter))
    }

    /// 由界面表单生成导出文档（先校验基圆直径，再校验各阵列）
    pub fn build_from_form(
        form: &PatternForm,
        detail: &DetailInfo,
    ) -> Result<ExportDocument, ExportError> {
        let (main_diameter, specs) = form.parse()?;
        Self::build(main_diameter, &specs, detail)
    }

    /// 把文档写入用户选择的路径，返回实际写入的路径（已补全扩展名）
    pub fn write(&self, document: &ExportDocument, path: &Path) -> Result<PathBuf, ExportError> {
        let path = ensure_dxf_extension(path);

        let mut sink = DxfDrawingSink::new(&self.settings);
        document.write_to(&mut sink);
        sink.save(&path)?;

        tracing::info!(
            "Exported {} circles ({} holes) to {}",
            sink.entity_count(),
            document.geometry.hole_count(),
            path.display()
        );

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holecad_core::error::{ArrayField, PatternError};
    use holecad_core::input::ArrayFields;
    use holecad_core::math::{Point2, EPSILON};

    /// 只在内存中记录图元的输出目标
    #[derive(Default)]
    struct MemorySink {
        circles: Vec<Circle>,
    }

    impl DrawingSink for MemorySink {
        fn add_circle(&mut self, circle: &Circle) {
            self.circles.push(*circle);
        }

        fn save(&self, _path: &Path) -> Result<(), ExportError> {
            Ok(())
        }
    }

    #[test]
    fn test_base_circle_only() {
        let doc = DrawingExporter::build(200.0, &[], &DetailInfo::default()).unwrap();
        assert_eq!(doc.primitive_count(), 1);
        assert_eq!(doc.circles[0].center, Point2::origin());
        assert!((doc.circles[0].radius - 100.0).abs() < EPSILON);
        assert_eq!(doc.file_name, "D_200.00.dxf");
    }

    #[test]
    fn test_circles_follow_geometry_order() {
        let form = PatternForm::new("200")
            .with_array(ArrayFields::new("100", "4", "10", ""))
            .with_array(ArrayFields::new("160", "3", "8", "90"));
        let doc = DrawingExporter::build_from_form(&form, &DetailInfo::new("PN001", "")).unwrap();

        assert_eq!(doc.primitive_count(), 8);
        assert_eq!(doc.file_name, "PN001_D_200.00.dxf");
        assert_eq!(doc.detail_name, "PN001_D_200.00");

        let expected: Vec<Circle> = std::iter::once(doc.geometry.base_circle)
            .chain(doc.geometry.holes().copied())
            .collect();
        assert_eq!(doc.circles, expected);

        let mut sink = MemorySink::default();
        doc.write_to(&mut sink);
        assert_eq!(sink.circles, doc.circles);

        // 第二个阵列旋转 90°，第一个孔在正上方
        let first_of_second = doc.circles[5];
        assert!(first_of_second.center.x.abs() < EPSILON);
        assert!((first_of_second.center.y - 80.0).abs() < EPSILON);
        assert!((first_of_second.radius - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_invalid_main_diameter_text() {
        let form = PatternForm::new("twelve").with_array(ArrayFields::new("100", "4", "10", ""));
        let err = DrawingExporter::build_from_form(&form, &DetailInfo::default()).unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(
            err,
            ExportError::Pattern(PatternError::InvalidMainDiameter(_))
        ));
    }

    #[test]
    fn test_negative_main_diameter() {
        let err = DrawingExporter::build(-200.0, &[], &DetailInfo::default()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Pattern(PatternError::InvalidMainDiameter(_))
        ));
    }

    #[test]
    fn test_zero_holes_rejected_before_output() {
        let form = PatternForm::new("200")
            .with_array(ArrayFields::new("100", "4", "10", ""))
            .with_array(ArrayFields::new("100", "0", "10", ""));
        let err = DrawingExporter::build_from_form(&form, &DetailInfo::default()).unwrap_err();
        match err {
            ExportError::Pattern(PatternError::InvalidArrayParameter { index, field, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(field, ArrayField::HolesCount);
            }
            other => panic!("Expected InvalidArrayParameter, got {:?}", other),
        }
    }
}
