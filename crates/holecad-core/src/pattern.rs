//! 圆形孔阵几何计算
//!
//! 输入：基圆直径 + 有序的孔阵参数列表
//! 输出：基圆、按阵列分组的孔（圆心/半径）、包围半径
//!
//! 第 `j` 个孔（`0 <= j < n`）的角度为 `2π·j/n + rotation`，
//! 位于半径 `array_diameter / 2` 的圆周上。
//!
//! 计算是纯函数：相同输入得到完全相同的输出（包括孔的顺序），
//! 这保证了导出的图纸可以逐次比对。

use crate::error::{ArrayField, PatternError};
use crate::geometry::Circle;
use crate::math::Point2;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// 旋转角度允许范围（度），超出范围不做归一化，直接拒绝
pub const ROTATION_LIMIT_DEGREES: f64 = 360.0;

/// 单个圆形孔阵参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArraySpec {
    /// 孔心所在圆的直径
    pub array_diameter: f64,
    /// 孔数（>= 1）
    pub holes_count: u32,
    /// 孔径
    pub hole_diameter: f64,
    /// 第一个孔的角度偏移（度）
    pub rotation_degrees: f64,
}

impl ArraySpec {
    /// 创建并校验孔阵参数
    ///
    /// `index` 仅用于错误报告，表示该阵列在列表中的位置。
    pub fn new(
        index: usize,
        array_diameter: f64,
        holes_count: u32,
        hole_diameter: f64,
        rotation_degrees: f64,
    ) -> Result<Self, PatternError> {
        let spec = Self {
            array_diameter,
            holes_count,
            hole_diameter,
            rotation_degrees,
        };
        spec.validate(index)?;
        Ok(spec)
    }

    /// 校验字段取值
    pub fn validate(&self, index: usize) -> Result<(), PatternError> {
        check_length(index, ArrayField::ArrayDiameter, self.array_diameter)?;

        if self.holes_count < 1 {
            return Err(PatternError::array(
                index,
                ArrayField::HolesCount,
                "must be a positive integer",
            ));
        }

        check_length(index, ArrayField::HoleDiameter, self.hole_diameter)?;

        if !self.rotation_degrees.is_finite()
            || self.rotation_degrees.abs() > ROTATION_LIMIT_DEGREES
        {
            return Err(PatternError::array(
                index,
                ArrayField::Rotation,
                format!(
                    "must be within [-{0}, {0}] degrees, got {1}",
                    ROTATION_LIMIT_DEGREES, self.rotation_degrees
                ),
            ));
        }

        Ok(())
    }

    /// 孔心所在圆的半径
    pub fn array_radius(&self) -> f64 {
        self.array_diameter / 2.0
    }

    /// 单孔半径
    pub fn hole_radius(&self) -> f64 {
        self.hole_diameter / 2.0
    }

    /// 旋转角度（弧度）
    pub fn rotation_radians(&self) -> f64 {
        self.rotation_degrees.to_radians()
    }

    /// 该阵列对包围半径的贡献：阵列半径 + 孔径/2
    pub fn extent(&self) -> f64 {
        self.array_radius() + self.hole_diameter / 2.0
    }
}

fn check_length(index: usize, field: ArrayField, value: f64) -> Result<(), PatternError> {
    if !value.is_finite() {
        return Err(PatternError::array(index, field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(PatternError::array(
            index,
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(())
}

/// 校验基圆直径
pub fn validate_main_diameter(main_diameter: f64) -> Result<(), PatternError> {
    if !main_diameter.is_finite() {
        return Err(PatternError::InvalidMainDiameter(format!(
            "{} is not a finite number",
            main_diameter
        )));
    }
    if main_diameter < 0.0 {
        return Err(PatternError::InvalidMainDiameter(format!(
            "{} is negative",
            main_diameter
        )));
    }
    Ok(())
}

/// 计算阵列中每个孔的角度（弧度，未归一化）
///
/// 调用方需保证 `holes_count >= 1`。
pub fn hole_angles(spec: &ArraySpec) -> impl Iterator<Item = f64> + '_ {
    let n = spec.holes_count;
    let rotation = spec.rotation_radians();
    (0..n).map(move |j| TAU * j as f64 / n as f64 + rotation)
}

/// 一个阵列生成的所有孔
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleArray {
    pub spec: ArraySpec,
    /// 按孔序号排列
    pub holes: Vec<Circle>,
}

impl HoleArray {
    /// 按参数布置孔（参数须已校验）
    pub fn layout(spec: ArraySpec) -> Self {
        let pitch_circle = Circle::at_origin(spec.array_radius());
        let hole_radius = spec.hole_radius();
        let holes = hole_angles(&spec)
            .map(|angle| Circle::new(pitch_circle.point_at_angle(angle), hole_radius))
            .collect();
        Self { spec, holes }
    }
}

/// 孔阵几何计算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternGeometry {
    pub base_circle: Circle,
    /// 按输入顺序分组
    pub arrays: Vec<HoleArray>,
    /// 包围半径（不含边距）
    pub bounding_extent: f64,
}

impl PatternGeometry {
    /// 由基圆直径和孔阵列表计算几何
    ///
    /// 所有参数在生成任何几何之前校验完毕：
    /// 先校验基圆直径，再按列表顺序校验每个阵列，遇到第一个错误即返回。
    pub fn compute(main_diameter: f64, specs: &[ArraySpec]) -> Result<Self, PatternError> {
        validate_main_diameter(main_diameter)?;
        for (index, spec) in specs.iter().enumerate() {
            spec.validate(index)?;
        }

        let base_circle = Circle::at_origin(main_diameter / 2.0);
        let bounding_extent = bounding_extent(Some(base_circle.radius), specs);
        let arrays: Vec<HoleArray> = specs.iter().copied().map(HoleArray::layout).collect();

        let geometry = Self {
            base_circle,
            arrays,
            bounding_extent,
        };

        tracing::debug!(
            "Computed pattern: base radius {}, {} arrays, {} holes, extent {}",
            geometry.base_circle.radius,
            geometry.arrays.len(),
            geometry.hole_count(),
            geometry.bounding_extent
        );

        Ok(geometry)
    }

    /// 所有孔，按阵列顺序、孔序号顺序
    pub fn holes(&self) -> impl Iterator<Item = &Circle> + '_ {
        self.arrays.iter().flat_map(|array| array.holes.iter())
    }

    /// 孔总数
    pub fn hole_count(&self) -> usize {
        self.arrays.iter().map(|array| array.holes.len()).sum()
    }

    /// 图元总数（基圆 + 所有孔）
    pub fn primitive_count(&self) -> usize {
        1 + self.hole_count()
    }
}

/// 包围半径：基圆半径与每个阵列 `阵列半径 + 孔径/2` 的最大值
///
/// 这是沿用的估算公式，只按阵列参数计算，不检查孔的实际位置。
/// `base_radius` 为 `None` 时（例如预览中基圆直径无效）从 0 开始。
pub fn bounding_extent(base_radius: Option<f64>, specs: &[ArraySpec]) -> f64 {
    specs
        .iter()
        .map(ArraySpec::extent)
        .fold(base_radius.unwrap_or(0.0), f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;

    fn spec(array_diameter: f64, holes_count: u32, hole_diameter: f64, rotation: f64) -> ArraySpec {
        ArraySpec {
            array_diameter,
            holes_count,
            hole_diameter,
            rotation_degrees: rotation,
        }
    }

    #[test]
    fn test_four_holes_on_cardinal_points() {
        let geometry = PatternGeometry::compute(200.0, &[spec(100.0, 4, 10.0, 0.0)]).unwrap();

        assert!((geometry.base_circle.radius - 100.0).abs() < EPSILON);
        assert_eq!(geometry.primitive_count(), 5);

        let expected = [(50.0, 0.0), (0.0, 50.0), (-50.0, 0.0), (0.0, -50.0)];
        let holes: Vec<&Circle> = geometry.holes().collect();
        assert_eq!(holes.len(), expected.len());
        for (hole, (x, y)) in holes.iter().zip(expected) {
            assert!((hole.center.x - x).abs() < EPSILON, "x: {} vs {}", hole.center.x, x);
            assert!((hole.center.y - y).abs() < EPSILON, "y: {} vs {}", hole.center.y, y);
            assert!((hole.radius - 5.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_no_arrays_only_base_circle() {
        let geometry = PatternGeometry::compute(200.0, &[]).unwrap();
        assert_eq!(geometry.hole_count(), 0);
        assert_eq!(geometry.primitive_count(), 1);
        assert_eq!(geometry.base_circle.center, Point2::origin());
        assert!((geometry.bounding_extent - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_holes_rejected() {
        let err = PatternGeometry::compute(200.0, &[spec(100.0, 0, 10.0, 0.0)]).unwrap_err();
        assert!(matches!(
            err,
            PatternError::InvalidArrayParameter {
                index: 0,
                field: ArrayField::HolesCount,
                ..
            }
        ));
    }

    #[test]
    fn test_negative_main_diameter_rejected() {
        let err = PatternGeometry::compute(-1.0, &[]).unwrap_err();
        assert!(matches!(err, PatternError::InvalidMainDiameter(_)));

        let err = PatternGeometry::compute(f64::NAN, &[]).unwrap_err();
        assert!(matches!(err, PatternError::InvalidMainDiameter(_)));
    }

    #[test]
    fn test_main_diameter_checked_before_arrays() {
        let err = PatternGeometry::compute(-5.0, &[spec(100.0, 0, 10.0, 0.0)]).unwrap_err();
        assert!(matches!(err, PatternError::InvalidMainDiameter(_)));
    }

    #[test]
    fn test_reports_offending_array_index() {
        let specs = [spec(100.0, 4, 10.0, 0.0), spec(60.0, 6, -2.0, 0.0)];
        let err = PatternGeometry::compute(200.0, &specs).unwrap_err();
        assert!(matches!(
            err,
            PatternError::InvalidArrayParameter {
                index: 1,
                field: ArrayField::HoleDiameter,
                ..
            }
        ));
    }

    #[test]
    fn test_rotation_out_of_range_rejected() {
        assert!(ArraySpec::new(0, 100.0, 4, 10.0, 360.0).is_ok());
        assert!(ArraySpec::new(0, 100.0, 4, 10.0, -360.0).is_ok());
        let err = ArraySpec::new(2, 100.0, 4, 10.0, 361.0).unwrap_err();
        assert!(matches!(
            err,
            PatternError::InvalidArrayParameter {
                index: 2,
                field: ArrayField::Rotation,
                ..
            }
        ));
    }

    #[test]
    fn test_angles_evenly_spaced_and_distinct() {
        for n in [1u32, 2, 3, 7, 12, 360] {
            for rotation in [-360.0, -45.0, 0.0, 15.5, 360.0] {
                let s = spec(80.0, n, 4.0, rotation);
                let angles: Vec<f64> = hole_angles(&s).collect();
                assert_eq!(angles.len(), n as usize);
                assert!((angles[0] - f64::to_radians(rotation)).abs() < EPSILON);

                let step = TAU / n as f64;
                for pair in angles.windows(2) {
                    assert!((pair[1] - pair[0] - step).abs() < EPSILON);
                }

                let mut normalized: Vec<f64> = angles.iter().map(|a| a.rem_euclid(TAU)).collect();
                normalized.sort_by(|a, b| a.total_cmp(b));
                for pair in normalized.windows(2) {
                    assert!(pair[1] - pair[0] > EPSILON);
                }
            }
        }
    }

    #[test]
    fn test_rotation_moves_first_hole() {
        let geometry = PatternGeometry::compute(100.0, &[spec(60.0, 3, 4.0, 90.0)]).unwrap();
        let first = geometry.holes().next().unwrap();
        assert!(first.center.x.abs() < EPSILON);
        assert!((first.center.y - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_compute_is_deterministic_and_ordered() {
        let specs = [spec(100.0, 4, 10.0, 0.0), spec(150.0, 7, 6.0, 12.5), spec(40.0, 1, 3.0, -30.0)];
        let a = PatternGeometry::compute(200.0, &specs).unwrap();
        let b = PatternGeometry::compute(200.0, &specs).unwrap();
        assert_eq!(a, b);

        let counts: Vec<usize> = a.arrays.iter().map(|array| array.holes.len()).collect();
        assert_eq!(counts, vec![4, 7, 1]);
        for (array, s) in a.arrays.iter().zip(specs.iter()) {
            assert_eq!(&array.spec, s);
        }
    }

    #[test]
    fn test_bounding_extent_covers_all_geometry() {
        let specs = [spec(100.0, 4, 10.0, 0.0), spec(250.0, 9, 20.0, 7.0)];
        let geometry = PatternGeometry::compute(200.0, &specs).unwrap();

        assert!((geometry.bounding_extent - 135.0).abs() < EPSILON);
        assert!(geometry.bounding_extent >= geometry.base_circle.radius);
        for hole in geometry.holes() {
            assert!(geometry.bounding_extent + EPSILON >= hole.reach_from_origin());
        }
    }

    #[test]
    fn test_bounding_extent_monotonic() {
        let mut previous = 0.0;
        for step in 0..20 {
            let specs = [spec(step as f64 * 15.0, 5, 8.0, 0.0)];
            let extent = PatternGeometry::compute(120.0, &specs).unwrap().bounding_extent;
            assert!(extent >= previous);
            previous = extent;
        }

        let mut previous = 0.0;
        for step in 0..20 {
            let specs = [spec(100.0, 5, step as f64 * 3.0, 0.0)];
            let extent = PatternGeometry::compute(120.0, &specs).unwrap().bounding_extent;
            assert!(extent >= previous);
            previous = extent;
        }
    }
}
