//! 预览场景
//!
//! 预览在每次参数变化时重新计算，且对不完整的输入宽容：
//! 基圆直径无效时不画基圆，无效的阵列行直接跳过。
//! 每次计算都基于表单快照生成新的场景，不保留任何中间状态，
//! 以最后一次计算结果为准。
//!
//! 预览中的孔总数有上限，超出上限的阵列行不生成孔，只记录行号。

use crate::geometry::Circle;
use crate::input::PatternForm;
use crate::pattern::{bounding_extent, ArraySpec, HoleArray, PatternGeometry};

/// 预览视图边距（与图纸单位相同）
pub const PREVIEW_MARGIN: f64 = 10.0;

/// 一个预览场景最多生成的孔数
pub const MAX_PREVIEW_HOLES: u32 = 20_000;

/// 供预览界面绘制的场景
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewScene {
    pub base_circle: Option<Circle>,
    pub arrays: Vec<HoleArray>,
    /// 包围半径（不含边距）
    pub bounding_extent: f64,
    pub margin: f64,
    /// 因超出孔数上限而未绘制的表单行号
    pub oversized_rows: Vec<usize>,
}

impl PreviewScene {
    /// 从表单快照构建预览场景
    pub fn from_form(form: &PatternForm, margin: f64) -> Self {
        let (main_diameter, rows) = form.parse_lenient();
        let base_circle = main_diameter.map(|d| Circle::at_origin(d / 2.0));

        let mut budget = MAX_PREVIEW_HOLES;
        let mut specs: Vec<ArraySpec> = Vec::with_capacity(rows.len());
        let mut oversized_rows = Vec::new();
        for (index, spec) in rows {
            if spec.holes_count > budget {
                oversized_rows.push(index);
                continue;
            }
            budget -= spec.holes_count;
            specs.push(spec);
        }

        if !oversized_rows.is_empty() {
            tracing::debug!("Preview skipped oversized rows {:?}", oversized_rows);
        }

        Self {
            base_circle,
            bounding_extent: bounding_extent(base_circle.map(|c| c.radius), &specs),
            arrays: specs.into_iter().map(HoleArray::layout).collect(),
            margin,
            oversized_rows,
        }
    }

    /// 该行是否因超出孔数上限而未绘制
    pub fn is_oversized(&self, row: usize) -> bool {
        self.oversized_rows.contains(&row)
    }

    /// 从已校验的几何构建
    pub fn from_geometry(geometry: &PatternGeometry, margin: f64) -> Self {
        Self {
            base_circle: Some(geometry.base_circle),
            arrays: geometry.arrays.clone(),
            bounding_extent: geometry.bounding_extent,
            margin,
            oversized_rows: Vec::new(),
        }
    }

    /// 所有孔
    pub fn holes(&self) -> impl Iterator<Item = &Circle> + '_ {
        self.arrays.iter().flat_map(|array| array.holes.iter())
    }

    /// 加上边距后的视图半径
    pub fn framed_extent(&self) -> f64 {
        self.bounding_extent + self.margin
    }

    /// 把整个视图放进 `width × height` 像素区域所需的缩放（像素/图纸单位）
    pub fn fit_scale(&self, width: f64, height: f64) -> f64 {
        let side = width.min(height).max(1.0);
        let framed = self.framed_extent();
        if framed <= 0.0 {
            return 1.0;
        }
        side / (2.0 * framed)
    }

    pub fn is_empty(&self) -> bool {
        self.base_circle.is_none() && self.arrays.iter().all(|array| array.holes.is_empty())
    }
}
