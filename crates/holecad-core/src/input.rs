//! 参数输入解析
//!
//! 界面上的输入框都是文本，这里负责把文本转换为带类型的参数：
//! - 基圆直径: `200`、`12.5`
//! - 阵列直径 / 孔径: 非负实数
//! - 孔数: 正整数
//! - 旋转角度: `[-360, 360]` 内的实数，留空表示 0
//!
//! 几何引擎只接收解析后的 [`ArraySpec`]，从不接触原始文本。

use crate::error::{ArrayField, PatternError};
use crate::pattern::{validate_main_diameter, ArraySpec};
use serde::{Deserialize, Serialize};

/// 解析基圆直径
pub fn parse_main_diameter(input: &str) -> Result<f64, PatternError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PatternError::InvalidMainDiameter("empty input".to_string()));
    }

    let value = input
        .parse::<f64>()
        .map_err(|_| PatternError::InvalidMainDiameter(format!("cannot parse '{}'", input)))?;

    validate_main_diameter(value)?;
    Ok(value)
}

/// 一行孔阵参数的原始文本
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayFields {
    pub array_diameter: String,
    pub holes_count: String,
    pub hole_diameter: String,
    pub rotation: String,
}

impl ArrayFields {
    pub fn new(
        array_diameter: impl Into<String>,
        holes_count: impl Into<String>,
        hole_diameter: impl Into<String>,
        rotation: impl Into<String>,
    ) -> Self {
        Self {
            array_diameter: array_diameter.into(),
            holes_count: holes_count.into(),
            hole_diameter: hole_diameter.into(),
            rotation: rotation.into(),
        }
    }

    /// 解析为孔阵参数
    ///
    /// `index` 是该行在列表中的位置，用于错误报告。
    pub fn parse(&self, index: usize) -> Result<ArraySpec, PatternError> {
        let array_diameter = parse_real(index, ArrayField::ArrayDiameter, &self.array_diameter)?;
        let holes_count = parse_count(index, &self.holes_count)?;
        let hole_diameter = parse_real(index, ArrayField::HoleDiameter, &self.hole_diameter)?;

        // 旋转角度可以留空
        let rotation_degrees = if self.rotation.trim().is_empty() {
            0.0
        } else {
            parse_real(index, ArrayField::Rotation, &self.rotation)?
        };

        ArraySpec::new(index, array_diameter, holes_count, hole_diameter, rotation_degrees)
    }
}

fn parse_real(index: usize, field: ArrayField, input: &str) -> Result<f64, PatternError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PatternError::array(index, field, "is empty"));
    }
    input
        .parse::<f64>()
        .map_err(|_| PatternError::array(index, field, format!("is not a number: '{}'", input)))
}

fn parse_count(index: usize, input: &str) -> Result<u32, PatternError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PatternError::array(index, ArrayField::HolesCount, "is empty"));
    }
    let count = input.parse::<u32>().map_err(|_| {
        PatternError::array(
            index,
            ArrayField::HolesCount,
            format!("is not a positive integer: '{}'", input),
        )
    })?;
    if count == 0 {
        return Err(PatternError::array(
            index,
            ArrayField::HolesCount,
            "must be a positive integer, got 0",
        ));
    }
    Ok(count)
}

/// 整个零件的参数表单（基圆直径 + 有序的阵列行）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternForm {
    pub main_diameter: String,
    pub arrays: Vec<ArrayFields>,
}

impl PatternForm {
    pub fn new(main_diameter: impl Into<String>) -> Self {
        Self {
            main_diameter: main_diameter.into(),
            arrays: Vec::new(),
        }
    }

    pub fn with_array(mut self, fields: ArrayFields) -> Self {
        self.arrays.push(fields);
        self
    }

    /// 添加一行空白阵列
    pub fn add_array(&mut self) {
        self.arrays.push(ArrayFields::default());
    }

    /// 删除指定行，越界时忽略
    pub fn remove_array(&mut self, index: usize) -> Option<ArrayFields> {
        (index < self.arrays.len()).then(|| self.arrays.remove(index))
    }

    /// 严格解析：先基圆直径，再按顺序解析各行，遇到第一个错误即返回
    pub fn parse(&self) -> Result<(f64, Vec<ArraySpec>), PatternError> {
        let main_diameter = parse_main_diameter(&self.main_diameter)?;
        let specs = self
            .arrays
            .iter()
            .enumerate()
            .map(|(index, fields)| fields.parse(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((main_diameter, specs))
    }

    /// 宽松解析（用于预览）：无效的基圆直径返回 `None`，无效的行被跳过
    ///
    /// 每个有效阵列附带它在表单中的行号。
    pub fn parse_lenient(&self) -> (Option<f64>, Vec<(usize, ArraySpec)>) {
        let main_diameter = parse_main_diameter(&self.main_diameter).ok();
        let specs = self
            .arrays
            .iter()
            .enumerate()
            .filter_map(|(index, fields)| fields.parse(index).ok().map(|spec| (index, spec)))
            .collect();
        (main_diameter, specs)
    }
}
