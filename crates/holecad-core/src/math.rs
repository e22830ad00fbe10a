//! 数学基础类型
//!
//! 基于 nalgebra 的二维点别名。

/// 二维点
pub type Point2 = nalgebra::Point2<f64>;

/// 浮点比较容差
pub const EPSILON: f64 = 1e-9;
