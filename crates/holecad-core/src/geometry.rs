//! 几何图元定义
//!
//! 孔阵零件只需要一种图元：圆。基圆和每个孔都是独立的圆。

use crate::math::Point2;
use serde::{Deserialize, Serialize};

/// 圆
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// 以原点为圆心的圆
    pub fn at_origin(radius: f64) -> Self {
        Self::new(Point2::origin(), radius)
    }

    /// 获取圆上指定角度的点
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// 圆上离原点最远的点到原点的距离
    pub fn reach_from_origin(&self) -> f64 {
        self.center.coords.norm() + self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;

    #[test]
    fn test_point_at_angle() {
        let circle = Circle::at_origin(50.0);
        let p = circle.point_at_angle(std::f64::consts::FRAC_PI_2);
        assert!(p.x.abs() < EPSILON);
        assert!((p.y - 50.0).abs() < EPSILON);
    }

    #[test]
    fn test_reach_from_origin() {
        let circle = Circle::new(Point2::new(3.0, 4.0), 2.0);
        assert!((circle.reach_from_origin() - 7.0).abs() < EPSILON);
    }
}
