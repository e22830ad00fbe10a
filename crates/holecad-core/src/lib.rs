//! HoleCAD 核心几何引擎
//!
//! 把少量参数（直径、孔数、旋转角度）转换为具体的二维孔阵几何。
//!
//! # 架构设计
//!
//! - `ArraySpec`: 单个圆形孔阵的已校验参数
//! - `PatternGeometry`: 基圆 + 按阵列分组的孔 + 包围半径
//! - `PreviewScene`: 预览用的宽容版本
//! - `CadHost`: 第三方 CAD 宿主的桥接接口
//!
//! 引擎本身不做任何 I/O。
//!
//! # 示例
//!
//! ```rust
//! use holecad_core::prelude::*;
//!
//! let spec = ArraySpec::new(0, 100.0, 4, 10.0, 0.0).unwrap();
//! let geometry = PatternGeometry::compute(200.0, &[spec]).unwrap();
//!
//! assert_eq!(geometry.primitive_count(), 5);
//! ```

pub mod cad_bridge;
pub mod error;
pub mod geometry;
pub mod input;
pub mod math;
pub mod pattern;
pub mod preview;

pub use error::{ArrayField, CadError, PatternError};

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::cad_bridge::{push_part, CadHost, CadPartRequest, CadPushReport, UnavailableHost};
    pub use crate::error::{ArrayField, CadError, PatternError};
    pub use crate::geometry::Circle;
    pub use crate::input::{parse_main_diameter, ArrayFields, PatternForm};
    pub use crate::math::{Point2, EPSILON};
    pub use crate::pattern::{hole_angles, ArraySpec, HoleArray, PatternGeometry};
    pub use crate::preview::{PreviewScene, MAX_PREVIEW_HOLES, PREVIEW_MARGIN};
}
