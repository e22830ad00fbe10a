//! CAD 宿主桥接
//!
//! 把计算好的孔阵推送到第三方 CAD 程序：新建零件、在草图平面上画圆、
//! 按厚度拉伸、设置名称/标记。
//!
//! 宿主程序可能未安装，或者自动化接口与预期不同，因此这里只定义接口，
//! 所有失败都以 [`CadError`] 返回，由调用方单独提示，不影响 DXF 导出。

use crate::error::CadError;
use crate::geometry::Circle;
use crate::pattern::PatternGeometry;

/// CAD 宿主自动化接口
pub trait CadHost {
    /// 宿主名称（用于日志和提示）
    fn name(&self) -> &str;

    /// 连接宿主程序
    fn connect(&mut self) -> Result<(), CadError>;

    /// 新建零件文档
    fn create_part(&mut self, name: &str) -> Result<(), CadError>;

    /// 在草图平面上画圆
    fn draw_circle(&mut self, circle: &Circle) -> Result<(), CadError>;

    /// 按厚度拉伸草图
    fn extrude(&mut self, thickness: f64) -> Result<(), CadError>;

    /// 设置零件名称/标记属性
    fn set_marking(&mut self, marking: &str) -> Result<(), CadError>;
}

/// 推送请求
#[derive(Debug, Clone)]
pub struct CadPartRequest {
    pub base_circle: Circle,
    /// 已布置好的孔
    pub holes: Vec<Circle>,
    pub thickness: f64,
    pub detail_name: String,
}

impl CadPartRequest {
    pub fn new(
        geometry: &PatternGeometry,
        thickness: f64,
        detail_name: impl Into<String>,
    ) -> Result<Self, CadError> {
        if !thickness.is_finite() || thickness <= 0.0 {
            return Err(CadError::InvalidThickness(thickness));
        }

        let detail_name = detail_name.into();
        if detail_name.trim().is_empty() {
            return Err(CadError::InvalidPart("detail name is empty".to_string()));
        }

        Ok(Self {
            base_circle: geometry.base_circle,
            holes: geometry.holes().copied().collect(),
            thickness,
            detail_name,
        })
    }
}

/// 推送结果
#[derive(Debug, Clone, PartialEq)]
pub struct CadPushReport {
    pub host: String,
    pub circles_drawn: usize,
    pub detail_name: String,
}

/// 把零件推送到 CAD 宿主
///
/// 任一步骤失败立即返回，宿主侧可能留下未完成的零件文档。
pub fn push_part(host: &mut dyn CadHost, request: &CadPartRequest) -> Result<CadPushReport, CadError> {
    let result = drive_host(host, request);

    match &result {
        Ok(report) => tracing::info!(
            "Pushed part '{}' to {} ({} circles)",
            report.detail_name,
            report.host,
            report.circles_drawn
        ),
        Err(e) => tracing::warn!("CAD push to {} failed: {}", host.name(), e),
    }

    result
}

fn drive_host(host: &mut dyn CadHost, request: &CadPartRequest) -> Result<CadPushReport, CadError> {
    host.connect()?;
    host.create_part(&request.detail_name)?;

    host.draw_circle(&request.base_circle)?;
    for hole in &request.holes {
        host.draw_circle(hole)?;
    }

    host.extrude(request.thickness)?;
    host.set_marking(&request.detail_name)?;

    Ok(CadPushReport {
        host: host.name().to_string(),
        circles_drawn: 1 + request.holes.len(),
        detail_name: request.detail_name.clone(),
    })
}

/// 没有可用宿主时的占位实现，所有操作都返回 [`CadError::Unavailable`]
#[derive(Debug, Clone, Default)]
pub struct UnavailableHost {
    reason: Option<String>,
}

impl UnavailableHost {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    fn error(&self) -> CadError {
        CadError::Unavailable(
            self.reason
                .clone()
                .unwrap_or_else(|| "no CAD host is configured".to_string()),
        )
    }
}

impl CadHost for UnavailableHost {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn connect(&mut self) -> Result<(), CadError> {
        Err(self.error())
    }

    fn create_part(&mut self, _name: &str) -> Result<(), CadError> {
        Err(self.error())
    }

    fn draw_circle(&mut self, _circle: &Circle) -> Result<(), CadError> {
        Err(self.error())
    }

    fn extrude(&mut self, _thickness: f64) -> Result<(), CadError> {
        Err(self.error())
    }

    fn set_marking(&mut self, _marking: &str) -> Result<(), CadError> {
        Err(self.error())
    }
}
