//! HoleCAD 主应用程序入口
//! 使用 eframe 作为应用框架：左侧参数表单，中央实时预览，底部状态栏

mod config;

use std::path::{Path, PathBuf};

use anyhow::Result;
use eframe::egui;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use holecad_core::cad_bridge::{push_part, CadPartRequest, UnavailableHost};
use holecad_core::geometry::Circle;
use holecad_core::input::{parse_main_diameter, PatternForm};
use holecad_core::math::Point2;
use holecad_core::preview::{PreviewScene, MAX_PREVIEW_HOLES};
use holecad_file::{DetailInfo, DrawingExporter, ExportDocument};

use config::AppConfig;

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(30, 30, 46);
const AXIS_COLOR: egui::Color32 = egui::Color32::from_rgb(80, 80, 100);
const BASE_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 230, 230);
const HOLE_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 200, 255);

/// HoleCAD 应用程序
struct HoleCadApp {
    form: PatternForm,
    detail: DetailInfo,
    /// 推送到 CAD 时的拉伸厚度
    thickness: String,

    config: AppConfig,
    exporter: DrawingExporter,

    status_message: String,
    status_is_error: bool,
    mouse_world_pos: Option<Point2>,

    // 文件操作状态
    pending_file_op: Option<FileOperation>,
}

/// 文件操作类型
#[derive(Debug, Clone)]
enum FileOperation {
    Export {
        document: ExportDocument,
        path: PathBuf,
    },
}

impl HoleCadApp {
    fn new(config: AppConfig) -> Self {
        Self {
            form: PatternForm::default(),
            detail: DetailInfo::default(),
            thickness: String::new(),
            exporter: DrawingExporter::new(config.export.clone()),
            config,
            status_message: "输入基圆直径并添加孔阵".to_string(),
            status_is_error: false,
            mouse_world_pos: None,
            pending_file_op: None,
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = false;
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = true;
    }

    /// 世界坐标转屏幕坐标
    fn world_to_screen(point: Point2, rect: &egui::Rect, scale: f64) -> egui::Pos2 {
        let center = rect.center();
        let x = center.x + (point.x * scale) as f32;
        let y = center.y - (point.y * scale) as f32; // Y轴翻转
        egui::Pos2::new(x, y)
    }

    /// 屏幕坐标转世界坐标
    fn screen_to_world(pos: egui::Pos2, rect: &egui::Rect, scale: f64) -> Point2 {
        let center = rect.center();
        let x = (pos.x - center.x) as f64 / scale;
        let y = -((pos.y - center.y) as f64) / scale; // Y轴翻转
        Point2::new(x, y)
    }

    /// 绘制坐标轴（只画视图范围内的部分）
    fn draw_axes(painter: &egui::Painter, rect: &egui::Rect, scene: &PreviewScene, scale: f64) {
        let extent = scene.framed_extent();
        let stroke = egui::Stroke::new(1.0, AXIS_COLOR);
        painter.line_segment(
            [
                Self::world_to_screen(Point2::new(-extent, 0.0), rect, scale),
                Self::world_to_screen(Point2::new(extent, 0.0), rect, scale),
            ],
            stroke,
        );
        painter.line_segment(
            [
                Self::world_to_screen(Point2::new(0.0, -extent), rect, scale),
                Self::world_to_screen(Point2::new(0.0, extent), rect, scale),
            ],
            stroke,
        );
    }

    fn draw_circle(painter: &egui::Painter, rect: &egui::Rect, circle: &Circle, scale: f64, color: egui::Color32) {
        let center = Self::world_to_screen(circle.center, rect, scale);
        let radius = (circle.radius * scale) as f32;
        painter.circle_stroke(center, radius, egui::Stroke::new(1.5, color));
    }

    /// 绘制预览场景
    fn draw_scene(painter: &egui::Painter, rect: &egui::Rect, scene: &PreviewScene, scale: f64) {
        Self::draw_axes(painter, rect, scene, scale);

        if let Some(base) = &scene.base_circle {
            Self::draw_circle(painter, rect, base, scale, BASE_COLOR);
        }
        for hole in scene.holes() {
            Self::draw_circle(painter, rect, hole, scale, HOLE_COLOR);
        }
    }

    /// 生成 DXF：校验参数 -> 选择保存路径 -> 下一帧写入
    fn generate_dxf(&mut self) {
        let document = match DrawingExporter::build_from_form(&self.form, &self.detail) {
            Ok(document) => document,
            Err(e) => {
                self.set_error(format!("无法生成图纸: {}", e));
                tracing::error!("Failed to build drawing: {}", e);
                return;
            }
        };

        let mut dialog = rfd::FileDialog::new()
            .add_filter("DXF Files", &["dxf"])
            .set_title("保存 DXF")
            .set_file_name(&document.file_name);

        if let Some(dir) = &self.config.last_export_dir {
            dialog = dialog.set_directory(dir);
        }

        if let Some(path) = dialog.save_file() {
            self.pending_file_op = Some(FileOperation::Export { document, path });
        }
    }

    /// 处理文件操作
    fn process_file_operations(&mut self) {
        if let Some(op) = self.pending_file_op.take() {
            match op {
                FileOperation::Export { document, path } => {
                    match self.exporter.write(&document, &path) {
                        Ok(written) => {
                            self.set_status(format!(
                                "已保存: {} ({} 个圆)",
                                written.display(),
                                document.primitive_count()
                            ));
                            info!("Saved drawing: {}", written.display());

                            self.config.last_export_dir = written.parent().map(Path::to_path_buf);
                            self.config.save_default();
                        }
                        Err(e) => {
                            self.set_error(format!("保存失败: {}", e));
                            tracing::error!("Failed to save drawing: {}", e);
                        }
                    }
                }
            }
        }
    }

    /// 推送到 CAD 宿主；失败只影响状态栏提示，不影响 DXF 导出
    fn push_to_cad(&mut self) {
        let document = match DrawingExporter::build_from_form(&self.form, &self.detail) {
            Ok(document) => document,
            Err(e) => {
                self.set_error(format!("参数无效: {}", e));
                return;
            }
        };

        let thickness = match self.thickness.trim().parse::<f64>() {
            Ok(thickness) => thickness,
            Err(_) => {
                self.set_error(format!("厚度无效: '{}'", self.thickness.trim()));
                return;
            }
        };

        let request = match CadPartRequest::new(&document.geometry, thickness, &document.detail_name) {
            Ok(request) => request,
            Err(e) => {
                self.set_error(format!("无法推送: {}", e));
                return;
            }
        };

        let mut host = UnavailableHost::new("no CAD automation host is available on this system");
        match push_part(&mut host, &request) {
            Ok(report) => {
                self.set_status(format!(
                    "已推送到 {}: {} ({} 个圆)",
                    report.host, report.detail_name, report.circles_drawn
                ));
            }
            Err(e) if e.is_host_unavailable() => {
                self.set_error(format!("CAD 不可用: {}（DXF 导出不受影响）", e));
            }
            Err(e) => {
                self.set_error(format!("推送失败: {}", e));
            }
        }
    }

    /// 左侧参数面板
    fn show_parameters(&mut self, ui: &mut egui::Ui, scene: &PreviewScene) {
        ui.heading("零件参数");
        ui.separator();

        egui::Grid::new("detail_grid").num_columns(2).show(ui, |ui| {
            ui.label("基圆直径:");
            ui.add(egui::TextEdit::singleline(&mut self.form.main_diameter).hint_text("输入直径"));
            ui.end_row();

            ui.label("代号:");
            ui.add(egui::TextEdit::singleline(&mut self.detail.designation).hint_text("可选"));
            ui.end_row();

            ui.label("名称:");
            let default_name = parse_main_diameter(&self.form.main_diameter)
                .map(|d| self.detail.effective_name(d))
                .unwrap_or_else(|_| "D_<直径>".to_string());
            ui.add(egui::TextEdit::singleline(&mut self.detail.name).hint_text(default_name));
            ui.end_row();

            ui.label("厚度:");
            ui.add(egui::TextEdit::singleline(&mut self.thickness).hint_text("推送到 CAD 时使用"));
            ui.end_row();
        });

        ui.separator();
        ui.heading("孔阵");

        let mut remove_index = None;
        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - 90.0).max(120.0))
            .show(ui, |ui| {
                for (index, row) in self.form.arrays.iter_mut().enumerate() {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.strong(format!("阵列 {}", index + 1));
                            if ui.small_button("删除").clicked() {
                                remove_index = Some(index);
                            }
                        });

                        egui::Grid::new(("array_grid", index)).num_columns(2).show(ui, |ui| {
                            ui.label("阵列直径:");
                            ui.text_edit_singleline(&mut row.array_diameter);
                            ui.end_row();

                            ui.label("孔数:");
                            ui.text_edit_singleline(&mut row.holes_count);
                            ui.end_row();

                            ui.label("孔径:");
                            ui.text_edit_singleline(&mut row.hole_diameter);
                            ui.end_row();

                            ui.label("旋转角度:");
                            ui.add(egui::TextEdit::singleline(&mut row.rotation).hint_text("0"));
                            ui.end_row();
                        });

                        // 只在有输入后提示错误
                        let touched = !row.array_diameter.trim().is_empty()
                            || !row.holes_count.trim().is_empty()
                            || !row.hole_diameter.trim().is_empty()
                            || !row.rotation.trim().is_empty();
                        if touched {
                            if let Err(e) = row.parse(index) {
                                ui.colored_label(egui::Color32::LIGHT_RED, e.to_string());
                            } else if scene.is_oversized(index) {
                                ui.colored_label(
                                    egui::Color32::YELLOW,
                                    format!("孔数超过预览上限 {}，预览中省略（导出不受影响）", MAX_PREVIEW_HOLES),
                                );
                            }
                        }
                    });
                }
            });

        if let Some(index) = remove_index {
            self.form.remove_array(index);
        }

        if ui.button("➕ 添加阵列").clicked() {
            self.form.add_array();
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("💾 生成 DXF").clicked() {
                self.generate_dxf();
            }
            if ui.button("🔧 推送到 CAD").clicked() {
                self.push_to_cad();
            }
        });
    }
}

impl eframe::App for HoleCadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 处理文件操作
        self.process_file_operations();

        // 每帧都基于当前表单快照重新计算预览
        let scene = PreviewScene::from_form(&self.form, self.config.preview_margin);

        // 更新窗口标题
        let title = match parse_main_diameter(&self.form.main_diameter) {
            Ok(d) => format!("HoleCAD - {}", self.detail.detail_name(d)),
            Err(_) => "HoleCAD".to_string(),
        };
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));

        // 深色主题
        ctx.set_visuals(egui::Visuals::dark());

        // ===== 状态栏 =====
        let hole_count = scene.holes().count();
        let extent = scene.bounding_extent;
        let mouse_world = self.mouse_world_pos;
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.status_is_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, &self.status_message);
                } else {
                    ui.label(&self.status_message);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(pos) = mouse_world {
                        ui.label(format!("X:{:>8.2} Y:{:>8.2}", pos.x, pos.y));
                        ui.separator();
                    }
                    ui.label(format!("包围半径: {:.2}", extent));
                    ui.separator();
                    ui.label(format!("孔: {}", hole_count));
                });
            });
        });

        // ===== 左侧面板 - 参数 =====
        egui::SidePanel::left("parameters")
            .default_width(300.0)
            .show(ctx, |ui| self.show_parameters(ui, &scene));

        // ===== 中央预览区域 =====
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(BACKGROUND))
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;
                let scale = scene.fit_scale(rect.width() as f64, rect.height() as f64);

                self.mouse_world_pos = response
                    .hover_pos()
                    .map(|pos| Self::screen_to_world(pos, &rect, scale));

                Self::draw_scene(&painter, &rect, &scene, scale);

                if scene.is_empty() {
                    painter.text(
                        rect.center() + egui::vec2(0.0, 24.0),
                        egui::Align2::CENTER_TOP,
                        "输入基圆直径后显示预览",
                        egui::FontId::proportional(16.0),
                        AXIS_COLOR,
                    );
                }
            });
    }
}

/// 设置中文字体支持
fn setup_chinese_fonts(ctx: &egui::Context) {
    let font_paths = [
        // macOS
        "/System/Library/Fonts/PingFang.ttc",
        "/System/Library/Fonts/STHeiti Light.ttc",
        // Linux
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
        // Windows
        "C:\\Windows\\Fonts\\msyh.ttc",
        "C:\\Windows\\Fonts\\simsun.ttc",
    ];

    let Some((path, font_data)) = font_paths
        .iter()
        .find_map(|path| std::fs::read(path).ok().map(|data| (*path, data)))
    else {
        tracing::warn!("No Chinese font found, labels may not render");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        "chinese".to_owned(),
        std::sync::Arc::new(egui::FontData::from_owned(font_data)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().insert(0, "chinese".to_owned());
    }
    ctx.set_fonts(fonts);

    info!("Loaded Chinese font from: {}", path);
}

fn main() -> Result<()> {
    // 初始化日志
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(Level::INFO).finish()
    )?;

    info!("Starting HoleCAD...");

    let config = AppConfig::load_or_default();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title("HoleCAD"),
        ..Default::default()
    };

    eframe::run_native(
        "HoleCAD",
        native_options,
        Box::new(|cc| {
            // 加载中文字体
            setup_chinese_fonts(&cc.egui_ctx);
            Ok(Box::new(HoleCadApp::new(config)))
        }),
    ).map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
