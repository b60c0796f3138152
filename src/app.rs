use std::path::Path;
use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::data::log::LogFile;
use crate::data::name_table::NameTable;
use crate::error::Result;
use crate::plot::export;
use crate::plot::figure::{FileComparison, Figure};
use crate::processing::statistics::SeriesStats;
use crate::processing::validate::{self, Warning};
use crate::state::theme::Theme;
use crate::ui::figure_panel;
use crate::ui::side_panel::{self, SideAction};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Async file open in progress.
struct PendingLoad {
    result: Arc<Mutex<Option<Result<LogFile>>>>,
}

/// The main ThermoLog application.
pub struct ThermoLogApp {
    name_table: Arc<NameTable>,
    /// Loaded logs in open order; `selected` indexes into this.
    logs: Vec<Arc<LogFile>>,
    selected: usize,
    /// The plot request line, e.g. `(Ts Tr) pin:MPa` or `all`.
    request: String,
    figure: Option<Figure>,
    /// Check findings for the selected log.
    warnings: Vec<Warning>,
    /// One statistics block per plotted series.
    stats_reports: Vec<String>,
    compare_mode: bool,
    /// Identifier compared across files when compare mode is on.
    compare_identifier: String,
    comparison: Option<FileComparison>,
    /// Show the figure as a data table instead of plots.
    show_table: bool,
    /// Drop pan/zoom on the next draw, set after a rebuild.
    reset_plot_view: bool,
    theme: Theme,
    /// An error message to display in the footer until dismissed.
    error_message: Option<String>,
    /// Whether to show the About window (hidden menu).
    show_about: bool,
    pending_loads: Vec<PendingLoad>,
    /// A figure screenshot was requested and its event is awaited.
    screenshot_pending: bool,
    /// Where the figure was drawn last frame, for screenshot cropping.
    figure_rect: Option<egui::Rect>,
}

impl ThermoLogApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self> {
        let name_table = Arc::new(NameTable::default_table()?);

        // --- Global UI style ---
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style
            .text_styles
            .insert(egui::TextStyle::Body, egui::FontId::proportional(14.5));
        style
            .text_styles
            .insert(egui::TextStyle::Button, egui::FontId::proportional(14.0));
        style
            .text_styles
            .insert(egui::TextStyle::Monospace, egui::FontId::monospace(13.0));
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12);
        ctx.set_style(style);
        ctx.set_visuals(Theme::default().visuals());

        Ok(Self {
            name_table,
            logs: Vec::new(),
            selected: 0,
            request: String::new(),
            figure: None,
            warnings: Vec::new(),
            stats_reports: Vec::new(),
            compare_mode: false,
            compare_identifier: String::new(),
            comparison: None,
            show_table: false,
            reset_plot_view: false,
            theme: Theme::default(),
            error_message: None,
            show_about: false,
            pending_loads: Vec::new(),
            screenshot_pending: false,
            figure_rect: None,
        })
    }

    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Log Files", &["csv", "xls", "xlsx"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_file(&path);
        }
    }

    /// Parse a log file on a worker thread so the UI stays responsive.
    fn load_file(&mut self, path: &Path) {
        let path_buf = path.to_path_buf();
        let name_table = Arc::clone(&self.name_table);
        let result: Arc<Mutex<Option<Result<LogFile>>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&result);

        std::thread::spawn(move || {
            let loaded = LogFile::open(&path_buf, name_table);
            *slot.lock().unwrap() = Some(loaded);
        });

        self.pending_loads.push(PendingLoad { result });
    }

    fn select_file(&mut self, index: usize) {
        if index < self.logs.len() {
            self.selected = index;
            self.refresh();
        }
    }

    fn remove_file(&mut self, index: usize) {
        if index < self.logs.len() {
            self.logs.remove(index);
            if self.selected >= self.logs.len() {
                self.selected = self.logs.len().saturating_sub(1);
            }
            self.refresh();
        }
    }

    /// Recompute everything derived from the loaded logs: the checks
    /// of the selected log, the figure for the current request and, in
    /// compare mode, the comparison grid.
    fn refresh(&mut self) {
        match self.logs.get(self.selected) {
            Some(log) => self.warnings = validate::validate(log),
            None => {
                self.warnings.clear();
                self.figure = None;
                self.comparison = None;
                self.stats_reports.clear();
                return;
            }
        }
        if !self.request.trim().is_empty() {
            self.build_figure();
        }
        if self.compare_mode && !self.compare_identifier.trim().is_empty() {
            self.build_comparison();
        }
    }

    fn build_figure(&mut self) {
        let Some(log) = self.logs.get(self.selected) else {
            return;
        };
        match Figure::build(log, &self.request) {
            Ok(figure) => {
                self.stats_reports = stats_reports(&figure);
                self.figure = Some(figure);
                self.reset_plot_view = true;
                self.error_message = None;
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
            }
        }
    }

    fn build_comparison(&mut self) {
        if self.logs.is_empty() {
            return;
        }
        let logs: Vec<&LogFile> = self.logs.iter().map(|l| l.as_ref()).collect();
        match FileComparison::build(&logs, &self.compare_identifier) {
            Ok(comparison) => {
                self.comparison = Some(comparison);
                self.reset_plot_view = true;
                self.error_message = None;
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
            }
        }
    }

    /// Export the plotted series to a CSV file via a save dialog.
    fn export_csv(&mut self) {
        let Some(figure) = &self.figure else {
            self.error_message = Some("Build a plot before exporting.".to_string());
            return;
        };
        let stem = self
            .logs
            .get(self.selected)
            .map(|l| l.stem())
            .unwrap_or("figure");
        let filename = format!("{stem}_plot.csv");
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(filename)
            .add_filter("CSV Files", &["csv"])
            .save_file()
        {
            match export::write_figure_csv(figure, &path) {
                Ok(()) => tracing::info!("Exported CSV to {:?}", path),
                Err(e) => self.error_message = Some(format!("Failed to write CSV: {e}")),
            }
        }
    }
}

/// One statistics block per plotted series, in subplot order.
fn stats_reports(figure: &Figure) -> Vec<String> {
    figure
        .subplots
        .iter()
        .flat_map(|subplot| subplot.series.iter())
        .filter_map(|series| {
            SeriesStats::for_quantity(series)
                .map(|stats| stats.report(&series.label, &series.unit.to_string()))
        })
        .collect()
}

impl eframe::App for ThermoLogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.theme.visuals());

        // ------------------------------------------------------------------
        // 0. Handle screenshot events from the previous frame
        // ------------------------------------------------------------------
        if self.screenshot_pending {
            let screenshot_image: Option<Arc<egui::ColorImage>> = ctx.input(|i| {
                i.raw.events.iter().find_map(|event| match event {
                    egui::Event::Screenshot { image, .. } => Some(image.clone()),
                    _ => None,
                })
            });

            if let Some(color_image) = screenshot_image {
                self.screenshot_pending = false;

                // Crop to the figure area drawn last frame.
                let ppp = ctx.pixels_per_point();
                let full_w = color_image.width();
                let full_h = color_image.height();
                let (rgba, width, height) = if let Some(rect) = self.figure_rect {
                    let x0 = ((rect.left() * ppp) as usize).min(full_w);
                    let y0 = ((rect.top() * ppp) as usize).min(full_h);
                    let x1 = ((rect.right() * ppp).ceil() as usize).min(full_w);
                    let y1 = ((rect.bottom() * ppp).ceil() as usize).min(full_h);
                    let cw = x1.saturating_sub(x0);
                    let ch = y1.saturating_sub(y0);
                    let mut cropped = Vec::with_capacity(cw * ch * 4);
                    for y in y0..y1 {
                        for x in x0..x1 {
                            let c = color_image.pixels[y * full_w + x];
                            cropped.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
                        }
                    }
                    (cropped, cw, ch)
                } else {
                    let rgba: Vec<u8> = color_image
                        .pixels
                        .iter()
                        .flat_map(|c| [c.r(), c.g(), c.b(), c.a()])
                        .collect();
                    (rgba, full_w, full_h)
                };

                let stem = self
                    .logs
                    .get(self.selected)
                    .map(|l| l.stem().to_string())
                    .unwrap_or_else(|| "figure".to_string());
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name(format!("{stem}_figure.png"))
                    .add_filter("PNG Image", &["png"])
                    .save_file()
                {
                    match image::RgbaImage::from_raw(width as u32, height as u32, rgba) {
                        Some(img) => {
                            if let Err(e) = img.save(&path) {
                                self.error_message = Some(format!("Failed to save image: {e}"));
                            } else {
                                tracing::info!("Saved figure to {:?}", path);
                            }
                        }
                        None => {
                            self.error_message =
                                Some("Screenshot buffer had an unexpected size.".to_string());
                        }
                    }
                }
            }
        }

        // ------------------------------------------------------------------
        // 1. Handle dropped files
        // ------------------------------------------------------------------
        let mut dropped_paths: Vec<std::path::PathBuf> = Vec::new();
        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                let Some(path) = &file.path else { continue };
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_lowercase);
                if matches!(ext.as_deref(), Some("csv" | "xls" | "xlsx")) {
                    dropped_paths.push(path.clone());
                }
            }
        });
        for path in dropped_paths {
            self.load_file(&path);
        }

        // ------------------------------------------------------------------
        // 2. Header panel
        // ------------------------------------------------------------------
        let mut clear_files = false;
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::side_top_panel(&ctx.style())
                    .inner_margin(egui::Margin::symmetric(16, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.visuals_mut().override_text_color =
                        Some(ui.visuals().strong_text_color());
                    let heading = ui.heading("ThermoLog");
                    ui.visuals_mut().override_text_color = None;
                    heading.context_menu(|ui| {
                        if ui.button("About ThermoLog").clicked() {
                            self.show_about = true;
                            ui.close_menu();
                        }
                        ui.separator();
                        if ui.button("Close All Files").clicked() {
                            clear_files = true;
                            ui.close_menu();
                        }
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let theme_label = match self.theme {
                            Theme::Dark => "Light Mode",
                            Theme::Light => "Dark Mode",
                        };
                        if ui.button(theme_label).clicked() {
                            self.theme = self.theme.toggle();
                        }
                        ui.separator();
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });

        // ------------------------------------------------------------------
        // 3. Footer panel
        // ------------------------------------------------------------------
        egui::TopBottomPanel::bottom("footer")
            .frame(
                egui::Frame::side_top_panel(&ctx.style())
                    .inner_margin(egui::Margin::symmetric(16, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let count = self.logs.len();
                    let label = if count == 1 {
                        "1 file".to_string()
                    } else {
                        format!("{count} files")
                    };
                    ui.label(egui::RichText::new(label).weak());
                    if let Some(log) = self.logs.get(self.selected) {
                        ui.separator();
                        ui.label(
                            egui::RichText::new(log.path().display().to_string())
                                .weak()
                                .small(),
                        );
                    }
                    if let Some(msg) = &self.error_message {
                        ui.separator();
                        ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    }
                });
            });

        // ------------------------------------------------------------------
        // 4. Side panel: files, channels, checks, statistics
        // ------------------------------------------------------------------
        let mut side_action = SideAction::None;
        egui::SidePanel::left("side_panel")
            .resizable(true)
            .default_width(250.0)
            .width_range(200.0..=420.0)
            .show(ctx, |ui| {
                side_action = side_panel::show_side_panel(
                    ui,
                    &self.logs,
                    self.selected,
                    &self.warnings,
                    &self.stats_reports,
                );
            });

        // ------------------------------------------------------------------
        // 5. Central panel: request bar and the figure
        // ------------------------------------------------------------------
        let mut do_plot = false;
        let mut do_compare = false;
        let mut do_export_csv = false;
        let mut do_export_png = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Plot");
                let edit = ui.add(
                    egui::TextEdit::singleline(&mut self.request)
                        .hint_text("(Ts Tr) pin:MPa \u{2026} or all")
                        .desired_width(280.0),
                );
                if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    do_plot = true;
                }
                if ui.button("Draw").clicked() {
                    do_plot = true;
                }
                if ui.button("Reset View").clicked() {
                    self.reset_plot_view = true;
                }
                ui.toggle_value(&mut self.show_table, "Table");
                ui.menu_button("Export", |ui| {
                    if ui.button("Data as CSV\u{2026}").clicked() {
                        do_export_csv = true;
                        ui.close_menu();
                    }
                    if ui.button("Figure as PNG\u{2026}").clicked() {
                        do_export_png = true;
                        ui.close_menu();
                    }
                });
                ui.separator();
                ui.toggle_value(&mut self.compare_mode, "Compare Files");
            });
            if self.compare_mode {
                ui.horizontal(|ui| {
                    ui.label("Channel");
                    let edit = ui.add(
                        egui::TextEdit::singleline(&mut self.compare_identifier)
                            .hint_text("Tr or pin:MPa")
                            .desired_width(160.0),
                    );
                    if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        do_compare = true;
                    }
                    if ui.button("Compare").clicked() {
                        do_compare = true;
                    }
                });
            }
            if let Some(figure) = &self.figure {
                for warning in &figure.warnings {
                    ui.colored_label(egui::Color32::from_rgb(200, 130, 0), warning);
                }
            }
            ui.separator();

            let content = ui.scope(|ui| {
                if self.compare_mode {
                    match &self.comparison {
                        Some(comparison) => {
                            figure_panel::show_comparison(ui, comparison, self.reset_plot_view);
                        }
                        None => {
                            ui.add_space(60.0);
                            ui.vertical_centered(|ui| {
                                ui.label(
                                    egui::RichText::new(
                                        "Enter a channel and press Compare to see it \
                                         across all loaded files.",
                                    )
                                    .weak(),
                                );
                            });
                        }
                    }
                } else if let Some(figure) = &self.figure {
                    if self.show_table {
                        figure_panel::show_figure_table(ui, figure);
                    } else {
                        figure_panel::show_figure(ui, figure, self.reset_plot_view);
                    }
                } else {
                    ui.add_space(60.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Welcome to ThermoLog");
                        ui.add_space(12.0);
                        ui.label(
                            egui::RichText::new(
                                "Drop a CSV or Excel log anywhere in this window, then \
                                 type a plot request like \"(Ts Tr)\" or \"all\".",
                            )
                            .weak(),
                        );
                    });
                }
            });
            self.figure_rect = Some(content.response.rect);
        });
        self.reset_plot_view = false;

        // ------------------------------------------------------------------
        // 6. Process collected actions
        // ------------------------------------------------------------------
        if clear_files {
            self.logs.clear();
            self.selected = 0;
            self.refresh();
        }
        match side_action {
            SideAction::None => {}
            SideAction::OpenFile => self.open_file_dialog(),
            SideAction::SelectFile(index) => self.select_file(index),
            SideAction::RemoveFile(index) => self.remove_file(index),
            SideAction::AppendIdentifier(id) => {
                if !self.request.is_empty() && !self.request.ends_with(' ') {
                    self.request.push(' ');
                }
                self.request.push_str(&id);
                self.build_figure();
            }
        }
        if do_plot {
            self.build_figure();
        }
        if do_compare {
            self.build_comparison();
        }
        if do_export_csv {
            self.export_csv();
        }
        if do_export_png {
            self.screenshot_pending = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(
                egui::UserData::default(),
            ));
        }

        // ------------------------------------------------------------------
        // 7. Poll async file loads
        // ------------------------------------------------------------------
        let mut completed: Vec<Result<LogFile>> = Vec::new();
        self.pending_loads.retain(|pending| {
            let mut slot = pending.result.lock().unwrap();
            match slot.take() {
                Some(result) => {
                    completed.push(result);
                    false
                }
                None => true,
            }
        });
        for result in completed {
            match result {
                Ok(log) => {
                    self.logs.push(Arc::new(log));
                    self.selected = self.logs.len() - 1;
                    self.refresh();
                }
                Err(e) => {
                    tracing::error!("Failed to load file: {e}");
                    self.error_message = Some(e.to_string());
                }
            }
        }

        if !self.pending_loads.is_empty() {
            egui::Window::new("Loading")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Reading log file\u{2026}");
                    });
                });
            ctx.request_repaint();
        }

        // ------------------------------------------------------------------
        // 8. About window (hidden menu)
        // ------------------------------------------------------------------
        if self.show_about {
            egui::Window::new("About ThermoLog")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .default_width(340.0)
                .show(ctx, |ui| {
                    ui.heading("ThermoLog");
                    ui.label(format!("Version: {VERSION}"));
                    ui.add_space(4.0);
                    ui.label("A viewer for heat pump test bench logs.");
                    ui.add_space(10.0);
                    ui.label("Features:");
                    ui.label("  \u{2022} Channel naming from a single table");
                    ui.label("  \u{2022} Derived quantities (heat flows, humidity ratios)");
                    ui.label("  \u{2022} Grouped plots with shared axes");
                    ui.label("  \u{2022} Multi-file comparison");
                    ui.label("  \u{2022} Built-in sanity checks");
                    ui.add_space(10.0);
                    ui.label("Right-click the title for this menu.");
                });
        }
    }
}
