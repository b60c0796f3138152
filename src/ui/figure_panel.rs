use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::data::datetime;
use crate::plot::figure::{FileComparison, Figure};

/// Series color cycle, restarted per axis.
pub const COLOR_PALETTE: [[u8; 3]; 10] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
    [140, 86, 75],
    [227, 119, 194],
    [127, 127, 127],
    [188, 189, 34],
    [23, 190, 207],
];

pub fn color_for_index(index: usize) -> egui::Color32 {
    let c = COLOR_PALETTE[index % COLOR_PALETTE.len()];
    egui::Color32::from_rgb(c[0], c[1], c[2])
}

/// Render a figure as vertically stacked subplots over the available
/// height. `reset_view` drops any user pan/zoom, used right after a
/// new figure is built.
pub fn show_figure(ui: &mut egui::Ui, figure: &Figure, reset_view: bool) {
    let count = figure.subplots.len().max(1);
    let spacing = 8.0_f32;
    let subplot_height =
        ((ui.available_height() - spacing * (count as f32 - 1.0)) / count as f32).max(160.0);

    let last = figure.subplots.len().saturating_sub(1);
    for (idx, subplot) in figure.subplots.iter().enumerate() {
        let mut plot = Plot::new(("figure_subplot", idx))
            .height(subplot_height)
            .allow_scroll(false)
            .y_axis_label(&subplot.y_label);
        if idx == last {
            plot = plot.x_axis_label(&figure.x_label);
        }
        if subplot.series.len() > 1 {
            plot = plot.legend(Legend::default());
        }
        if figure.x_is_epoch {
            plot = plot.x_axis_formatter(|mark, _range| datetime::format_timestamp(mark.value));
        }
        if reset_view {
            plot = plot.reset();
        }

        plot.show(ui, |plot_ui| {
            for (si, series) in subplot.series.iter().enumerate() {
                let points: PlotPoints = figure
                    .x
                    .iter()
                    .zip(series.values.iter())
                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                    .map(|(&x, &y)| [x, y])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(&series.symbol)
                        .color(color_for_index(si))
                        .width(1.5),
                );
            }
        });
        if idx != last {
            ui.add_space(spacing);
        }
    }
}

/// Data-table view of a figure: the x column plus one column per
/// plotted series, in subplot order.
pub fn show_figure_table(ui: &mut egui::Ui, figure: &Figure) {
    use egui_extras::{Column, TableBuilder};

    let series: Vec<_> = figure
        .subplots
        .iter()
        .flat_map(|s| s.series.iter())
        .collect();
    let headers: Vec<String> = series
        .iter()
        .map(|q| format!("{} ({})", q.symbol, q.unit))
        .collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(90.0), headers.len() + 1)
        .min_scrolled_height(240.0)
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(&figure.x_label);
            });
            for label in &headers {
                header.col(|ui| {
                    ui.strong(label);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, figure.x.len(), |mut row| {
                let i = row.index();
                row.col(|ui| {
                    let x = figure.x[i];
                    if figure.x_is_epoch {
                        ui.label(datetime::format_timestamp(x));
                    } else {
                        ui.label(format!("{x}"));
                    }
                });
                for q in &series {
                    row.col(|ui| {
                        if let Some(v) = q.values.get(i).filter(|v| v.is_finite()) {
                            ui.label(format!("{v:.3}"));
                        }
                    });
                }
            });
        });
}

/// Render a multi-file comparison: the shared title, then a grid of
/// panels, each titled with its file stem.
pub fn show_comparison(ui: &mut egui::Ui, comparison: &FileComparison, reset_view: bool) {
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(&comparison.title).strong());
    });
    ui.add_space(4.0);

    let row_height =
        ((ui.available_height() - 8.0 * comparison.rows as f32) / comparison.rows as f32).max(160.0);

    for row in 0..comparison.rows {
        ui.columns(comparison.cols, |columns| {
            for col in 0..comparison.cols {
                let idx = row * comparison.cols + col;
                let Some(panel) = comparison.panels.get(idx) else {
                    continue;
                };
                let ui = &mut columns[col];
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(&panel.title).small());
                });

                let mut plot = Plot::new(("comparison_panel", idx))
                    .height(row_height - 20.0)
                    .allow_scroll(false)
                    .y_axis_label(&comparison.y_label);
                if panel.x_is_epoch {
                    plot = plot
                        .x_axis_formatter(|mark, _range| datetime::format_timestamp(mark.value));
                }
                if reset_view {
                    plot = plot.reset();
                }
                plot.show(ui, |plot_ui| {
                    let points: PlotPoints = panel
                        .x
                        .iter()
                        .zip(panel.series.values.iter())
                        .filter(|(x, y)| x.is_finite() && y.is_finite())
                        .map(|(&x, &y)| [x, y])
                        .collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(color_for_index(idx))
                            .width(1.5),
                    );
                });
            }
        });
        ui.add_space(8.0);
    }
}
