use std::sync::Arc;

use crate::data::log::{FlowDirection, LogFile};
use crate::processing::resolver;
use crate::processing::validate::Warning;

/// Actions the side panel can request from the app.
pub enum SideAction {
    None,
    OpenFile,
    SelectFile(usize),
    RemoveFile(usize),
    AppendIdentifier(String),
}

/// Left panel: loaded files, the selected file's channels, check
/// findings and statistics of the plotted series.
pub fn show_side_panel(
    ui: &mut egui::Ui,
    logs: &[Arc<LogFile>],
    selected: usize,
    warnings: &[Warning],
    stats_reports: &[String],
) -> SideAction {
    let mut action = SideAction::None;

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Files").strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Open\u{2026}").on_hover_text("Load a CSV or Excel log").clicked() {
                action = SideAction::OpenFile;
            }
        });
    });
    if logs.is_empty() {
        ui.label(egui::RichText::new("Drop a log file here or open one.").weak());
    }
    for (i, log) in logs.iter().enumerate() {
        ui.horizontal(|ui| {
            if ui.selectable_label(i == selected, log.stem()).clicked() {
                action = SideAction::SelectFile(i);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("\u{00D7}").on_hover_text("Remove file").clicked() {
                    action = SideAction::RemoveFile(i);
                }
            });
        });
    }

    let Some(log) = logs.get(selected) else {
        return action;
    };

    ui.separator();
    ui.label(egui::RichText::new("Channels").strong());
    let direction = match log.direction() {
        FlowDirection::Forward => "forward",
        FlowDirection::Reversed => "reversed",
    };
    ui.label(
        egui::RichText::new(format!("{} rows, {direction} circuit", log.row_count()))
            .weak()
            .small(),
    );
    egui::ScrollArea::vertical()
        .id_salt("channel_list")
        .max_height(220.0)
        .show(ui, |ui| {
            for id in resolver::available_identifiers(log) {
                let derived = !log.has_column(&id);
                let text = if derived {
                    format!("{id}  (derived)")
                } else {
                    id.clone()
                };
                if ui
                    .selectable_label(false, text)
                    .on_hover_text("Append to the plot request")
                    .clicked()
                {
                    action = SideAction::AppendIdentifier(id);
                }
            }
        });

    ui.separator();
    ui.label(egui::RichText::new("Checks").strong());
    if warnings.is_empty() {
        ui.label(egui::RichText::new("No findings.").weak());
    } else {
        for warning in warnings {
            ui.colored_label(
                egui::Color32::from_rgb(200, 130, 0),
                format!("[{}] {}", warning.check, warning.message),
            );
            if let Some(involved) = warning.involved {
                if ui
                    .small_button(format!("plot {involved}"))
                    .on_hover_text("Plot the quantities this check inspected")
                    .clicked()
                {
                    action = SideAction::AppendIdentifier(involved.to_string());
                }
            }
        }
    }

    ui.separator();
    egui::CollapsingHeader::new("Statistics")
        .id_salt("stats_section")
        .default_open(false)
        .show(ui, |ui| {
            if stats_reports.is_empty() {
                ui.label(egui::RichText::new("Build a plot first.").weak());
            } else {
                egui::ScrollArea::vertical()
                    .id_salt("stats_scroll")
                    .max_height(260.0)
                    .show(ui, |ui| {
                        for report in stats_reports {
                            ui.monospace(report);
                        }
                    });
            }
        });

    action
}
