use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use std::path::Path;

use crate::config::{AppConfig, UpdateLastReviewPathRequest};
use crate::overlay::persistence::{LoadReviewRequest, SaveReviewRequest};
use crate::overlay::scene::{parse_hex_color, SurfaceMutator};
use crate::overlay::selection::SelectionState;
use crate::overlay::tools::{ActiveStyle, ActiveTool, ReviewTool};
use crate::overlay::viewport::ViewportTransform;
use crate::overlay::OverlayState;

const SWATCHES: &[(&str, &str)] = &[
    ("#e53935", "Red"),
    ("#1e88e5", "Blue"),
    ("#43a047", "Green"),
    ("#fdd835", "Yellow"),
    ("#fb8c00", "Orange"),
    ("#8e24aa", "Purple"),
    ("#000000", "Black"),
    ("#ffffff", "White"),
];

/// Main toolbar: tool buttons, style controls, undo/redo, and file actions
#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut active_tool: ResMut<ActiveTool>,
    mut style: ResMut<ActiveStyle>,
    mut overlay_state: ResMut<OverlayState>,
    mut mutator: SurfaceMutator,
    mut selection: ResMut<SelectionState>,
    mut viewport: ResMut<ViewportTransform>,
    config: Res<AppConfig>,
    mut save_requests: MessageWriter<SaveReviewRequest>,
    mut load_requests: MessageWriter<LoadReviewRequest>,
    mut config_requests: MessageWriter<UpdateLastReviewPathRequest>,
) -> Result {
    egui::TopBottomPanel::top("review_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                for tool in ReviewTool::all() {
                    let selected = active_tool.tool == *tool;
                    let button = egui::Button::new(
                        egui::RichText::new(tool_button_label(tool)).size(14.0).strong(),
                    )
                    .min_size(egui::vec2(0.0, 28.0))
                    .selected(selected);

                    let response = ui.add(button);
                    if response.clicked() {
                        active_tool.tool = *tool;
                    }
                    response.on_hover_text(tool.display_name());
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                for (hex, name) in SWATCHES {
                    let is_selected = style.stroke.eq_ignore_ascii_case(hex);
                    let button = egui::Button::new("")
                        .fill(hex_to_egui(hex))
                        .min_size(egui::vec2(18.0, 18.0))
                        .stroke(if is_selected {
                            egui::Stroke::new(2.0, egui::Color32::WHITE)
                        } else {
                            egui::Stroke::new(1.0, egui::Color32::DARK_GRAY)
                        });
                    if ui.add(button).on_hover_text(*name).clicked() {
                        style.stroke = hex.to_string();
                    }
                }

                ui.add_space(8.0);
                ui.label("Width:");
                ui.add(egui::Slider::new(&mut style.stroke_width, 1.0..=12.0).show_value(false));

                if active_tool.tool == ReviewTool::Text {
                    ui.label("Size:");
                    ui.add(egui::Slider::new(&mut style.font_size, 10.0..=48.0).show_value(false));
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                let undo = egui::Button::new("Undo").min_size(egui::vec2(0.0, 24.0));
                if ui.add_enabled(mutator.history.can_undo(), undo).clicked()
                    && mutator.history.undo_onto(&mut mutator.surface)
                {
                    selection.selected = None;
                }
                let redo = egui::Button::new("Redo").min_size(egui::vec2(0.0, 24.0));
                if ui.add_enabled(mutator.history.can_redo(), redo).clicked()
                    && mutator.history.redo_onto(&mut mutator.surface)
                {
                    selection.selected = None;
                }

                if ui.button("Clear").clicked() {
                    mutator.clear();
                    selection.selected = None;
                }

                ui.add_space(8.0);
                ui.checkbox(&mut overlay_state.visible, "Overlay");

                // Right-aligned zoom and file actions
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Open...").clicked()
                        && let Some(path) = rfd::FileDialog::new()
                            .add_filter("Review", &["json"])
                            .pick_file()
                    {
                        config_requests.write(UpdateLastReviewPathRequest { path: path.clone() });
                        load_requests.write(LoadReviewRequest { path });
                    }
                    // The last opened or saved review is one click away
                    if let Some(last) = config.data.last_review_path.clone()
                        && ui
                            .button("Reopen")
                            .on_hover_text(reopen_label(&last))
                            .clicked()
                    {
                        load_requests.write(LoadReviewRequest { path: last });
                    }
                    if ui.button("Save...").clicked()
                        && let Some(path) = rfd::FileDialog::new()
                            .add_filter("Review", &["json"])
                            .set_file_name("review.json")
                            .save_file()
                    {
                        config_requests.write(UpdateLastReviewPathRequest { path: path.clone() });
                        save_requests.write(SaveReviewRequest { path });
                    }

                    ui.add_space(8.0);
                    let zoom = viewport.zoom();
                    let pan = viewport.pan();
                    if ui.button("+").clicked() {
                        viewport.set_viewport((zoom * 1.1).min(4.0), pan);
                    }
                    ui.label(format!("{:.0}%", zoom * 100.0));
                    if ui.button("-").clicked() {
                        viewport.set_viewport((zoom / 1.1).max(0.25), pan);
                    }
                });
            });
        });
    Ok(())
}

fn tool_button_label(tool: &ReviewTool) -> &'static str {
    match tool {
        ReviewTool::Select => "Select",
        ReviewTool::Pen => "Pen",
        ReviewTool::Highlighter => "Highlight",
        ReviewTool::Text => "Text",
        ReviewTool::Arrow => "Arrow",
        ReviewTool::Rectangle => "Rect",
        ReviewTool::Eraser => "Erase",
    }
}

/// Hover text for the reopen button: the file name when there is one, the
/// whole path otherwise
fn reopen_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn hex_to_egui(hex: &str) -> egui::Color32 {
    let c = parse_hex_color(hex).to_srgba();
    egui::Color32::from_rgb(
        (c.red * 255.0) as u8,
        (c.green * 255.0) as u8,
        (c.blue * 255.0) as u8,
    )
}
