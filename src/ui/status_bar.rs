use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::overlay::history::SnapshotHistory;
use crate::overlay::persistence::ReviewFile;
use crate::overlay::scene::DrawingSurface;
use crate::overlay::sync::{ScrollSync, SyncMode};
use crate::overlay::viewport::ViewportTransform;
use crate::page::EmbeddedPage;

/// Bottom status line: sync mode, scroll position, zoom, shape and history
/// counts, and the bound review file
pub fn status_bar_ui(
    mut contexts: EguiContexts,
    sync: Res<ScrollSync>,
    page: Res<EmbeddedPage>,
    viewport: Res<ViewportTransform>,
    surface: Res<DrawingSurface>,
    history: Res<SnapshotHistory>,
    review_file: Res<ReviewFile>,
) -> Result {
    egui::TopBottomPanel::bottom("status_bar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 4)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                let mode = match sync.mode() {
                    Some(SyncMode::Direct) => "direct",
                    Some(SyncMode::Polling) => "polling",
                    None => "detached",
                };
                ui.label(small(format!("Sync: {}", mode)));
                ui.separator();

                let scroll = page.scroll();
                ui.label(small(format!("Scroll: {:.0}, {:.0}", scroll.x, scroll.y)));
                ui.separator();

                ui.label(small(format!("Zoom: {:.0}%", viewport.zoom() * 100.0)));
                ui.separator();

                ui.label(small(format!(
                    "{} shapes | {} undo / {} redo",
                    surface.shape_count(),
                    history.undo_depth(),
                    history.redo_depth()
                )));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match &review_file.path {
                        Some(path) => ui.label(small(format!("{}", path.display()))),
                        None => ui.label(small("autosave only".to_string())),
                    };
                });
            });
        });
    Ok(())
}

fn small(text: String) -> egui::RichText {
    egui::RichText::new(text).color(egui::Color32::GRAY).size(11.0)
}
