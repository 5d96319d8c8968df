use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::{AppConfig, RememberPageRequest};
use crate::page::{EmbeddedPage, NavigateRequest};

/// Address bar state; the input buffer is decoupled from the page's actual
/// URL so typing doesn't fight a navigation in flight
#[derive(Resource, Default)]
pub struct PageBarState {
    pub url_input: String,
    initialized: bool,
}

/// Address bar with recent pages
pub fn page_bar_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<PageBarState>,
    page: Res<EmbeddedPage>,
    config: Res<AppConfig>,
    mut navigations: MessageWriter<NavigateRequest>,
    mut remember: MessageWriter<RememberPageRequest>,
) -> Result {
    if !state.initialized {
        state.url_input = page.url().to_string();
        state.initialized = true;
    }

    egui::TopBottomPanel::top("page_bar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 6)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.label("Page:");

                let response = ui.add(
                    egui::TextEdit::singleline(&mut state.url_input)
                        .desired_width(480.0)
                        .hint_text("https://..."),
                );
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if (ui.button("Go").clicked() || submitted) && !state.url_input.trim().is_empty() {
                    let url = state.url_input.trim().to_string();
                    navigations.write(NavigateRequest { url: url.clone() });
                    remember.write(RememberPageRequest { url });
                }

                if !config.data.recent_pages.is_empty() {
                    egui::ComboBox::from_id_salt("recent_pages")
                        .selected_text("Recent")
                        .width(80.0)
                        .show_ui(ui, |ui| {
                            for url in &config.data.recent_pages {
                                if ui.selectable_label(false, url).clicked() {
                                    state.url_input = url.clone();
                                    navigations.write(NavigateRequest { url: url.clone() });
                                }
                            }
                        });
                }

                let (badge, color) = if page.is_same_origin() {
                    ("same-origin", egui::Color32::from_rgb(100, 200, 100))
                } else {
                    ("cross-origin", egui::Color32::from_rgb(230, 180, 80))
                };
                ui.colored_label(color, egui::RichText::new(badge).size(11.0));
            });
        });
    Ok(())
}
