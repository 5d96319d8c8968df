mod page_bar;
mod status_bar;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub use page_bar::PageBarState;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PageBarState>().add_systems(
            EguiPrimaryContextPass,
            (
                page_bar::page_bar_ui,
                toolbar::toolbar_ui,
                status_bar::status_bar_ui,
            )
                .chain(),
        );
    }
}
