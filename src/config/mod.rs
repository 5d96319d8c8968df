use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::MAX_RECENT_PAGES;
use crate::overlay::tools::ActiveStyle;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Default stroke color for new shapes, as a hex string
    #[serde(default = "default_stroke")]
    pub default_stroke: String,

    #[serde(default = "default_stroke_width")]
    pub default_stroke_width: f32,

    #[serde(default = "default_font_size")]
    pub default_font_size: f32,

    /// Recently reviewed page URLs for quick access
    #[serde(default)]
    pub recent_pages: Vec<String>,

    /// Last opened or saved review file, offered for one-click reopen
    #[serde(default)]
    pub last_review_path: Option<PathBuf>,
}

fn default_stroke() -> String {
    "#e53935".to_string()
}

fn default_stroke_width() -> f32 {
    3.0
}

fn default_font_size() -> f32 {
    18.0
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            default_stroke: default_stroke(),
            default_stroke_width: default_stroke_width(),
            default_font_size: default_font_size(),
            recent_pages: Vec::new(),
            last_review_path: None,
        }
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    pub data: AppConfigData,
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to add a page URL to the recent list
#[derive(Message)]
pub struct RememberPageRequest {
    pub url: String,
}

/// Message to update the last review file path in config
#[derive(Message)]
pub struct UpdateLastReviewPathRequest {
    pub path: PathBuf,
}

/// Load configuration from disk. A missing or corrupted file falls back to
/// defaults; review data is never at stake here.
fn load_config() -> AppConfig {
    let config_path = crate::paths::config_file();

    let data = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(data) => {
                    info!("Loaded config from {:?}", config_path);
                    data
                }
                Err(e) => {
                    warn!("Failed to parse config file, using defaults: {}", e);
                    AppConfigData::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file, using defaults: {}", e);
                AppConfigData::default()
            }
        }
    } else {
        info!("No config file found, using defaults");
        AppConfigData::default()
    };

    AppConfig {
        data,
        config_path,
        dirty: false,
    }
}

fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system: load config and seed the active drawing style from the
/// persisted defaults
fn load_config_system(mut config: ResMut<AppConfig>, mut style: ResMut<ActiveStyle>) {
    let loaded = load_config();
    config.data = loaded.data;
    config.config_path = loaded.config_path;
    config.dirty = false;

    style.stroke = config.data.default_stroke.clone();
    style.stroke_width = config.data.default_stroke_width;
    style.font_size = config.data.default_font_size;
}

fn save_config_system(mut events: MessageReader<SaveConfigRequest>, mut config: ResMut<AppConfig>) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

fn remember_page_system(
    mut events: MessageReader<RememberPageRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        // Remove if already in list (to move it to front)
        config.data.recent_pages.retain(|u| u != &event.url);
        config.data.recent_pages.insert(0, event.url.clone());
        config.data.recent_pages.truncate(MAX_RECENT_PAGES);

        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

fn update_last_review_path_system(
    mut events: MessageReader<UpdateLastReviewPathRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.last_review_path = Some(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .add_message::<SaveConfigRequest>()
            .add_message::<RememberPageRequest>()
            .add_message::<UpdateLastReviewPathRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                    remember_page_system.run_if(on_message::<RememberPageRequest>),
                    update_last_review_path_system
                        .run_if(on_message::<UpdateLastReviewPathRequest>),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert_eq!(data.default_stroke, "#e53935");
        assert!(data.recent_pages.is_empty());
        assert!(data.last_review_path.is_none());
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            default_stroke: "#1e88e5".to_string(),
            default_stroke_width: 5.0,
            default_font_size: 24.0,
            recent_pages: vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ],
            last_review_path: Some(PathBuf::from("/reviews/homepage.json")),
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.default_stroke, data.default_stroke);
        assert_eq!(parsed.recent_pages, data.recent_pages);
        assert_eq!(parsed.last_review_path, data.last_review_path);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let parsed: AppConfigData = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.default_stroke, "#e53935");
        assert_eq!(parsed.default_stroke_width, 3.0);
        assert_eq!(parsed.default_font_size, 18.0);
    }
}
