use serde::Serialize;
use std::sync::Mutex;
use tauri::{AppHandle, Emitter, Manager, State};

use earthview_core::{
    Category, GlobeError, GlobeSettings, Layer, LayerId, LayerKind, LayerOptions, LayerRegistry,
    LayerUpdate, NewLayer,
};
use earthview_renderer::{RenderFrame, Viewport};

/// Event carrying a `{baseLayers | overlayLayers | settingLayers}` payload.
pub const LAYERS_UPDATED: &str = "layers-updated";
/// Event emitted once the viewport exists and holds its default layers.
pub const MAP_CREATED: &str = "map-created";
/// Environment variable naming an optional settings JSON file.
pub const SETTINGS_ENV: &str = "EARTHVIEW_SETTINGS";

/// Shared application state managed by Tauri.
pub struct AppState {
    pub settings: GlobeSettings,
    pub globe: Mutex<LayerRegistry<Viewport>>,
}

impl AppState {
    /// Build the registry with its outbound events wired to the page.
    pub fn new(app: AppHandle, settings: GlobeSettings) -> Self {
        let updates = app.clone();
        let created = app;
        let registry = LayerRegistry::new()
            .with_sink(move |update: LayerUpdate| {
                if let Err(e) = updates.emit(LAYERS_UPDATED, update) {
                    log::warn!("failed to emit {}: {}", LAYERS_UPDATED, e);
                }
            })
            .on_map_created(move |viewport: &Viewport| {
                if let Err(e) = created.emit(MAP_CREATED, MapInfo::from(viewport)) {
                    log::warn!("failed to emit {}: {}", MAP_CREATED, e);
                }
            });
        Self {
            settings,
            globe: Mutex::new(registry),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MapInfo {
    surface_id: String,
    width: u32,
    height: u32,
    layer_count: usize,
}

impl From<&Viewport> for MapInfo {
    fn from(viewport: &Viewport) -> Self {
        use earthview_core::LayerHost;
        Self {
            surface_id: viewport.surface_id.clone(),
            width: viewport.width,
            height: viewport.height,
            layer_count: viewport.layers().len(),
        }
    }
}

fn settings_from_env() -> Result<GlobeSettings, GlobeError> {
    match std::env::var_os(SETTINGS_ENV) {
        Some(path) => GlobeSettings::load(path),
        None => Ok(GlobeSettings::default()),
    }
}

// ── Tauri IPC Commands ───────────────────────────────────────────────

/// Create the viewport on the page's canvas and populate the default layers.
#[tauri::command]
fn create_map(
    state: State<AppState>,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<MapInfo, String> {
    let settings = &state.settings;
    let viewport = Viewport::new(
        &settings.surface_id,
        width.unwrap_or(settings.surface_width),
        height.unwrap_or(settings.surface_height),
    );
    let mut globe = state.globe.lock().map_err(|e| e.to_string())?;
    globe
        .initialize_with(viewport, &settings.layer_table())
        .map_err(|e| e.to_string())?;
    globe
        .viewport()
        .map(MapInfo::from)
        .ok_or_else(|| GlobeError::NotInitialized.to_string())
}

/// Get the layers of one category ("background", "base", "overlay", "setting").
#[tauri::command]
fn get_layers(state: State<AppState>, category: String) -> Result<Vec<Layer>, String> {
    let category: Category = category.parse().map_err(|e: GlobeError| e.to_string())?;
    let globe = state.globe.lock().map_err(|e| e.to_string())?;
    Ok(globe.get_layers(category))
}

/// Toggle a layer's visibility; returns its new state.
#[tauri::command]
fn toggle_layer(state: State<AppState>, id: LayerId) -> Result<bool, String> {
    let mut globe = state.globe.lock().map_err(|e| e.to_string())?;
    globe.toggle_layer(id).map_err(|e| e.to_string())
}

/// Add a layer on top of the current list.
#[tauri::command]
fn add_layer(
    state: State<AppState>,
    kind: LayerKind,
    options: Option<LayerOptions>,
) -> Result<LayerId, String> {
    let mut globe = state.globe.lock().map_err(|e| e.to_string())?;
    let surface_id = state.settings.surface_id.as_str();
    let layer = if kind.needs_surface() {
        NewLayer::new(kind).with_surface(surface_id)
    } else {
        NewLayer::new(kind)
    };
    globe
        .add_layer(layer, options.unwrap_or_default())
        .map_err(|e| e.to_string())
}

/// Overwrite a registered layer's options.
#[tauri::command]
fn configure_layer(
    state: State<AppState>,
    id: LayerId,
    options: LayerOptions,
) -> Result<(), String> {
    let mut globe = state.globe.lock().map_err(|e| e.to_string())?;
    globe.configure_layer(id, options).map_err(|e| e.to_string())
}

/// Describe the next frame if a redraw is pending.
#[tauri::command]
fn take_render_frame(
    state: State<AppState>,
    altitude: Option<f64>,
) -> Result<Option<RenderFrame>, String> {
    let altitude = altitude.unwrap_or(state.settings.initial_altitude);
    let mut globe = state.globe.lock().map_err(|e| e.to_string())?;
    let viewport = globe
        .viewport_mut()
        .ok_or_else(|| GlobeError::NotInitialized.to_string())?;
    Ok(viewport.take_frame(altitude))
}

/// Get the settings the page needs before creating the map.
#[tauri::command]
fn get_settings(state: State<AppState>) -> GlobeSettings {
    state.settings.clone()
}

// ── App setup ────────────────────────────────────────────────────────

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::init();

    tauri::Builder::default()
        .setup(|app| {
            let settings = settings_from_env()?;
            app.manage(AppState::new(app.handle().clone(), settings));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            create_map,
            get_layers,
            toggle_layer,
            add_layer,
            configure_layer,
            take_render_frame,
            get_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running Earthview");
}
