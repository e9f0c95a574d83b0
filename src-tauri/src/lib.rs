//! Spellbar application shell.
//!
//! Owns the Tauri windows, tray icon, and global-shortcut wiring, and
//! exposes the IPC contract to the web UI. All decisions live in the
//! `spellbar` core; this crate adapts them to the host framework.

use std::sync::Arc;

use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    Emitter, LogicalPosition, Manager, State,
};

use spellbar::business::{
    GlobalShortcutRegistrar, HotkeyBinding, HotkeyManager, Rect, RodioPlayer, SoundPlayer,
    WindowController, WindowShell,
};
use spellbar::ipc::{IpcRequest, IpcResponse, Router};
use spellbar::platform::{FocusTracker, PlatformFactory};
use spellbar::{ConfigStore, SpellChecker};

/// Application state managed by Tauri, accessible from commands.
struct AppState {
    router: Arc<Router>,
}

#[tauri::command]
async fn spell_check(state: State<'_, AppState>, word: String) -> Result<IpcResponse, String> {
    Ok(state.router.handle(IpcRequest::SpellCheck { word }).await)
}

#[tauri::command]
async fn get_clipboard(state: State<'_, AppState>) -> Result<IpcResponse, String> {
    Ok(state.router.handle(IpcRequest::GetClipboard).await)
}

#[tauri::command]
async fn set_clipboard(state: State<'_, AppState>, text: String) -> Result<IpcResponse, String> {
    Ok(state.router.handle(IpcRequest::SetClipboard { text }).await)
}

#[tauri::command]
async fn hide_window(state: State<'_, AppState>) -> Result<IpcResponse, String> {
    Ok(state.router.handle(IpcRequest::HideWindow).await)
}

#[tauri::command]
async fn get_settings(state: State<'_, AppState>) -> Result<IpcResponse, String> {
    Ok(state.router.handle(IpcRequest::GetSettings).await)
}

#[tauri::command]
async fn update_hotkey(state: State<'_, AppState>, binding: String) -> Result<IpcResponse, String> {
    Ok(state.router.handle(IpcRequest::UpdateHotkey { binding }).await)
}

#[tauri::command]
async fn update_sound_setting(
    state: State<'_, AppState>,
    enabled: bool,
) -> Result<IpcResponse, String> {
    Ok(state
        .router
        .handle(IpcRequest::UpdateSoundSetting { enabled })
        .await)
}

#[tauri::command]
async fn open_settings(state: State<'_, AppState>) -> Result<IpcResponse, String> {
    Ok(state.router.handle(IpcRequest::OpenSettings).await)
}

#[tauri::command]
async fn close_settings(state: State<'_, AppState>) -> Result<IpcResponse, String> {
    Ok(state.router.handle(IpcRequest::CloseSettings).await)
}

/// [`WindowShell`] over the two Tauri windows.
struct TauriShell {
    app: tauri::AppHandle,
}

impl WindowShell for TauriShell {
    fn show_popup(&self, bounds: Rect) {
        if let Some(window) = self.app.get_webview_window("main") {
            let _ = window.set_position(LogicalPosition::new(bounds.x, bounds.y));
            let _ = window.show();
            let _ = window.set_focus();
            // The UI resets and focuses its input field on this event.
            let _ = window.emit("popup-shown", ());
        }
    }

    fn focus_popup(&self) {
        if let Some(window) = self.app.get_webview_window("main") {
            let _ = window.show();
            let _ = window.set_focus();
        }
    }

    fn hide_popup(&self) {
        if let Some(window) = self.app.get_webview_window("main") {
            let _ = window.hide();
        }
    }

    fn open_settings(&self) {
        if let Some(window) = self.app.get_webview_window("settings") {
            let _ = window.center();
            let _ = window.show();
            let _ = window.set_focus();
            let _ = window.emit("settings-shown", ());
        }
    }

    fn focus_settings(&self) {
        if let Some(window) = self.app.get_webview_window("settings") {
            let _ = window.show();
            let _ = window.set_focus();
        }
    }

    fn close_settings(&self) {
        if let Some(window) = self.app.get_webview_window("settings") {
            let _ = window.hide();
        }
    }

    fn display_near_pointer(&self) -> Option<Rect> {
        let monitor = self
            .app
            .cursor_position()
            .ok()
            .and_then(|pos| self.app.monitor_from_point(pos.x, pos.y).ok().flatten())
            .or_else(|| self.app.primary_monitor().ok().flatten())?;

        // Convert the physical work area to logical points.
        let scale = monitor.scale_factor();
        let area = monitor.work_area();
        Some(Rect {
            x: area.position.x as f64 / scale,
            y: area.position.y as f64 / scale,
            width: area.size.width as f64 / scale,
            height: area.size.height as f64 / scale,
        })
    }
}

#[cfg(target_os = "macos")]
#[allow(unexpected_cfgs)]
mod macos_ext {
    use cocoa::base::{id, NO};
    use objc::{class, msg_send, sel, sel_impl};
    use tauri::WebviewWindow;

    pub fn setup_panel(window: &WebviewWindow) {
        if let Ok(ns_window) = window.ns_window() {
            let ns_window = ns_window as id;
            unsafe {
                // Follow the user across Spaces and full-screen apps.
                let collection_behavior: u64 = (1 << 0) | // NSWindowCollectionBehaviorCanJoinAllSpaces
                    (1 << 7); // NSWindowCollectionBehaviorFullScreenAuxiliary
                let _: () = msg_send![ns_window, setCollectionBehavior: collection_behavior];
                let _: () = msg_send![ns_window, setHidesOnDeactivate: NO];
            }
        }
    }

    pub fn set_dock_visible(visible: bool) {
        unsafe {
            let app: id = msg_send![class!(NSApplication), sharedApplication];
            let policy = if visible { 0 } else { 1 };
            let _: () = msg_send![app, setActivationPolicy: policy];
        }
    }
}

pub fn run() {
    if !spellbar::platform::session_supported() {
        eprintln!("Spellbar's menu-bar session requires macOS; use the `spellbar` CLI instead.");
        std::process::exit(2);
    }

    tauri::Builder::default()
        .plugin(tauri_plugin_log::Builder::default().build())
        .invoke_handler(tauri::generate_handler![
            spell_check,
            get_clipboard,
            set_clipboard,
            hide_window,
            get_settings,
            update_hotkey,
            update_sound_setting,
            open_settings,
            close_settings
        ])
        .setup(|app| {
            let handle = app.handle().clone();

            // The hotkey registrar must be created on the main thread.
            let registrar = GlobalShortcutRegistrar::new()?;
            let hotkeys = Arc::new(HotkeyManager::new(Box::new(registrar)));

            let store = ConfigStore::new();
            let config = store.load();

            let binding: HotkeyBinding = config.hotkey.parse().unwrap_or_else(|err| {
                log::warn!(
                    "Configured hotkey {:?} is invalid ({}), using default",
                    config.hotkey,
                    err
                );
                HotkeyBinding::default()
            });
            if let Err(err) = hotkeys.register(&binding) {
                log::warn!("Could not register global hotkey {}: {}", binding, err);
            }

            let shell: Arc<dyn WindowShell> = Arc::new(TauriShell {
                app: handle.clone(),
            });
            let focus: Arc<dyn FocusTracker> = Arc::from(PlatformFactory::create_focus_tracker());
            let windows = Arc::new(WindowController::new(shell, focus));

            // Dictionary loads in the background; checks before readiness
            // get an explicit "still loading" answer.
            let checker = Arc::new(SpellChecker::new_loading());
            {
                let checker = checker.clone();
                tauri::async_runtime::spawn(async move {
                    checker.load_default().await;
                });
            }

            let sound: Arc<dyn SoundPlayer> = Arc::new(RodioPlayer::new());
            let router = Arc::new(Router::new(
                checker,
                store,
                hotkeys,
                sound,
                windows.clone(),
            ));
            app.manage(AppState {
                router: router.clone(),
            });

            #[cfg(target_os = "macos")]
            {
                macos_ext::set_dock_visible(false);
                if let Some(window) = app.get_webview_window("main") {
                    macos_ext::setup_panel(&window);
                }
            }

            // Click-away hides the popup.
            if let Some(window) = app.get_webview_window("main") {
                let windows_on_blur = windows.clone();
                window.on_window_event(move |event| {
                    if let tauri::WindowEvent::Focused(false) = event {
                        let windows = windows_on_blur.clone();
                        tauri::async_runtime::spawn(async move {
                            windows.hide_popup().await;
                        });
                    }
                });
            }

            // The settings window hides instead of being destroyed, so the
            // singleton can be refocused later.
            if let Some(settings_window) = app.get_webview_window("settings") {
                let windows_on_close = windows.clone();
                settings_window.on_window_event(move |event| {
                    if let tauri::WindowEvent::CloseRequested { api, .. } = event {
                        api.prevent_close();
                        let windows = windows_on_close.clone();
                        tauri::async_runtime::spawn(async move {
                            windows.close_settings().await;
                        });
                    }
                });
            }

            build_tray(app, windows.clone())?;

            // Forward global hotkey presses to the window controller.
            let windows_on_hotkey = windows.clone();
            std::thread::spawn(move || {
                let receiver = GlobalHotKeyEvent::receiver();
                while let Ok(event) = receiver.recv() {
                    if event.state == HotKeyState::Pressed {
                        let windows = windows_on_hotkey.clone();
                        tauri::async_runtime::spawn(async move {
                            windows.toggle_popup().await;
                        });
                    }
                }
            });

            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

fn build_tray(app: &tauri::App, windows: Arc<WindowController>) -> tauri::Result<()> {
    let toggle_item = MenuItem::with_id(app, "toggle", "Check a Word", true, None::<&str>)?;
    let settings_item = MenuItem::with_id(app, "settings", "Settings...", true, None::<&str>)?;
    let quit_item = MenuItem::with_id(app, "quit", "Quit Spellbar", true, None::<&str>)?;

    let menu = Menu::with_items(
        app,
        &[
            &toggle_item,
            &PredefinedMenuItem::separator(app)?,
            &settings_item,
            &PredefinedMenuItem::separator(app)?,
            &quit_item,
        ],
    )?;

    let (rgba, width, height) = tray_icon_rgba();
    let icon = tauri::image::Image::new_owned(rgba, width, height);

    let menu_windows = windows.clone();
    let _tray = TrayIconBuilder::with_id("tray")
        .icon(icon)
        .icon_as_template(true)
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(move |app, event| match event.id.as_ref() {
            "quit" => app.exit(0),
            "settings" => {
                let windows = menu_windows.clone();
                tauri::async_runtime::spawn(async move {
                    windows.open_settings().await;
                });
            }
            "toggle" => {
                let windows = menu_windows.clone();
                tauri::async_runtime::spawn(async move {
                    windows.toggle_popup().await;
                });
            }
            _ => {}
        })
        .on_tray_icon_event(move |_tray, event| {
            // Left click toggles the popup directly.
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                let windows = windows.clone();
                tauri::async_runtime::spawn(async move {
                    windows.toggle_popup().await;
                });
            }
        })
        .build(app)?;

    Ok(())
}

/// Menu-bar icon drawn directly as RGBA: a solid disc with a check mark.
/// Rendered as a template image so macOS recolors it for the theme.
fn tray_icon_rgba() -> (Vec<u8>, u32, u32) {
    let width = 32u32;
    let height = 32u32;
    let mut rgba = vec![0u8; (width * height * 4) as usize];

    let center = (width as f32 / 2.0, height as f32 / 2.0);
    let radius = width as f32 / 2.0 - 2.0;

    let mut put = |x: i32, y: i32, alpha: u8| {
        if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
            return;
        }
        let idx = (y as u32 * width + x as u32) as usize * 4;
        rgba[idx] = 0;
        rgba[idx + 1] = 0;
        rgba[idx + 2] = 0;
        rgba[idx + 3] = alpha;
    };

    // Disc outline
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let dx = x as f32 - center.0;
            let dy = y as f32 - center.1;
            let dist = (dx * dx + dy * dy).sqrt();
            if (dist - radius).abs() <= 1.5 {
                put(x, y, 255);
            }
        }
    }

    // Check mark: short stroke down-right, long stroke up-right.
    for step in 0..=6 {
        let x = 9 + step;
        let y = 16 + step;
        put(x, y, 255);
        put(x, y + 1, 255);
        put(x + 1, y, 255);
    }
    for step in 0..=9 {
        let x = 15 + step;
        let y = 22 - step;
        put(x, y, 255);
        put(x, y + 1, 255);
        put(x + 1, y, 255);
    }

    (rgba, width, height)
}
