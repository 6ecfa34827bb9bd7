// main.rs: window shell, input routing and HUD for the sphere viewer

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // 在 Release 模式下隐藏控制台窗口

use sphere_video::input::{PointerEvent, PointerKind, TouchController};
use sphere_video::renderer::FrameStats;
use sphere_video::{MediaSource, Orientation, RenderError, RenderSettings, SphereRenderer, VideoPlayer, VideoSurface, ViewerConfig};

use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoopBuilder},
    window::{Fullscreen, WindowBuilder},
};

const MEDIA_EXTENSIONS: &[&str] = &["gif", "png", "jpg", "jpeg", "bmp", "webp"];

#[derive(Debug, Clone, Copy)]
enum UserEvent {
    FrameAvailable,
}

/// HUD snapshot taken before a frame, so the UI closure borrows nothing from the renderer.
struct HudInfo {
    media: Option<String>,
    stats: FrameStats,
    orientation: Orientation,
}

#[derive(Default)]
struct HudActions {
    open_media: bool,
    reset_view: bool,
    toggle_fullscreen: bool,
    exit: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::load();
    info!("Viewer config: {:?}", config);

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let window = match WindowBuilder::new()
        .with_title("Sphere Video")
        .with_inner_size(LogicalSize::new(1280, 720))
        .build(&event_loop)
    {
        Ok(window) => Arc::new(window),
        Err(e) => {
            error!("Cannot create window: {}", e);
            std::process::exit(1);
        }
    };

    // 解码线程发布新帧后唤醒事件循环
    let surface = Arc::new(VideoSurface::new());
    let proxy = event_loop.create_proxy();
    surface.set_frame_listener(move || {
        // the loop is gone once the window closes
        let _ = proxy.send_event(UserEvent::FrameAvailable);
    });

    let mut renderer = SphereRenderer::new(RenderSettings::from(&config), Arc::clone(&surface));
    let mut touch = TouchController::new(config.touch_sensitivity, config.split_fraction());

    let mut player = VideoPlayer::new(Arc::clone(&surface), config.looping);
    if let Some(source) = config.media_source() {
        player.set_media_source(source);
        player.prepare_and_start();
    } else {
        info!("No video configured; press O or drop a file on the window");
    }

    let mut show_hud = config.show_hud;
    let mut is_fullscreen = false;
    let mut mouse_pressed = false;
    let mut cursor = PhysicalPosition::new(0.0, 0.0);
    let mut active_touch: Option<u64> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::Resumed => {
                if let Err(e) = renderer.on_init(Arc::clone(&window)) {
                    error!("Renderer init failed: {}", e);
                    if e.is_fatal() {
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                }
                window.request_redraw();
            }

            Event::Suspended => {
                renderer.on_release();
            }

            Event::UserEvent(UserEvent::FrameAvailable) => {
                window.request_redraw();
            }

            Event::WindowEvent { event, .. } => {
                // 先让 egui 处理事件
                let response = renderer.handle_window_event(&event);
                if response.repaint {
                    window.request_redraw();
                }
                if response.consumed {
                    return;
                }

                let pointer = match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                        None
                    }

                    WindowEvent::Resized(size) => {
                        renderer.on_resize(size.width, size.height);
                        window.request_redraw();
                        None
                    }

                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        renderer.on_resize(new_inner_size.width, new_inner_size.height);
                        window.request_redraw();
                        None
                    }

                    // 键盘快捷键
                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.state == ElementState::Pressed {
                            match input.virtual_keycode {
                                Some(VirtualKeyCode::O) => {
                                    if let Some(path) = pick_media_file() {
                                        open_media(&mut player, path);
                                    }
                                }
                                Some(VirtualKeyCode::F1) => {
                                    show_hud = !show_hud;
                                    window.request_redraw();
                                }
                                Some(VirtualKeyCode::F11) => {
                                    is_fullscreen = toggle_fullscreen(&window, is_fullscreen);
                                }
                                Some(VirtualKeyCode::R) => {
                                    *renderer.orientation_mut() = Orientation::default();
                                    window.request_redraw();
                                }
                                _ => {}
                            }
                        }
                        None
                    }

                    // 鼠标交互
                    WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                        mouse_pressed = state == ElementState::Pressed;
                        let kind = if mouse_pressed { PointerKind::Down } else { PointerKind::Up };
                        Some(PointerEvent::new(kind, cursor.x as f32, cursor.y as f32))
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = position;
                        mouse_pressed.then(|| PointerEvent::new(PointerKind::Move, position.x as f32, position.y as f32))
                    }

                    // only the first finger down steers
                    WindowEvent::Touch(Touch { phase, location, id, .. }) => {
                        let kind = match phase {
                            TouchPhase::Started if active_touch.is_none() => {
                                active_touch = Some(id);
                                Some(PointerKind::Down)
                            }
                            TouchPhase::Moved if active_touch == Some(id) => Some(PointerKind::Move),
                            TouchPhase::Ended | TouchPhase::Cancelled if active_touch == Some(id) => {
                                active_touch = None;
                                Some(PointerKind::Up)
                            }
                            _ => None,
                        };
                        kind.map(|kind| PointerEvent::new(kind, location.x as f32, location.y as f32))
                    }

                    WindowEvent::DroppedFile(path) => {
                        open_media(&mut player, path);
                        None
                    }

                    _ => None,
                };

                if let Some(pointer) = pointer {
                    let viewport = renderer.viewport_size();
                    if touch.handle(pointer, viewport, renderer.orientation_mut()) {
                        window.request_redraw();
                    }
                }
            }

            Event::RedrawRequested(_) => {
                let info = HudInfo {
                    media: player.source().map(MediaSource::display_name),
                    stats: renderer.stats(),
                    orientation: renderer.orientation(),
                };
                let mut actions = HudActions::default();

                let result = renderer.on_frame(|ctx| {
                    if show_hud {
                        draw_hud(ctx, &info, is_fullscreen, &mut actions);
                    }
                });

                match result {
                    Ok(()) => {}
                    Err(RenderError::Graphics { source: wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated, .. }) => {
                        renderer.reconfigure();
                        window.request_redraw();
                    }
                    Err(RenderError::Graphics { source: wgpu::SurfaceError::OutOfMemory, .. }) => {
                        error!("GPU out of memory");
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => warn!("Render error: {}", e),
                }

                if actions.reset_view {
                    *renderer.orientation_mut() = Orientation::default();
                    window.request_redraw();
                }
                if actions.toggle_fullscreen {
                    is_fullscreen = toggle_fullscreen(&window, is_fullscreen);
                }
                if actions.open_media {
                    if let Some(path) = pick_media_file() {
                        open_media(&mut player, path);
                    }
                }
                if actions.exit {
                    *control_flow = ControlFlow::Exit;
                }
            }

            Event::LoopDestroyed => {
                player.stop();
                renderer.on_release();
            }

            _ => {}
        }
    });
}

fn pick_media_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("360° video", MEDIA_EXTENSIONS)
        .pick_file()
}

fn open_media(player: &mut VideoPlayer, path: PathBuf) {
    player.set_media_source(MediaSource::from_path(path));
    player.prepare_and_start();
}

fn toggle_fullscreen(window: &winit::window::Window, is_fullscreen: bool) -> bool {
    if is_fullscreen {
        window.set_fullscreen(None);
    } else {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    !is_fullscreen
}

fn draw_hud(ctx: &egui::Context, info: &HudInfo, is_fullscreen: bool, actions: &mut HudActions) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open video… (O)").clicked() {
                    actions.open_media = true;
                    ui.close_menu();
                }
                if ui.button("Exit").clicked() {
                    actions.exit = true;
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Reset view (R)").clicked() {
                    actions.reset_view = true;
                    ui.close_menu();
                }
                let label = if is_fullscreen { "Exit fullscreen (F11)" } else { "Fullscreen (F11)" };
                if ui.button(label).clicked() {
                    actions.toggle_fullscreen = true;
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let (yaw, pitch) = info.orientation.display_degrees();
                ui.label(format!("Yaw: {:.1}°  Pitch: {:.1}°", yaw, pitch));
                ui.separator();
                match info.stats.frame_size {
                    Some((w, h)) => ui.label(format!("{}x{}  frames: {}", w, h, info.stats.frames_shown)),
                    None => ui.label("waiting for first frame"),
                };
                ui.separator();
                ui.label(info.media.as_deref().unwrap_or("no media"));
            });
        });
    });
}
