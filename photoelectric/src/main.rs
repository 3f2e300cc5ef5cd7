//! Photoelectric Effect Visualization
//!
//! Light from a lamp strikes a metal plate; electrons that gain more energy
//! than the work function drift across to the collector and register on the
//! ammeter. Charts record kinetic energy and current as the wavelength is
//! swept.
//!
//! Usage: `photoelectric [config.toml]`
//!
//! Controls:
//! - Space: Pause/resume
//! - R: Reset to the configured initial state
//! - S: Save chart series
//! - Escape: Quit

use std::path::PathBuf;

use common::{Camera2D, GraphicsContext};
use photoelectric::apparatus::{self, world_bounds};
use photoelectric::config::AppConfig;
use photoelectric::equations_ui::{draw_equations_sidebar, PHOTOELECTRIC_EQUATIONS, PHOTOELECTRIC_VARIABLES};
use photoelectric::params::{INTENSITY_RANGE_PERCENT, WAVELENGTH_RANGE_NM};
use photoelectric::plots::{self, ChartTab};
use photoelectric::renderer::ApparatusRenderer;
use photoelectric::{Session, TargetMaterial};
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

const MAX_ELECTRONS: usize = 512;
const MAX_LINES: usize = 128;
const SCENE_MARGIN: f32 = 20.0;

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Widget state that lives across frames
struct UiState {
    tab: ChartTab,
    wavelength_input: i64,
    intensity_input: i64,
    /// Pointer was held on the intensity slider last frame
    intensity_held: bool,
}

/// True on the frame a press lands, whether it becomes a drag or a click
fn press_started(was_held: bool, is_held: bool) -> bool {
    is_held && !was_held
}

struct App {
    ctx: GraphicsContext,
    renderer: ApparatusRenderer,
    session: Session,
    camera: Camera2D,
    paused: bool,
    ui: UiState,
    egui: EguiState,
}

impl App {
    fn new(ctx: GraphicsContext, session: Session) -> Self {
        let renderer = ApparatusRenderer::new(&ctx, MAX_ELECTRONS, MAX_LINES);
        let mut camera = Camera2D::new(ctx.aspect_ratio());
        let (min, max) = world_bounds();
        camera.frame(min, max, SCENE_MARGIN);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        let ui = UiState {
            tab: ChartTab::KeVsWavelength,
            wavelength_input: session.params().wavelength_nm() as i64,
            intensity_input: session.params().intensity_percent() as i64,
            intensity_held: false,
        };

        Self {
            ctx,
            renderer,
            session,
            camera,
            paused: false,
            ui,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
        let (min, max) = world_bounds();
        self.camera.frame(min, max, SCENE_MARGIN);
    }

    fn update(&mut self, dt: f32) {
        if !self.paused {
            self.session.advance(dt);
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        let lines = apparatus::apparatus_lines(self.session.params(), self.session.readout().photocurrent_amps);
        self.renderer.update_lines(&self.ctx.queue, &lines);
        let points = apparatus::electron_points(self.session.simulator());
        self.renderer.update_points(&self.ctx.queue, &points);

        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let egui_ctx = self.egui.ctx.clone();
        let full_output = egui_ctx.run(raw_input, |ctx| {
            draw_ui(ctx, &mut self.session, &mut self.ui, self.paused);
        });

        self.egui.state.handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self.egui.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui.renderer.update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        self.renderer.render(&mut encoder, &view);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Returns true when the app should quit
    fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        if state != ElementState::Pressed {
            return false;
        }

        match key {
            KeyCode::Space => {
                self.paused = !self.paused;
                log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
            }
            KeyCode::KeyR => match self.session.reset() {
                Ok(()) => {
                    self.ui.wavelength_input = self.session.params().wavelength_nm() as i64;
                    self.ui.intensity_input = self.session.params().intensity_percent() as i64;
                }
                Err(e) => log::error!("Reset failed: {}", e),
            },
            KeyCode::KeyS => self.session.save_series(),
            KeyCode::Escape => return true,
            _ => {}
        }
        false
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

fn draw_ui(ctx: &egui::Context, session: &mut Session, ui_state: &mut UiState, paused: bool) {
    draw_equations_sidebar(
        ctx,
        "Photoelectric Effect",
        PHOTOELECTRIC_EQUATIONS,
        PHOTOELECTRIC_VARIABLES,
        session.params(),
    );

    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        let readout = session.readout();
        ui.horizontal(|ui| {
            ui.label(format!("Ammeter: {:.4e} A", readout.photocurrent_amps));
            ui.separator();
            ui.label(format!("Electrons: {}", session.simulator().live_electrons().len()));
            ui.separator();
            ui.label(format!("Tick: {}", session.simulator().current_tick()));
            if paused {
                ui.label(egui::RichText::new("PAUSED").color(egui::Color32::YELLOW));
            }
        });
    });

    egui::SidePanel::left("controls").min_width(230.0).show(ctx, |ui| {
        ui.heading("Controls");
        ui.separator();

        // Sliders edit the cached inputs; the session clamps and records
        ui_state.wavelength_input = session.params().wavelength_nm() as i64;
        ui_state.intensity_input = session.params().intensity_percent() as i64;

        ui.label("Wavelength (nm)");
        ui.horizontal(|ui| {
            let range = *WAVELENGTH_RANGE_NM.start() as i64..=*WAVELENGTH_RANGE_NM.end() as i64;
            let slider = ui.add(egui::Slider::new(&mut ui_state.wavelength_input, range.clone()).show_value(false));
            let field = ui.add(egui::DragValue::new(&mut ui_state.wavelength_input).clamp_range(range));
            if slider.changed() || field.changed() {
                session.set_wavelength(ui_state.wavelength_input);
            }
        });

        ui.label("Intensity (%)");
        ui.horizontal(|ui| {
            let range = *INTENSITY_RANGE_PERCENT.start() as i64..=*INTENSITY_RANGE_PERCENT.end() as i64;
            let slider = ui.add(egui::Slider::new(&mut ui_state.intensity_input, range.clone()).show_value(false));
            let held = slider.is_pointer_button_down_on();
            if press_started(ui_state.intensity_held, held) {
                // Start a fresh curve for the new intensity
                session.wipe_series();
            }
            ui_state.intensity_held = held;
            let field = ui.add(egui::DragValue::new(&mut ui_state.intensity_input).clamp_range(range));
            if slider.changed() || field.changed() {
                session.set_intensity(ui_state.intensity_input);
            }
        });

        ui.label("Target");
        let mut selected = session.params().material();
        egui::ComboBox::from_id_source("target_material")
            .selected_text(selected.name())
            .show_ui(ui, |ui| {
                for material in TargetMaterial::ALL {
                    ui.selectable_value(&mut selected, material, material.name());
                }
            });
        if selected != session.params().material() {
            session.select_material(selected);
        }

        ui.separator();
        let readout = session.readout();
        ui.label(format!("Kinetic energy: {:.3} eV", readout.kinetic_energy_ev));
        ui.label(format!("Current: {:.4e} A", readout.photocurrent_amps));

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                session.save_series();
            }
            if ui.button("Clear").clicked() {
                session.wipe_series();
            }
        });
    });

    egui::TopBottomPanel::bottom("charts")
        .resizable(true)
        .default_height(260.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in ChartTab::ALL {
                    ui.selectable_value(&mut ui_state.tab, tab, tab.label());
                }
            });
            ui.separator();
            plots::draw_chart(ui, ui_state.tab, session);
        });
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match AppConfig::load_or_default(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let (width, height) = (config.window.width, config.window.height);
    let title = config.window.title.clone();
    let session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to start session: {}", e);
            std::process::exit(1);
        }
    };

    let (ctx, event_loop) = match pollster::block_on(GraphicsContext::new(&title, width, height)) {
        Ok(pair) => pair,
        Err(e) => {
            log::error!("Failed to initialise graphics: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(ctx, session);
    let mut last_time = std::time::Instant::now();

    let result = event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                if !consumed {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(size) => app.resize(*size),
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key),
                                    state,
                                    ..
                                },
                            ..
                        } => {
                            if app.handle_key(*key, *state) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - last_time).as_secs_f32().min(0.1);
                            last_time = now;

                            app.update(dt);
                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    log::error!("Out of GPU memory");
                                    elwt.exit();
                                }
                                Err(e) => log::warn!("Render error: {:?}", e),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    });

    if let Err(e) = result {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_started_fires_once_per_press() {
        let frames = [false, true, true, true, false, true, false];
        let presses = frames
            .windows(2)
            .filter(|w| press_started(w[0], w[1]))
            .count();
        assert_eq!(presses, 2);
        // A click that never drags still counts
        assert!(press_started(false, true));
        assert!(!press_started(true, false));
    }
}
