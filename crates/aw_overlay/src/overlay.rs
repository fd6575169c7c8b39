//! On-screen text drawn with egui on top of the sprite pass.
//!
//! The welcome message is always shown. The debug window is toggled with F3.
//! egui needs a split render: `prepare()` runs the UI and tessellates,
//! `upload()` pushes textures and buffers through the encoder, `paint()` draws
//! into a render pass with `forget_lifetime()`, `cleanup()` frees textures.

use aw_core::movement::Helicopter;
use aw_core::time::TimeState;
use winit::window::Window;

use crate::font::{font_definitions, WELCOME_FONT};

pub const WELCOME_TEXT: &str = "Use middle button";
const WELCOME_POS: [f32; 2] = [40.0, 40.0];
const WELCOME_SIZE: f32 = 50.0;

pub struct Overlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub debug_visible: bool,
}

impl Overlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        font_bytes: Option<Vec<u8>>,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        egui_ctx.set_fonts(font_definitions(font_bytes));
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            debug_visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug overlay: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        helicopter: &Helicopter,
        audio_output: bool,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let debug_visible = self.debug_visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::Area::new(egui::Id::new("welcome_message"))
                .fixed_pos(WELCOME_POS)
                .interactable(false)
                .show(ctx, |ui| {
                    let text = egui::RichText::new(WELCOME_TEXT)
                        .font(egui::FontId::new(
                            WELCOME_SIZE,
                            egui::FontFamily::Name(WELCOME_FONT.into()),
                        ))
                        .color(egui::Color32::BLACK);
                    ui.add(egui::Label::new(text).extend());
                });

            if debug_visible {
                egui::Window::new("Debug")
                    .default_pos([10.0, 120.0])
                    .show(ctx, |ui| {
                        ui.label(format!("FPS: {:.1}", time.smoothed_fps));
                        ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
                        ui.label(format!("Steps this frame: {}", time.steps_this_frame));
                        ui.label(format!("Total steps: {}", time.fixed_step_count));
                        ui.label(format!("Banked: {} us", time.accumulator_us()));
                        ui.separator();
                        ui.label(format!("Heading: {}", helicopter.facing().label()));
                        ui.label(format!(
                            "Location: ({:.1}, {:.1})",
                            helicopter.location.x, helicopter.location.y
                        ));
                        ui.label(format!(
                            "Target: ({:.1}, {:.1})",
                            helicopter.target.x, helicopter.target.y
                        ));
                        ui.label(format!(
                            "Velocity: ({:.2}, {:.2})",
                            helicopter.velocity().x,
                            helicopter.velocity().y
                        ));
                        ui.label(format!(
                            "Sprite frame: {} (+{:.2}/step)",
                            helicopter.animation.frame_index(),
                            helicopter.animation.increment
                        ));
                        ui.label(format!(
                            "Pitch: {:.2}{}",
                            helicopter.audio_pitch(),
                            if audio_output { "" } else { " (no output)" }
                        ));
                    });
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
