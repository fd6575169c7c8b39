//! Airwolf -- helicopter sprite demo and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Window events are
//! translated into `InputEvent`s and queued; all simulation runs inside
//! `RedrawRequested` through `FixedStepLoop`:
//!
//!   1. drain queued input, feed wall-clock time into the accumulator
//!   2. run whole 1/60 s steps (animation, then movement)
//!   3. push the new sprite frame, position and engine pitch out
//!   4. draw the sprite, then the egui text on top, and present (vsync)
//!
//! Missing assets are logged and replaced by blanks: a transparent sprite, the
//! default font, a silent engine.
//!
//! `airwolf --replay <file.json>` skips the window and runs a recorded input
//! timeline through the same fixed-step loop, logging where the helicopter
//! ended up.

mod sprite;

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use aw_audio::{Sound, SoundBuffer};
use aw_core::assets::{
    load_or_report, read_asset, AssetKind, AssetLoadError, FONT_PATH, HELICOPTER_SOUND_PATH,
    HELICOPTER_TEXTURE_PATH,
};
use aw_core::game_loop::FixedStepLoop;
use aw_core::input::{InputEvent, Key, MouseBtn};
use aw_core::replay::load_replay_from_path;
use aw_core::world::World;
use aw_overlay::font::load_font;
use aw_overlay::Overlay;
use aw_platform::window::PlatformConfig;
use aw_render::vertex::QUAD_INDICES;
use aw_render::{Camera2D, GpuContext, SpritePipeline, Texture};
use sprite::HelicopterSprite;

const CLEAR_COLOR: wgpu::Color = wgpu::Color::WHITE;

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable demo state. Constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface are available.
struct DemoState {
    window: Arc<Window>,
    gpu: GpuContext,
    camera: Camera2D,
    sprite_pipeline: SpritePipeline,
    overlay: Overlay,

    game: FixedStepLoop,
    world: World,
    events: VecDeque<InputEvent>,
    cursor_position: (f64, f64),

    sprite: HelicopterSprite,
    sheet: GpuSpriteTexture,
    sound: Sound,
    applied_pitch: f32,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

impl DemoState {
    fn new(window: Arc<Window>, config: &PlatformConfig) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone()).map_err(|e| e.to_string())?;
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);

        let font = load_or_report(load_font(Path::new(FONT_PATH)));
        let overlay = Overlay::new(&gpu.device, gpu.surface_format, &window, font);

        let world = World::default();
        let sheet = load_sprite_sheet(&gpu, &sprite_pipeline);
        let sound = setup_audio(world.helicopter.audio_pitch());
        let applied_pitch = sound.pitch();

        // The world view stays at the configured size and is stretched to the window.
        let camera = Camera2D::new(config.width, config.height);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);

        let sprite = HelicopterSprite::new(&world.helicopter);
        let vertices = sprite.vertices((sheet.texture.width, sheet.texture.height));
        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Index Buffer"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            });

        Ok(Self {
            window,
            gpu,
            camera,
            sprite_pipeline,
            overlay,
            game: FixedStepLoop::new(),
            world,
            events: VecDeque::new(),
            cursor_position: (0.0, 0.0),
            sprite,
            sheet,
            sound,
            applied_pitch,
            vertex_buffer,
            index_buffer,
            camera_bind_group,
        })
    }

    /// One outer loop iteration. Returns false once the loop has stopped.
    fn redraw(&mut self) -> bool {
        let report = self
            .game
            .run_frame_realtime(&mut self.events, &mut self.world);
        if report.overlay_toggles % 2 == 1 {
            self.overlay.toggle_debug();
        }
        if report.exit {
            return false;
        }

        // Sprite-sheet rect only changes when the animation signalled a new frame.
        let mut sprite_dirty = false;
        if let Some(frame) = report.frame_changed {
            self.sprite.set_frame(frame);
            sprite_dirty = true;
        }
        sprite_dirty |= self.sprite.sync(&self.world.helicopter);
        if sprite_dirty {
            let vertices = self
                .sprite
                .vertices((self.sheet.texture.width, self.sheet.texture.height));
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }

        let pitch = self.world.helicopter.audio_pitch();
        if pitch != self.applied_pitch {
            self.sound.set_pitch(pitch);
            self.applied_pitch = pitch;
            log::debug!("Engine pitch {pitch}");
        }

        self.render();
        true
    }

    fn render(&mut self) {
        if !self.gpu.is_renderable() {
            return;
        }
        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let (egui_primitives, egui_textures_delta) = self.overlay.prepare(
            &self.window,
            &self.game.time,
            &self.world.helicopter,
            self.sound.has_output(),
        );
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_bind_group(1, &self.sheet.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
        }

        self.overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    config: PlatformConfig,
    state: Option<DemoState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = match aw_platform::window::create_window(event_loop, &self.config) {
            Ok(window) => window,
            Err(err) => {
                log::error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        match DemoState::new(window, &self.config) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("Failed to initialise renderer: {err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.overlay.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                state.events.push_back(InputEvent::Closed);
            }

            WindowEvent::Resized(physical_size) => {
                state.gpu.resize(physical_size.width, physical_size.height);
                log::info!(
                    "Resized to {}x{}",
                    physical_size.width,
                    physical_size.height
                );
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if let Some(key) = map_key(key_code) {
                            state.events.push_back(InputEvent::KeyPressed(key));
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.cursor_position = (position.x, position.y);
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } if !egui_consumed => {
                if let Some(button) = map_mouse(button) {
                    let position = state
                        .camera
                        .screen_to_world(state.cursor_position, state.gpu.size);
                    state
                        .events
                        .push_back(InputEvent::MousePressed { button, position });
                }
            }

            WindowEvent::RedrawRequested => {
                if !state.redraw() {
                    log::info!("Exiting");
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

fn load_sprite_sheet(gpu: &GpuContext, pipeline: &SpritePipeline) -> GpuSpriteTexture {
    let path = Path::new(HELICOPTER_TEXTURE_PATH);
    let loaded = read_asset(AssetKind::Texture, path).and_then(|bytes| {
        Texture::from_bytes(&gpu.device, &gpu.queue, &bytes, HELICOPTER_TEXTURE_PATH)
            .map_err(|e| AssetLoadError::new(AssetKind::Texture, path, e))
    });
    let texture = match load_or_report(loaded) {
        Some(texture) => {
            log::info!(
                "Loaded sprite sheet {}x{}",
                texture.width,
                texture.height
            );
            texture
        }
        None => Texture::blank(&gpu.device, &gpu.queue),
    };
    let bind_group = pipeline.create_texture_bind_group(&gpu.device, &texture);
    GpuSpriteTexture {
        texture,
        bind_group,
    }
}

/// Start the looping engine sound at `pitch`, with or without a buffer.
fn setup_audio(pitch: f32) -> Sound {
    let sound = Sound::new();
    let buffer = SoundBuffer::from_file(HELICOPTER_SOUND_PATH)
        .map_err(|e| AssetLoadError::new(AssetKind::Audio, HELICOPTER_SOUND_PATH, e));
    if let Some(buffer) = load_or_report(buffer) {
        sound.set_buffer(buffer);
    }
    sound.set_loop(true);
    sound.set_pitch(pitch);
    sound.play();
    sound
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn map_mouse(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

fn replay_arg(args: &[String]) -> Option<&str> {
    args.windows(2)
        .find(|pair| pair[0] == "--replay")
        .map(|pair| pair[1].as_str())
}

fn run_replay(path: &Path) -> Result<(), String> {
    let replay = load_replay_from_path(path)?;
    let mut world = World::default();
    let summary = replay.run(&mut world);
    let heli = &world.helicopter;
    log::info!(
        "Replay {}: {} steps, {} arrivals, exited: {}",
        path.display(),
        summary.steps,
        summary.arrivals,
        summary.exited
    );
    log::info!(
        "Final location ({:.1}, {:.1}), heading {}, frame {}",
        heli.location.x,
        heli.location.y,
        heli.facing().label(),
        heli.animation.frame_index()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if let Some(path) = replay_arg(&args) {
        if let Err(err) = run_replay(Path::new(path)) {
            log::error!("{err}");
            std::process::exit(1);
        }
        return;
    }

    log::info!("Airwolf starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
