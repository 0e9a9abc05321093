use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use anyhow::Result;
use memspan_core::TaskView;
use memspan_render::TextSurface;
use memspan_task::KeyInput;
use pixels::{Pixels, SurfaceTexture};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::session;

const WINDOW_WIDTH: u32 = 1400;
const WINDOW_HEIGHT: u32 = 800;

const INSTRUCTIONS: &[&str] = &[
    "Welcome to the short-term memory task.",
    "Each trial shows a set of numbers, one above the other.",
    "Memorize them while they are on screen.",
    "After a blank delay a single probe number appears.",
    "Press '.' if the probe was in the set, ',' if it was not.",
    "Press SPACE to begin or ESC to quit.",
];

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    surface: Option<TextSurface>,
    current_view: TaskView,
    view_rx: Option<Receiver<TaskView>>,
    key_tx: Option<Sender<KeyInput>>,
    worker: Option<JoinHandle<()>>,
    started: bool,
    should_exit: bool,
}

impl App {
    pub fn new() -> Result<Self> {
        let instructions = INSTRUCTIONS.iter().map(|s| s.to_string()).collect();
        Ok(Self {
            window: None,
            pixels: None,
            surface: None,
            current_view: TaskView::Instructions(instructions),
            view_rx: None,
            key_tx: None,
            worker: None,
            started: false,
            should_exit: false,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        println!("=== SHORT-TERM MEMORY TASK ===");
        println!("Platform: {}", std::env::consts::OS);
        println!("Press SPACE to start or ESC to exit.\n");

        event_loop.run_app(&mut self)?;

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        Ok(())
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Memory Span")
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();

        println!(
            "Display Configuration: {}×{} (scale {:.2})",
            physical_size.width,
            physical_size.height,
            window.scale_factor()
        );

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        self.pixels = Some(Pixels::new(
            physical_size.width,
            physical_size.height,
            surface_texture,
        )?);
        self.surface = Some(TextSurface::new(physical_size.width, physical_size.height)?);

        window.request_redraw();
        self.window = Some(window);

        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        if let Some(rx) = &self.view_rx {
            while let Ok(view) = rx.try_recv() {
                self.current_view = view;
            }
        }

        let pixels = self.pixels.as_mut().unwrap();
        let surface = self.surface.as_mut().unwrap();
        surface.draw_view(&self.current_view);
        surface.blit(pixels.frame_mut());
        pixels.render()?;

        if let Some(window) = &self.window {
            window.request_redraw();
        }
        Ok(())
    }

    fn start_session(&mut self) {
        let (view_tx, view_rx) = mpsc::channel();
        let (key_tx, key_rx) = mpsc::channel();
        self.view_rx = Some(view_rx);
        self.key_tx = Some(key_tx);
        self.started = true;

        self.worker = Some(std::thread::spawn(move || {
            if let Err(e) = session::run_session(view_tx, key_rx) {
                eprintln!("Session failed: {e:#}");
            }
        }));
    }

    fn handle_input(&mut self, key: winit::keyboard::PhysicalKey, event_loop: &ActiveEventLoop) {
        use winit::keyboard::{KeyCode, PhysicalKey};
        if let PhysicalKey::Code(k) = key {
            match k {
                KeyCode::Space => {
                    if !self.started {
                        self.start_session();
                    }
                }
                KeyCode::Period => self.forward(KeyInput::Affirm),
                KeyCode::Comma => self.forward(KeyInput::Deny),
                KeyCode::Escape => {
                    self.forward(KeyInput::Quit);
                    self.cleanup_and_exit(event_loop);
                }
                _ => {}
            }
        }
    }

    fn forward(&self, key: KeyInput) {
        if let Some(tx) = &self.key_tx {
            let _ = tx.send(key);
        }
    }

    fn handle_resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                eprintln!("Failed to resize surface: {}", e);
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                eprintln!("Failed to resize buffer: {}", e);
            }
        }
        if let Some(surface) = &mut self.surface {
            if let Err(e) = surface.resize(new_size.width, new_size.height) {
                eprintln!("Failed to resize canvas: {}", e);
            }
        }
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        println!("\nTask window closed. Thank you!");
        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                eprintln!("Failed to create window and surface: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.forward(KeyInput::Quit);
                self.cleanup_and_exit(event_loop);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    eprintln!("Render failed: {e:#}");
                    event_loop.exit();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                self.handle_input(event.physical_key, event_loop);
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}
