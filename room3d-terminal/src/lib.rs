//! Terminal front end for the room: input handling and the frame loop

use anyhow::Context;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use room3d_core::{Axis, Command, Direction, FrameStats, Scene, SceneState, TextureFlags};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod cli;
pub mod renderer;

pub use cli::CliArgs;
pub use renderer::AsciiRenderer;

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Scene(Command),
    ToggleTextures,
    Quit,
}

/// Key bindings: arrows turn the room about x and y, q/e roll it,
/// a/d tilt the tank and space moves the seats.
pub fn action_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    use Direction::{Negative, Positive};

    let action = match code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Down => Action::Scene(Command::Rotate(Axis::X, Positive)),
        KeyCode::Up => Action::Scene(Command::Rotate(Axis::X, Negative)),
        KeyCode::Right => Action::Scene(Command::Rotate(Axis::Y, Positive)),
        KeyCode::Left => Action::Scene(Command::Rotate(Axis::Y, Negative)),
        KeyCode::Char('e') => Action::Scene(Command::Rotate(Axis::Z, Negative)),
        KeyCode::Char('q') => Action::Scene(Command::Rotate(Axis::Z, Positive)),
        KeyCode::Char('d') => Action::Scene(Command::Tilt(Negative)),
        KeyCode::Char('a') => Action::Scene(Command::Tilt(Positive)),
        KeyCode::Char(' ') => Action::Scene(Command::Animate),
        KeyCode::Char('t') => Action::ToggleTextures,
        _ => return None,
    };
    Some(action)
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    state: SceneState,
    renderer: AsciiRenderer,
    target_fps: u32,
    running: bool,
    dirty: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(scene, target_fps, width as usize, height as usize))
    }

    /// Build an app for a screen of the given size without touching the terminal
    pub fn with_size(scene: Scene, target_fps: u32, width: usize, height: usize) -> Self {
        let mut renderer = AsciiRenderer::new(width, height);
        renderer.upload(&scene.geometry().buffers);

        Self {
            scene,
            state: SceneState::new(),
            renderer,
            target_fps: target_fps.max(1),
            running: true,
            dirty: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn set_textures(&mut self, textures: TextureFlags) {
        self.state.textures = textures;
        self.dirty = true;
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.target_fps));

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // only redraw after something changed
            if self.dirty {
                self.render()?;
                self.dirty = false;
                self.frame_count += 1;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => {
                if let Some(action) = action_for_key(code, modifiers) {
                    self.perform(action);
                }
            }
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                self.renderer.resize(width as usize, height as usize);
                self.dirty = true;
            }
            _ => {}
        }
    }

    /// Apply an action; returns whether a redraw is needed.
    pub fn perform(&mut self, action: Action) -> bool {
        let changed = match action {
            Action::Quit => {
                self.running = false;
                false
            }
            Action::ToggleTextures => {
                self.state.textures = if self.state.textures == TextureFlags::all_ready() {
                    TextureFlags::default()
                } else {
                    TextureFlags::all_ready()
                };
                true
            }
            Action::Scene(command) => self.state.apply(command, self.scene.config()),
        };
        self.dirty |= changed;
        changed
    }

    /// Rasterize the current state into the renderer's buffers
    fn draw_scene(&mut self) -> anyhow::Result<FrameStats> {
        self.renderer.clear();
        self.scene
            .draw_frame(&self.state, &mut self.renderer)
            .context("frame traversal failed")
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let stats = self.draw_scene()?;

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.present(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "room3d | FPS: {:.1} | draws: {} | tilt: {} | Arrows/Q/E=Turn A/D=Tilt Space=Seats T=Textures Esc=Quit",
                self.fps, stats.draw_calls, self.state.tank_tilt
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Log the scene setup once before taking over the screen
pub fn describe(scene: &Scene) {
    let geometry = scene.geometry();
    info!(
        shapes = geometry.directory.len(),
        vertices = geometry.buffers.vertex_count(),
        triangles = geometry.buffers.triangle_count(),
        "room geometry registered"
    );
}
