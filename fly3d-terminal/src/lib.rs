/// Terminal-based first-person viewer for 3D meshes
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use fly3d_core::{Camera, CameraSettings, Mesh, Movement, Perspective, RotationState, Transform};
use nalgebra::Point3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::{AsciiRenderer, FrameTransforms};

/// Viewer configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Width of a terminal cell divided by its height
    pub cell_aspect: f32,
    pub target_fps: u32,
    pub camera: CameraSettings,
    pub start_position: Point3<f32>,
    pub start_yaw: f32,
    pub start_pitch: f32,
    /// Model rotation per second around each axis
    pub spin: RotationState,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_3,
            z_near: 0.1,
            z_far: 100.0,
            cell_aspect: 0.5,
            target_fps: 30,
            camera: CameraSettings::default(),
            start_position: Point3::new(-5.0, 0.0, 0.0),
            start_yaw: 0.0,
            start_pitch: 0.0,
            spin: RotationState::new(0.0, 0.4, 0.0),
        }
    }
}

impl AppConfig {
    /// Projection for a terminal of `columns` x `rows` cells
    pub fn projection(&self, columns: u16, rows: u16) -> io::Result<Perspective> {
        let aspect = columns as f32 * self.cell_aspect / rows.max(1) as f32;
        Perspective::new(aspect, self.fov_y, self.z_near, self.z_far).map_err(io::Error::other)
    }
}

/// Turn requested by one key press, in units of `turn_speed * dt`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurnInput {
    pub yaw: f32,
    pub pitch: f32,
}

/// Everything that changes from frame to frame
#[derive(Debug, Clone)]
pub struct FrameContext {
    pub camera: Camera,
    pub rotation: RotationState,
    pub movement: Movement,
    pub turn: TurnInput,
    pub running: bool,
    pub last_frame: Instant,
    pub delta_time: f32,
    pub frame_count: u32,
    pub fps: f32,
    fps_window_start: Instant,
}

impl FrameContext {
    pub fn new(config: &AppConfig) -> Self {
        let now = Instant::now();
        Self {
            camera: Camera::new(config.start_position, config.start_yaw, config.start_pitch),
            rotation: RotationState::zero(),
            movement: Movement::empty(),
            turn: TurnInput::default(),
            running: true,
            last_frame: now,
            delta_time: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_window_start: now,
        }
    }

    /// Advance the clock and refresh the FPS counter
    pub fn tick(&mut self, now: Instant) {
        self.delta_time = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let window = now - self.fps_window_start;
        if window.as_secs() >= 1 {
            self.fps = self.frame_count as f32 / window.as_secs_f32();
            self.frame_count = 0;
            self.fps_window_start = now;
        }
    }
}

/// Movement flag bound to a key
pub fn movement_for_key(code: KeyCode) -> Option<Movement> {
    match code {
        KeyCode::Char('w') => Some(Movement::FORWARD),
        KeyCode::Char('s') => Some(Movement::BACKWARD),
        KeyCode::Char('a') => Some(Movement::LEFT),
        KeyCode::Char('d') => Some(Movement::RIGHT),
        _ => None,
    }
}

/// Turn bound to a key
pub fn turn_for_key(code: KeyCode) -> Option<TurnInput> {
    match code {
        KeyCode::Left => Some(TurnInput { yaw: -1.0, pitch: 0.0 }),
        KeyCode::Right => Some(TurnInput { yaw: 1.0, pitch: 0.0 }),
        KeyCode::Up => Some(TurnInput { yaw: 0.0, pitch: 1.0 }),
        KeyCode::Down => Some(TurnInput { yaw: 0.0, pitch: -1.0 }),
        _ => None,
    }
}

/// Record one key press into the frame context
pub fn apply_key(context: &mut FrameContext, code: KeyCode) {
    if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
        context.running = false;
    } else if let Some(movement) = movement_for_key(code) {
        context.movement |= movement;
    } else if let Some(turn) = turn_for_key(code) {
        context.turn.yaw += turn.yaw;
        context.turn.pitch += turn.pitch;
    }
}

/// Apply the input gathered this frame, then clear it
pub fn update(context: &mut FrameContext, config: &AppConfig) {
    let dt = context.delta_time;

    context.camera.move_along(context.movement, config.camera.move_speed, dt);
    context.camera.turn(
        context.turn.yaw * config.camera.turn_speed * dt,
        context.turn.pitch * config.camera.turn_speed * dt,
    );
    context.rotation.rotate(
        config.spin.x * dt,
        config.spin.y * dt,
        config.spin.z * dt,
    );

    context.movement = Movement::empty();
    context.turn = TurnInput::default();
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: Mesh,
    config: AppConfig,
    projection: Perspective,
    renderer: AsciiRenderer,
    context: FrameContext,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: AppConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            mesh,
            projection: config.projection(width, height)?,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            context: FrameContext::new(&config),
            config,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_secs(1) / self.config.target_fps.max(1);
        log::info!(
            "viewer started: {} triangles, {}x{} cells",
            self.mesh.triangle_count(),
            self.renderer.width(),
            self.renderer.height()
        );

        while self.context.running {
            let frame_start = Instant::now();
            self.context.tick(frame_start);

            self.handle_input()?;
            update(&mut self.context, &self.config);
            self.render()?;

            // Frame timing
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    ..
                }) => apply_key(&mut self.context, code),
                Event::Resize(width, height) => {
                    log::debug!("terminal resized to {width}x{height}");
                    self.renderer.resize(width as usize, height as usize);
                    self.projection = self.config.projection(width, height)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let model = Transform::rotation_matrix(&self.context.rotation);
        let view = self.context.camera.view_matrix().map_err(io::Error::other)?;
        let frame = FrameTransforms {
            model: &model,
            view: &view,
            projection: &self.projection,
            light_dir: self.context.camera.front(),
        };

        self.renderer.clear();
        self.renderer.render_mesh(&self.mesh, &frame);

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let position = self.context.camera.position;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Fly3D | FPS: {:.1} | pos ({:.1}, {:.1}, {:.1}) | WASD=Move Arrows=Look Q=Quit",
                self.context.fps, position.x, position.y, position.z
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
