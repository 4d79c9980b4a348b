//! Terminal host for the xform3d interactive viewer
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use xform3d_core::{DragMode, InputEvent, Interaction, Response, Settings, Viewport};

pub mod events;
pub mod mesh;
pub mod renderer;

pub use mesh::Mesh;
pub use renderer::AsciiRenderer;

const FRAME_BUDGET: Duration = Duration::from_millis(1000 / 30);

const HELP: &str =
    "arrows scale, drag spin, mod+drag move, w/s dolly, a/d look, r reset, q quit";

/// Paces the render loop and keeps a once-per-second frame rate estimate.
#[derive(Debug)]
pub struct FrameClock {
    window_start: Instant,
    frames_in_window: u32,
    fps: f32,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames_in_window: 0,
            fps: 0.0,
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Records a finished frame at `now` and returns how long to sleep to
    /// stay inside the frame budget.
    pub fn tick(&mut self, frame_start: Instant, now: Instant) -> Duration {
        self.frames_in_window += 1;
        let window = now.saturating_duration_since(self.window_start);
        if window >= Duration::from_secs(1) {
            self.fps = self.frames_in_window as f32 / window.as_secs_f32();
            self.frames_in_window = 0;
            self.window_start = now;
        }
        FRAME_BUDGET.saturating_sub(now.saturating_duration_since(frame_start))
    }
}

/// Interactive viewer drawing one mesh as ASCII art.
pub struct TerminalApp {
    mesh: Mesh,
    interaction: Interaction,
    renderer: AsciiRenderer,
    clock: FrameClock,
    running: bool,
}

impl TerminalApp {
    /// Builds the app for the current terminal size; the window size in
    /// `settings` is replaced by the terminal's cell grid.
    pub fn new(mesh: Mesh, mut settings: Settings) -> anyhow::Result<Self> {
        let (columns, rows) = terminal::size()?;
        settings.window = Viewport::new(u32::from(columns), u32::from(rows));
        let interaction = Interaction::new(&settings)?;

        Ok(Self {
            mesh,
            interaction,
            renderer: AsciiRenderer::new(usize::from(columns), usize::from(rows)),
            clock: FrameClock::new(Instant::now()),
            running: true,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let outcome = self.event_loop();

        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;
        outcome
    }

    fn event_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Drain pending events before exporting this frame's matrices
            while self.running && event::poll(Duration::ZERO)? {
                let event = event::read()?;
                for input in events::translate(&event) {
                    self.dispatch(input);
                }
            }

            self.present()?;

            let idle = self.clock.tick(frame_start, Instant::now());
            if !idle.is_zero() {
                std::thread::sleep(idle);
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, input: InputEvent) {
        match self.interaction.handle(input) {
            Ok(Response::Quit) => {
                info!("Quit requested");
                self.running = false;
            }
            Ok(response) => debug!(?input, ?response, "Input handled"),
            Err(err) => warn!(error = %err, ?input, "Input rejected, keeping previous state"),
        }
        if let InputEvent::Resize { width, height } = input {
            self.renderer.resize(width as usize, height as usize);
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let model = *self.interaction.transform().model();
        let camera = self.interaction.camera();
        let mvp = camera
            .projection_matrix()
            .multiply(camera.view_matrix())
            .multiply(&model);

        self.renderer.clear();
        self.renderer.render_mesh(&self.mesh, &model, &mvp);

        let mut out = stdout();
        queue!(out, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut out)?;

        let mode = match self.interaction.drag_mode() {
            DragMode::Idle => "idle",
            DragMode::Rotate => "rotate",
            DragMode::Translate => "translate",
        };
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!("xform3d | {:.1} fps | {mode} | {HELP}", self.clock.fps())),
            ResetColor
        )?;
        out.flush()
    }
}
