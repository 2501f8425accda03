mod app;
mod braille;
mod burst;
mod color;
mod config;
mod export;
mod input;
mod particle;
mod presets;
mod settings;
mod simulation;
mod surface;
mod ui;

use app::App;
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use presets::PresetManager;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "fireworks-sim")]
#[command(about = "Interactive fireworks particle simulation in the terminal")]
struct Args {
    // === Profile ===
    /// Preset to start from (garden, finale, "quiet night", storm, or a saved preset)
    #[arg(long, default_value = "garden")]
    preset: String,

    /// Load a full configuration exported with E (overrides --preset)
    #[arg(long)]
    config: Option<PathBuf>,

    // === Burst Parameters ===
    /// Particles per burst (10-400)
    #[arg(short = 'p', long)]
    particles: Option<usize>,

    /// Downward acceleration of burst particles (0.0-1.0)
    #[arg(long)]
    gravity: Option<f32>,

    /// Per-frame velocity damping of burst particles (0.80-0.999)
    #[arg(long)]
    damping: Option<f32>,

    /// Draw a soft glow under burst particles
    #[arg(long)]
    glow: bool,

    // === Spawn Policy ===
    /// Per-frame chance of a random burst (0.0-1.0)
    #[arg(long = "spawn-probability")]
    spawn_probability: Option<f32>,

    /// Maximum live bursts for random launches (1-50)
    #[arg(long = "spawn-cap")]
    spawn_cap: Option<usize>,

    /// Disable random launches (bursts only on click)
    #[arg(long = "no-auto")]
    no_auto: bool,

    // === Runtime ===
    /// Frames per second (10-120)
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Seed the random generator for a reproducible show
    #[arg(long)]
    seed: Option<u64>,

    /// Write diagnostic logs to this file
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

/// Restores the terminal when dropped, including on early return or panic unwind
struct TerminalSession;

impl TerminalSession {
    fn start() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen, crossterm::cursor::Show);
    }
}

fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

/// Resolve the starting configuration from --config / --preset and overrides
fn build_config(args: &Args, presets: &PresetManager) -> Result<AppConfig, String> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => {
            let preset = presets
                .find(&args.preset)
                .ok_or_else(|| format!("Unknown preset '{}'. Available: {}", args.preset, presets.preset_names().join(", ")))?;
            AppConfig {
                preset: preset.name.clone(),
                settings: preset.settings.clone(),
                opening_salvo: preset.opening_salvo,
                ..Default::default()
            }
        }
    };

    let settings = &mut config.settings;
    if let Some(particles) = args.particles {
        settings.burst_particles = particles.clamp(10, 400);
    }
    if let Some(gravity) = args.gravity {
        settings.burst_gravity = gravity.clamp(0.0, 1.0);
    }
    if let Some(damping) = args.damping {
        settings.burst_damping = damping.clamp(0.80, 0.999);
    }
    if args.glow {
        settings.glow = true;
    }
    if let Some(p) = args.spawn_probability {
        settings.spawn_probability = p.clamp(0.0, 1.0);
    }
    if let Some(cap) = args.spawn_cap {
        settings.spawn_cap = cap.clamp(1, 50);
    }
    if args.no_auto {
        settings.auto_launch = false;
    }
    if args.config.is_none() {
        config.fps = args.fps.clamp(10, 120);
    }

    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let presets = PresetManager::new();
    let config = build_config(&args, &presets)?;
    info!(preset = %config.preset, fps = config.fps, seed = ?args.seed, "starting");

    // Setup terminal
    let session = TerminalSession::start()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let frame_rect = Rect::new(0, 0, size.width, size.height);
    let (canvas_width, canvas_height) = ui::get_canvas_size(frame_rect, false);
    let mut app = App::new(canvas_width, canvas_height, config, presets, args.seed);

    let res = run_app(&mut terminal, &mut app);

    // Stop the show before restoring the terminal
    drop(app);
    drop(session);

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    let frame_duration = Duration::from_micros(1_000_000 / app.fps.max(1) as u64);
    let mut next_frame = Instant::now();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Apply input until the next frame is due
        loop {
            let timeout = next_frame.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
                        KeyCode::Char('a') | KeyCode::Char('A') => app.toggle_auto_launch(),
                        KeyCode::Char('m') | KeyCode::Char('M') => app.launch_barrage(),
                        KeyCode::Char('l') | KeyCode::Char('L') => app.toggle_glow(),
                        KeyCode::Char('p') | KeyCode::Char('P') => app.cycle_preset(),
                        KeyCode::Char('s') | KeyCode::Char('S') => app.snapshot(),
                        KeyCode::Char('g') | KeyCode::Char('G') => app.toggle_recording(),
                        KeyCode::Char('w') | KeyCode::Char('W') => app.save_user_preset(),
                        KeyCode::Char('e') | KeyCode::Char('E') => {
                            let path = export::timestamped_path("fireworks-config", "json");
                            app.export_config(&path);
                        }
                        KeyCode::Char('v') | KeyCode::Char('V') => {
                            app.toggle_fullscreen();
                            let size = terminal.size()?;
                            let (w, h) = ui::get_canvas_size(Rect::new(0, 0, size.width, size.height), app.fullscreen_mode);
                            app.resize(w, h);
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                        KeyCode::Char('j') | KeyCode::Char('J') if app.show_help => {
                            app.scroll_help_down(ui::HELP_CONTENT_LINES);
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') if app.show_help => app.scroll_help_up(),
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up => app.adjust_focused(true),
                        KeyCode::Down => app.adjust_focused(false),
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else {
                                app.focus = app::Focus::None;
                            }
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let area = ui::get_canvas_area(Rect::new(0, 0, size.width, size.height), app.fullscreen_mode);
                    let response = app.handle_mouse(&mouse, area);
                    // Mouse capture already keeps the terminal from scrolling or selecting
                    if response.prevent_default {
                        debug!(launched = response.launched, "pointer event consumed");
                    }
                }
                Event::Resize(width, height) => {
                    let (canvas_width, canvas_height) =
                        ui::get_canvas_size(Rect::new(0, 0, width, height), app.fullscreen_mode);
                    app.resize(canvas_width, canvas_height);
                }
                _ => {}
            }
        }

        app.tick();

        // Display-driven cadence; never try to catch up on missed frames
        next_frame += frame_duration;
        let now = Instant::now();
        if next_frame < now {
            next_frame = now;
        }
    }
}
