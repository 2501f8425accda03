use crate::app::{App, Focus};
use crate::braille;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

// UI color scheme
const BORDER_COLOR: Color = Color::Magenta;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Inner canvas rectangle (excluding borders) for a terminal area
pub fn get_canvas_area(frame_area: Rect, fullscreen: bool) -> Rect {
    let outer = if fullscreen {
        frame_area
    } else {
        let x = frame_area.x + SIDEBAR_WIDTH.min(frame_area.width);
        Rect {
            x,
            y: frame_area.y,
            width: frame_area.width.saturating_sub(SIDEBAR_WIDTH),
            height: frame_area.height,
        }
    };
    Rect {
        x: outer.x + 1,
        y: outer.y + 1,
        width: outer.width.saturating_sub(2),
        height: outer.height.saturating_sub(2),
    }
}

/// Calculate the canvas size (excluding borders)
pub fn get_canvas_size(frame_area: Rect, fullscreen: bool) -> (u16, u16) {
    let area = get_canvas_area(frame_area, fullscreen);
    (area.width, area.height)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Status
            Constraint::Length(9), // Parameters
            Constraint::Min(8),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Fireworks ");
    let stats = app.simulation.stats();
    let settings = &app.simulation.settings;

    let (status_text, status_color) = if app.paused {
        ("PAUSED".to_string(), HIGHLIGHT_COLOR)
    } else if let Some(recorder) = &app.recorder {
        (format!("REC {}", recorder.frame_count()), Color::Red)
    } else {
        ("RUNNING".to_string(), Color::Green)
    };

    let auto = if settings.auto_launch { "Auto: ON" } else { "Auto: OFF" };

    let mut content = vec![
        Line::from(Span::styled(app.preset_name.clone(), Style::default().fg(TEXT_COLOR))),
        Line::from(Span::styled(
            format!("Fireworks: {}", stats.bursts),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("Particles: {}", stats.burst_particles + stats.ambient_particles),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(vec![
            Span::styled(status_text, Style::default().fg(status_color)),
            Span::styled(format!("  {}", auto), Style::default().fg(DIM_TEXT_COLOR)),
        ]),
    ];

    let pending = app.simulation.pending_launches();
    if pending > 0 || app.simulation.pointer_held() {
        let trail = if app.simulation.pointer_held() { "  trail" } else { "" };
        content.push(Line::from(Span::styled(
            format!("Queued: {}{}", pending, trail),
            Style::default().fg(DIM_TEXT_COLOR),
        )));
    }

    if let Some(message) = &app.status_message {
        content.push(Line::from(Span::styled(message.clone(), Style::default().fg(DIM_TEXT_COLOR))));
    }

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let settings = &app.simulation.settings;

    let content = vec![
        make_line(
            "Particles",
            format!("{}", settings.burst_particles),
            app.focus == Focus::Particles,
        ),
        make_line(
            "Chance",
            format!("{:.2}", settings.spawn_probability),
            app.focus == Focus::SpawnChance,
        ),
        make_line("Cap", format!("{}", settings.spawn_cap), app.focus == Focus::SpawnCap),
        make_line(
            "Gravity",
            format!("{:.2}", settings.burst_gravity),
            app.focus == Focus::Gravity,
        ),
        make_line(
            "Damping",
            format!("{:.3}", settings.burst_damping),
            app.focus == Focus::Damping,
        ),
        make_line("Fade", format!("{:.2}", settings.fade_alpha), app.focus == Focus::Fade),
        Line::from(Span::styled(
            format!("  Glow: {}", if settings.glow { "on" } else { "off" }),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, _app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Click", "launch / drag trail"),
        make_control("Space", "pause/resume"),
        make_control("A", "auto launch"),
        make_control("M", "mega barrage"),
        make_control("L", "glow"),
        make_control("P", "next preset"),
        make_control("R", "reset"),
        make_control("S", "snapshot PNG"),
        make_control("G", "record GIF"),
        make_control("W", "save preset"),
        make_control("E", "export config"),
        make_control("V", "fullscreen"),
        make_control("H", "help"),
        make_control("Q", "quit"),
    ];

    let paragraph = Paragraph::new(content).block(styled_block(" Controls "));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = braille::render_to_braille(&app.canvas, inner.width, inner.height);

    let buf = frame.buffer_mut();
    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            if let Some(target) = buf.cell_mut((x, y)) {
                target.set_char(cell.char).set_fg(cell.color);
            }
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let help_width = 56.min(area.width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(30);
    let x = (area.width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("FIREWORKS", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Bursts of particles fly out, slow down, fall and fade. The sky is never cleared, only dimmed, so every spark leaves a trail."),
        Line::from(""),
        Line::from(Span::styled("MOUSE:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Left press launches a burst; hold and drag to paint a sparkle trail."),
        Line::from("Right click launches a single burst. Middle click acts like a tap."),
        Line::from(""),
        Line::from(Span::styled("PRESETS (P):", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Garden, Finale, Quiet Night, Storm, then your saved presets."),
        Line::from(""),
        Line::from(Span::styled("PARAMETERS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Tab/Shift+Tab selects, Up/Down adjusts. Esc leaves editing."),
        Line::from(""),
        Line::from(Span::styled("EXPORT:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("S saves a PNG, G starts/stops a GIF, E writes the config JSON."),
        Line::from(""),
    ];

    let title = " Help (J/K scroll, H to close) ";

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}
