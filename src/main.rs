use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use firewatch::app::App;
use firewatch::config::Config;
use firewatch::map::ChoroplethLayer;
use firewatch::{data, risk, ui};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::default();
    init_logging(&config)?;

    // Load before touching the terminal so errors print normally
    let layer = load_layer(&config)?;

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, &config, layer);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    if let Err(ref e) = result {
        error!("{:#}", e);
    }
    result
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_layer(config: &Config) -> Result<ChoroplethLayer> {
    let counties = data::load_counties(&config.counties_path()).context("loading county boundaries")?;
    let table = data::load_risk_table_if_present(&config.risk_path()).context("loading risk table")?;

    let layer = ChoroplethLayer::build(counties, &table, risk::annotate);

    // Keys must match exactly; surface how many silently fell back to 0%
    let unmatched = layer.unmatched(&table);
    if unmatched > 0 {
        warn!(unmatched, total = layer.len(), "counties without a risk entry default to 0%");
    }
    info!(counties = layer.len(), "map ready");
    Ok(layer)
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Trackpad horizontal swipe
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, config: &Config, layer: ChoroplethLayer) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(
        size.width as usize,
        size.height as usize,
        layer,
        config.center,
        config.zoom,
    );

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                    KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    KeyCode::Char('f') | KeyCode::Char('F') => app.layer.toggle_fill(),
                    KeyCode::Char('o') | KeyCode::Char('O') => app.layer.toggle_outlines(),
                    KeyCode::Char('g') | KeyCode::Char('G') => app.layer.toggle_legend(),

                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
