use std::env;
use std::time::Duration;

use camera_sync::{OrbitCamera, OrbitControls, SyncConfig, ViewHandle, CAMERA_SYNC_DEBOUNCE_MS};
use clap::{Parser, Subcommand};
use foundation::side::Side;
use foundation::time::SystemClock;
use params::{stability_warnings, MapType, ParameterSet};
use serde_json::json;
use session::{ComparisonSession, MemoryHistory, SessionConfig, URL_SYNC_DEBOUNCE_MS};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Comparison-mode links and camera sync for chaos maps")]
struct Args {
    /// Camera sync quiet window (env: CHAOS_CAMERA_DEBOUNCE_MS)
    #[arg(long)]
    camera_debounce_ms: Option<u64>,

    /// URL sync quiet window (env: CHAOS_URL_DEBOUNCE_MS)
    #[arg(long)]
    url_debounce_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a comparison URL and print both parameter sets as JSON
    Decode {
        url: String,

        #[arg(long)]
        map_type: MapType,
    },

    /// Print a comparison URL seeded from the defaults
    Link {
        /// Path of the map page (e.g. /lorenz)
        base_path: String,

        #[arg(long)]
        map_type: MapType,

        /// Parameter override, repeatable (e.g. --set rho=99.5)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        overrides: Vec<String>,
    },

    /// Print default parameters and stability advisories for a map
    Defaults { map_type: MapType },

    /// Drive a scripted two-view session and log what gets synced
    Simulate {
        #[arg(long, default_value = "lorenz")]
        map_type: MapType,

        /// Number of 16 ms frames to run
        #[arg(long, default_value_t = 90)]
        frames: u32,

        /// Frames during which the left view is dragged
        #[arg(long, default_value_t = 12)]
        drag_frames: u32,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main(Args::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main(args: Args) -> Result<(), String> {
    let config = session_config(&args);
    match args.command {
        Command::Decode { url, map_type } => cmd_decode(&url, map_type),
        Command::Link {
            base_path,
            map_type,
            overrides,
        } => cmd_link(&base_path, map_type, &overrides),
        Command::Defaults { map_type } => cmd_defaults(map_type),
        Command::Simulate {
            map_type,
            frames,
            drag_frames,
        } => cmd_simulate(map_type, frames, drag_frames, config).await,
    }
}

fn env_var_u64(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(name, raw = %raw, default, "ignoring unparsable env var");
            default
        }),
        Err(_) => default,
    }
}

/// Flags win over env vars, env vars over built-in defaults.
fn session_config(args: &Args) -> SessionConfig {
    let camera = args
        .camera_debounce_ms
        .unwrap_or_else(|| env_var_u64("CHAOS_CAMERA_DEBOUNCE_MS", CAMERA_SYNC_DEBOUNCE_MS));
    let url = args
        .url_debounce_ms
        .unwrap_or_else(|| env_var_u64("CHAOS_URL_DEBOUNCE_MS", URL_SYNC_DEBOUNCE_MS));
    SessionConfig {
        url_debounce_ms: url,
        sync: SyncConfig { debounce_ms: camera },
    }
}

fn params_json(params: &ParameterSet) -> Result<serde_json::Value, String> {
    serde_json::to_value(params).map_err(|e| e.to_string())
}

fn cmd_decode(url: &str, map_type: MapType) -> Result<(), String> {
    let state = match compare::try_decode(url, map_type) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("not a comparison url ({e}); showing defaults");
            compare::ComparisonUrlState::defaults(map_type)
        }
    };
    let out = json!({
        "compare": state.compare,
        "left": params_json(&state.left)?,
        "right": params_json(&state.right)?,
    });
    let text = serde_json::to_string_pretty(&out).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn parse_override(raw: &str) -> Result<(&str, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("override must be NAME=VALUE, got {raw:?}"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("override {name}: {value:?} is not a number"))?;
    Ok((name.trim(), value))
}

fn cmd_link(base_path: &str, map_type: MapType, overrides: &[String]) -> Result<(), String> {
    let mut params = compare::get_default_parameters(map_type);
    for raw in overrides {
        let (name, value) = parse_override(raw)?;
        params = params.with(name, value).map_err(|e| e.to_string())?;
    }
    println!("{}", compare::build_comparison_url(base_path, map_type, &params));
    Ok(())
}

fn cmd_defaults(map_type: MapType) -> Result<(), String> {
    let params = compare::get_default_parameters(map_type);
    println!("{} ({})", map_type.display_name(), map_type.id());
    for spec in map_type.fields() {
        let value = params.get(spec.name).unwrap_or(f64::NAN);
        println!(
            "  {:<10} {:>12} [{}, {}]",
            spec.name, value, spec.range.min, spec.range.max
        );
    }
    for warning in stability_warnings(&params) {
        println!("  note: {warning}");
    }
    Ok(())
}

struct View {
    handle: ViewHandle,
    camera: OrbitCamera,
    controls: OrbitControls,
}

impl View {
    fn new(handle: ViewHandle) -> Self {
        let controls = OrbitControls::default();
        Self {
            handle,
            camera: OrbitCamera::new(controls.eye()),
            controls,
        }
    }

    /// Applies the other side's pose; the resulting change event is reported
    /// back like a renderer would.
    fn frame(&mut self) -> bool {
        if !self.handle.sync_camera(&mut self.camera, &mut self.controls) {
            return false;
        }
        self.handle.report_camera(&self.camera, &self.controls);
        true
    }
}

async fn cmd_simulate(
    map_type: MapType,
    frames: u32,
    drag_frames: u32,
    config: SessionConfig,
) -> Result<(), String> {
    let base_path = format!("/{}", map_type.id());
    let mut session = ComparisonSession::open(
        &base_path,
        map_type,
        base_path.clone(),
        config,
        SystemClock::shared(),
        MemoryHistory::new(),
    );
    info!(
        camera_debounce_ms = config.sync.debounce_ms,
        url_debounce_ms = config.url_debounce_ms,
        %map_type,
        "simulation started"
    );

    let mut left = View::new(session.view(Side::Left));
    let mut right = View::new(session.view(Side::Right));

    let (first_field, _) = session
        .right()
        .named_values()
        .first()
        .copied()
        .ok_or_else(|| format!("{map_type} has no parameters"))?;

    let mut ticker = tokio::time::interval(Duration::from_millis(16));
    let mut commits = 0;
    let mut applied = 0;
    for frame in 0..frames {
        ticker.tick().await;

        if frame < drag_frames {
            left.controls.orbit(&mut left.camera, 25.0, 4.0);
            left.handle.report_camera(&left.camera, &left.controls);

            let current = session.right().get(first_field).unwrap_or_default();
            let edited = session
                .right()
                .with(first_field, current * 1.01)
                .map_err(|e| e.to_string())?;
            session
                .set_parameters(Side::Right, edited)
                .map_err(|e| e.to_string())?;
        }

        let summary = session.tick();
        commits += summary.camera_commits;
        if summary.url_written {
            info!(frame, url = %session.current_url(), "url replaced");
        }
        for view in [&mut left, &mut right] {
            if view.frame() {
                applied += 1;
                info!(frame, side = %view.handle.side(), "camera pose applied");
            }
        }
    }

    let gap = left.camera.position.distance(right.camera.position);
    info!(commits, applied, gap, "simulation finished");
    println!("camera commits: {commits}");
    println!("poses applied: {applied}");
    println!("url writes: {}", session.history().entries().len());
    println!("final url: {}", session.current_url());
    session.close();
    Ok(())
}
