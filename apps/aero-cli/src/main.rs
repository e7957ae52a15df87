use std::path::{Path, PathBuf};

use aero_app::{
    AppError, AppResult, ClientConfig, Orchestrator, RunStatus, SessionStore,
    load_config, load_geometry, save_config,
};
use aero_core::{CONTROL_BOUNDS, ParameterDelta};
use aero_geometry::Aabb;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aero-cli")]
#[command(about = "AeroSprint CLI - submit meshes to the flow solver and inspect results", long_about = None)]
struct Cli {
    /// Client configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a mesh, run a simulation and summarize the streamlines
    Run {
        /// Path to the STL file
        mesh: PathBuf,
        /// Simulation service base URL (overrides config)
        #[arg(long)]
        server: Option<String>,
        /// Grid resolution per axis
        #[arg(long)]
        resolution: Option<u32>,
        /// Inflow speed in m/s
        #[arg(long)]
        wind_speed: Option<f64>,
        /// Write scene-space streamlines as JSON
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
    /// Load and center a mesh without contacting the service
    InspectMesh {
        /// Path to the STL file
        mesh: PathBuf,
    },
    /// Print the effective configuration
    ShowConfig,
    /// Write a default configuration file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };

    match cli.command {
        Commands::Run {
            mesh,
            server,
            resolution,
            wind_speed,
            export,
        } => {
            let mut config = config;
            if let Some(server) = server {
                config.server_url = server;
            }
            let delta = ParameterDelta {
                resolution,
                wind_speed,
            };
            cmd_run(config, &mesh, delta, export.as_deref()).await
        }
        Commands::InspectMesh { mesh } => cmd_inspect_mesh(&mesh).await,
        Commands::ShowConfig => cmd_show_config(&config),
        Commands::InitConfig { path } => cmd_init_config(&path),
    }
}

fn read_mesh(path: &Path) -> AppResult<(String, Vec<u8>)> {
    let bytes = std::fs::read(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh.stl".to_string());
    Ok((name, bytes))
}

fn print_status(status: &RunStatus) {
    println!("  ... {}", status.label());
}

fn print_bounds(label: &str, bounds: &Aabb) {
    let e = bounds.extents();
    println!(
        "  {}: min=({:.3}, {:.3}, {:.3}) max=({:.3}, {:.3}, {:.3}) extents=({:.3}, {:.3}, {:.3})",
        label,
        bounds.min.x,
        bounds.min.y,
        bounds.min.z,
        bounds.max.x,
        bounds.max.y,
        bounds.max.z,
        e.x,
        e.y,
        e.z
    );
}

async fn cmd_run(
    config: ClientConfig,
    mesh_path: &Path,
    delta: ParameterDelta,
    export: Option<&Path>,
) -> AppResult<()> {
    let service = config.connect()?;
    let store = SessionStore::new(config.parameters);
    if !delta.is_empty() {
        store.set_parameters(delta)?;
    }

    let params = store.snapshot().parameters;
    if !CONTROL_BOUNDS.contains(&params) {
        warn!(
            resolution = params.resolution,
            wind_speed = params.wind_speed,
            "parameters are outside the range the controls offer"
        );
    }

    let (name, bytes) = read_mesh(mesh_path)?;
    let handle = store.select_input(name.clone(), bytes);
    let mesh = load_geometry(&handle).await?;

    println!("Running simulation for {}", name);
    println!(
        "  server = {}, resolution = {}, wind speed = {:.1} m/s",
        config.server_url, params.resolution, params.wind_speed
    );
    println!("  triangles = {}", mesh.triangle_count());

    let orchestrator = Orchestrator::new(store.clone(), service);
    let outcome = orchestrator.run_observed(print_status).await?;

    let state = store.snapshot();
    if let RunStatus::Failed { kind, message } = &state.status {
        println!("✗ {}: {}", kind.label(), message);
    }
    let token = outcome.require_completed(&state)?;
    println!("✓ Simulation completed: {}", token);

    let completed = state.last_result.ok_or(AppError::RunDiscarded(token))?;

    println!("  Streamlines: {}", completed.mapped.len());
    println!("  Points: {}", completed.mapped.point_count());
    println!("  Grid resolution used: {}", completed.result.resolution_used);
    if let Some(status) = completed.result.service_status() {
        println!("  Service status: {}", status);
    }
    print_bounds("mesh (scene frame)", &mesh.bounds());
    let all_points = completed.mapped.polylines().iter().flatten();
    if let Some(bounds) = Aabb::from_points(all_points) {
        print_bounds("streamlines (scene frame)", &bounds);
    }

    if let Some(path) = export {
        write_export(path, &completed.mapped)?;
        println!("  Exported to {}", path.display());
    }

    Ok(())
}

#[derive(Serialize)]
struct StreamlineExport {
    frame: &'static str,
    streamlines: Vec<Vec<[f32; 3]>>,
}

fn write_export(path: &Path, mapped: &aero_results::MappedStreamlines) -> AppResult<()> {
    let export = StreamlineExport {
        frame: "scene",
        streamlines: mapped
            .polylines()
            .iter()
            .map(|line| line.iter().map(|p| [p.x, p.y, p.z]).collect())
            .collect(),
    };
    let io_error = |source| AppError::Io {
        path: path.to_path_buf(),
        source,
    };
    let json = serde_json::to_string_pretty(&export)
        .map_err(|e| io_error(std::io::Error::other(e)))?;
    std::fs::write(path, json).map_err(io_error)
}

async fn cmd_inspect_mesh(mesh_path: &Path) -> AppResult<()> {
    let (name, bytes) = read_mesh(mesh_path)?;
    let store = SessionStore::default();
    let handle = store.select_input(name.clone(), bytes);
    let mesh = load_geometry(&handle).await?;

    println!("Mesh: {}", name);
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());
    print_bounds("source", &mesh.source_bounds);
    print_bounds("scene frame", &mesh.bounds());
    Ok(())
}

fn cmd_show_config(config: &ClientConfig) -> AppResult<()> {
    let yaml = serde_yaml::to_string(config)
        .map_err(|e| AppError::Config(format!("serialization failed: {e}")))?;
    print!("{}", yaml);
    Ok(())
}

fn cmd_init_config(path: &Path) -> AppResult<()> {
    save_config(path, &ClientConfig::default())?;
    println!("✓ Wrote default configuration to {}", path.display());
    Ok(())
}
