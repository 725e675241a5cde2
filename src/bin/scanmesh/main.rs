//! scanmesh CLI - offline processing of exported scan meshes.
//!
//! Usage: scanmesh <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `scanmesh --help` for available commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use scanmesh::algo::{denoise, laplacian_smooth, DenoiseOptions, SmoothOptions};
use scanmesh::config::PipelineConfig;
use scanmesh::io::obj;
use scanmesh::surface::{
    ConcaveOptions, PlanarSurfaceExtractor, SurfaceStrategy, ThresholdHullOptions,
};

#[derive(Parser)]
#[command(name = "scanmesh")]
#[command(author, version, about = "Scan mesh processing CLI", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input OBJ file
        input: PathBuf,
    },

    /// Remove near-coplanar duplicate triangles
    Denoise {
        /// Input OBJ file
        input: PathBuf,

        /// Output OBJ file
        output: PathBuf,

        /// Maximum normal angle in degrees between coplanar neighbors
        #[arg(short, long, default_value = "10.0")]
        angle: f32,
    },

    /// Smooth a mesh
    Smooth {
        /// Input OBJ file
        input: PathBuf,

        /// Output OBJ file
        output: PathBuf,

        /// Number of iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Extract the ceiling boundary
    Ceiling {
        /// Input OBJ file
        input: PathBuf,

        /// Detection strategy (default: the configured one)
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,

        /// Write the triangulated boundary to this OBJ file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON pipeline configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Height band and convex hull
    Threshold,
    /// Downward normals and concave insertion
    Concave,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Denoise {
            input,
            output,
            angle,
        } => {
            cmd_denoise(&input, &output, angle)?;
        }

        Commands::Smooth {
            input,
            output,
            iterations,
            sequential,
        } => {
            cmd_smooth(&input, &output, iterations, sequential)?;
        }

        Commands::Ceiling {
            input,
            strategy,
            output,
            config,
        } => {
            cmd_ceiling(&input, strategy, output.as_deref(), config.as_deref())?;
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = obj::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Triangles: {}", mesh.num_triangles());
    println!("Referenced vertices: {}", mesh.referenced_vertex_count());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let degenerate = (0..mesh.num_triangles())
        .filter(|&t| mesh.face_normal(t).norm_squared() <= f32::EPSILON)
        .count();
    if degenerate > 0 {
        println!("Degenerate triangles: {}", degenerate);
    }

    Ok(())
}

fn cmd_denoise(input: &Path, output: &Path, angle: f32) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = obj::load(input)?;
    println!("Loaded: {} vertices, {} triangles", mesh.num_vertices(), mesh.num_triangles());

    let options = DenoiseOptions::default().with_angle(angle);
    println!("Removing coplanar duplicates (angle={}°)...", options.coplanar_angle_deg);

    let start = Instant::now();
    let result = denoise(&mesh, &options);
    let elapsed = start.elapsed();

    println!(
        "Removed {} triangles, {} remain",
        result.removed,
        result.mesh.num_triangles()
    );
    obj::save(&result.mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_smooth(
    input: &Path,
    output: &Path,
    iterations: usize,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = obj::load(input)?;
    println!("Loaded: {} vertices, {} triangles", mesh.num_vertices(), mesh.num_triangles());

    let options = SmoothOptions::default()
        .with_iterations(iterations)
        .with_parallel(!sequential);
    let mode = if sequential { "sequential" } else { "parallel" };
    println!("Applying Laplacian smoothing ({} iterations, {})...", iterations, mode);

    let start = Instant::now();
    let smoothed = laplacian_smooth(&mesh, &options);
    let elapsed = start.elapsed();

    obj::save(&smoothed, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_ceiling(
    input: &Path,
    strategy: Option<Strategy>,
    output: Option<&Path>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    let surface = select_strategy(config.surface, strategy);

    let mesh = obj::load(input)?;
    println!("Loaded: {} vertices, {} triangles", mesh.num_vertices(), mesh.num_triangles());

    let mut extractor = PlanarSurfaceExtractor::new(&surface);
    let Some(update) = extractor.update(&mesh) else {
        println!("No ceiling found");
        return Ok(());
    };

    let polygon = &update.polygon;
    println!("Ceiling height: {:.3}", polygon.height());
    println!("Boundary points: {}", polygon.len());
    println!("Area: {:.3}", polygon.signed_area().abs());
    println!("Perimeter: {:.3}", polygon.perimeter());

    if let Some(output) = output {
        obj::save(&update.mesh, output)?;
        println!("Saved: {}", output.display());
    }

    Ok(())
}

/// Apply the command-line strategy, keeping configured options when the kind matches.
fn select_strategy(configured: SurfaceStrategy, requested: Option<Strategy>) -> SurfaceStrategy {
    match (requested, configured) {
        (None, configured) => configured,
        (Some(Strategy::Threshold), s @ SurfaceStrategy::ThresholdHull(_)) => s,
        (Some(Strategy::Concave), s @ SurfaceStrategy::ConcaveInsertion(_)) => s,
        (Some(Strategy::Threshold), _) => SurfaceStrategy::ThresholdHull(ThresholdHullOptions::default()),
        (Some(Strategy::Concave), _) => SurfaceStrategy::ConcaveInsertion(ConcaveOptions::default()),
    }
}
