//! Myria CLI - build, unfold and export myriahedral projections.
//!
//! Usage: myria <COMMAND> [OPTIONS]
//!
//! Run `myria --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};

use myriahedral::algo::Progress;
use myriahedral::io::{self, Format};
use myriahedral::mesh::{BaseGeometry, GraticuleLayout};
use myriahedral::{Myriahedron, MyriahedronOptions};

#[derive(Parser)]
#[command(name = "myria")]
#[command(author, version, about = "Myriahedral projection CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display myriahedron statistics
    Info {
        #[command(flatten)]
        build: BuildArgs,
    },

    /// Unfold to a scale and write the net
    Unfold {
        #[command(flatten)]
        build: BuildArgs,

        /// Output mesh file (.obj or .ply)
        output: PathBuf,

        /// Unfold scale (0 = sphere, 1 = flat net)
        #[arg(short = 't', long, default_value = "1.0")]
        scale: f64,
    },

    /// Write a sequence of frames from sphere to flat net
    Sweep {
        #[command(flatten)]
        build: BuildArgs,

        /// Output directory for frames
        output: PathBuf,

        /// Number of intervals between scale 0 and 1
        #[arg(short = 'n', long, default_value = "10")]
        steps: usize,

        /// Frame file format
        #[arg(short, long, value_enum, default_value = "obj")]
        format: FrameFormat,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Base geometry
    #[arg(short, long, value_enum, default_value = "icosahedron")]
    geometry: Geometry,

    /// Subdivision depth
    #[arg(short, long, default_value = "3")]
    subdivisions: usize,

    /// Latitude bands of a graticule
    #[arg(short, long, default_value = "8")]
    parallels: usize,

    /// Preferred fold pattern of a graticule
    #[arg(short, long, value_enum, default_value = "free")]
    layout: Layout,

    /// Keep shared vertices (no unfolding)
    #[arg(long)]
    no_unfoldable: bool,

    /// Keep subdivided vertices off the unit sphere
    #[arg(long)]
    no_normalize: bool,

    /// Longitude offset of the texture mapping, in degrees
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    lon: f64,

    /// Latitude offset of the texture mapping, in degrees
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    lat: f64,

    /// Use single-threaded execution (for benchmarking)
    #[arg(long)]
    sequential: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Geometry {
    /// Regular tetrahedron
    Tetrahedron,
    /// Triangulated cube
    Cube,
    /// Regular octahedron
    Octahedron,
    /// Regular icosahedron
    Icosahedron,
    /// Latitude/longitude grid
    Graticule,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// No preferred folds
    Free,
    /// Unrolled around the equator
    Cylindrical,
    /// Anchored at one third of the latitude range
    Conical,
    /// Anchored on the north pole
    Azimuthal,
    /// Both hemispheres around their poles
    AzimuthalTwoHemispheres,
    /// Bands joined along the central meridian
    Polyconical,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FrameFormat {
    /// Wavefront OBJ
    Obj,
    /// ASCII PLY
    Ply,
}

impl From<Layout> for GraticuleLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Free => GraticuleLayout::Free,
            Layout::Cylindrical => GraticuleLayout::Cylindrical,
            Layout::Conical => GraticuleLayout::Conical,
            Layout::Azimuthal => GraticuleLayout::Azimuthal,
            Layout::AzimuthalTwoHemispheres => GraticuleLayout::AzimuthalTwoHemispheres,
            Layout::Polyconical => GraticuleLayout::Polyconical,
        }
    }
}

impl From<FrameFormat> for Format {
    fn from(format: FrameFormat) -> Self {
        match format {
            FrameFormat::Obj => Format::Obj,
            FrameFormat::Ply => Format::Ply,
        }
    }
}

impl BuildArgs {
    fn options(&self) -> MyriahedronOptions {
        let geometry = match self.geometry {
            Geometry::Tetrahedron => BaseGeometry::Tetrahedron,
            Geometry::Cube => BaseGeometry::Cube,
            Geometry::Octahedron => BaseGeometry::Octahedron,
            Geometry::Icosahedron => BaseGeometry::Icosahedron,
            Geometry::Graticule => BaseGeometry::Graticule {
                parallels: self.parallels,
                layout: self.layout.into(),
            },
        };

        MyriahedronOptions::new(geometry)
            .with_subdivisions(self.subdivisions)
            .with_unfoldable(!self.no_unfoldable)
            .with_normalize(!self.no_normalize)
            .with_uv_offset(self.lon.to_radians(), self.lat.to_radians())
            .with_parallel(!self.sequential)
    }

    fn build(&self) -> Result<Myriahedron, Box<dyn std::error::Error>> {
        let options = self.options();
        let mode = if self.sequential { "sequential" } else { "parallel" };
        println!(
            "Building {} (depth {}, {})...",
            options.geometry.name(),
            options.subdivisions,
            mode
        );

        let progress = create_progress();
        let start = Instant::now();
        let myria = Myriahedron::build_with_progress(&options, &progress)?;
        println!(
            "Built: {} faces, {} vertices ({:.2?})",
            myria.num_faces(),
            myria.num_vertices(),
            start.elapsed()
        );

        Ok(myria)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { build } => {
            cmd_info(&build)?;
        }

        Commands::Unfold {
            build,
            output,
            scale,
        } => {
            cmd_unfold(&build, &output, scale)?;
        }

        Commands::Sweep {
            build,
            output,
            steps,
            format,
        } => {
            cmd_sweep(&build, &output, steps, format.into())?;
        }
    }

    Ok(())
}

/// Build stage currently shown on the terminal.
#[derive(Default)]
struct StageLine {
    stage: String,
    open: bool,
}

/// Progress reporter printing one line per build stage, updated in place
/// with the overall percentage while the stage runs.
fn create_progress() -> Progress {
    let line = Mutex::new(StageLine::default());

    Progress::new(move |current, total, stage| {
        if total == 0 {
            return;
        }
        let Ok(mut line) = line.lock() else {
            return;
        };

        if line.stage != stage {
            if line.open {
                eprintln!();
            }
            line.stage = stage.to_string();
        }

        let percent = (current * 100 / total).min(100);
        eprint!("\r  {:>3}%  {}", percent, stage);
        let _ = std::io::stderr().flush();

        line.open = current < total;
        if !line.open {
            eprintln!();
        }
    })
}

fn cmd_info(build: &BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let myria = build.build()?;
    let stats = myria.stats();

    println!();
    println!("{}", stats);

    let tree = myria.fold_tree();
    println!("Root face:      {}", tree.root_face().index());
    if let Some(root) = tree.root() {
        let fold = myria.dual_graph().edge(root);
        println!("Root fold:      {} -> {}", fold.from.index(), fold.to.index());
    }

    Ok(())
}

fn cmd_unfold(build: &BuildArgs, output: &Path, scale: f64) -> Result<(), Box<dyn std::error::Error>> {
    let mut myria = build.build()?;

    let start = Instant::now();
    myria.unfold(scale)?;
    let elapsed = start.elapsed();
    println!("Unfolded to scale {} ({:.2?})", scale, elapsed);

    io::save(&myria.mesh_data(), output)?;
    println!("Saved: {}", output.display());

    Ok(())
}

fn cmd_sweep(
    build: &BuildArgs,
    output: &Path,
    steps: usize,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    if steps == 0 {
        return Err("steps must be at least 1".into());
    }

    let mut myria = build.build()?;
    std::fs::create_dir_all(output)?;

    let start = Instant::now();
    for i in 0..=steps {
        let scale = i as f64 / steps as f64;
        myria.unfold(scale)?;

        let path = output.join(format!("frame_{:04}.{}", i, format.extension()));
        io::save(&myria.mesh_data(), &path)?;
        log::debug!("frame {} at scale {:.4}: {}", i, scale, path.display());
    }
    println!(
        "Saved {} frames to {} ({:.2?})",
        steps + 1,
        output.display(),
        start.elapsed()
    );

    Ok(())
}
