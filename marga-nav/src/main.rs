//! MargaNav - maze navigation host for marga-plan
//!
//! Runs planning cycles: reads a scene snapshot, plans a route to the
//! destination with uncertainty-checked motion primitives, and ships the
//! approved turn/advance commands to the robot over TCP. A cycle whose plan
//! stops short is followed by another, up to the `--cycles` limit.
//!
//! ## Usage
//!
//! ```text
//! marga-nav <scene.yaml> [--config nav.toml] [--cycles N] [--dry-run] [--svg out.svg] [--debug-dir dir]
//! ```
//!
//! - `--config`: host config (default: `marga-nav.toml` if present)
//! - `--cycles`: most planning cycles to run (default: 1)
//! - `--dry-run`: log commands instead of connecting to the robot
//! - `--svg`: write the refinement overlay
//! - `--debug-dir`: write the captured maze and field images

mod config;
mod error;
mod scene;
mod transport;

use config::NavConfig;
use error::{NavError, Result};
use scene::FileScene;
use transport::{LogTransport, TcpTransport};

use marga_plan::io::{
    SvgConfig, SvgOverlay, export_clearance_pgm, export_direction_pgm, write_maze,
};
use marga_plan::{
    CycleReport, PlanConfig, PlanOutcome, Planner, Pose2D, RefineOutcome, SceneSource, Transport,
    run_cycle,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Clearance PGM gain: one cell of clearance per 32 gray levels
const CLEARANCE_GAIN: f32 = 32.0;

/// Parsed command line
struct Args {
    scene: PathBuf,
    config: Option<PathBuf>,
    cycles: u32,
    dry_run: bool,
    svg: Option<PathBuf>,
    debug_dir: Option<PathBuf>,
}

impl Args {
    fn parse(args: &[String]) -> Result<Self> {
        let mut scene = None;
        let mut parsed = Args {
            scene: PathBuf::new(),
            config: None,
            cycles: 1,
            dry_run: false,
            svg: None,
            debug_dir: None,
        };

        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--dry-run" => parsed.dry_run = true,
                "--config" => parsed.config = Some(value_of(&mut iter, arg)?),
                "--cycles" => parsed.cycles = cycle_count(iter.next())?,
                "--svg" => parsed.svg = Some(value_of(&mut iter, arg)?),
                "--debug-dir" => parsed.debug_dir = Some(value_of(&mut iter, arg)?),
                flag if flag.starts_with("--") => {
                    return Err(NavError::Config(format!("Unknown option {}", flag)));
                }
                path if scene.is_none() => scene = Some(PathBuf::from(path)),
                extra => {
                    return Err(NavError::Config(format!("Unexpected argument {}", extra)));
                }
            }
        }

        parsed.scene = scene.ok_or_else(|| {
            NavError::Config(
                "usage: marga-nav <scene.yaml> [--config nav.toml] [--cycles N] [--dry-run] [--svg out.svg] [--debug-dir dir]"
                    .to_string(),
            )
        })?;
        Ok(parsed)
    }
}

fn value_of<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<PathBuf> {
    iter.next()
        .map(PathBuf::from)
        .ok_or_else(|| NavError::Config(format!("{} needs a value", flag)))
}

fn cycle_count(value: Option<&String>) -> Result<u32> {
    let value = value.ok_or_else(|| NavError::Config("--cycles needs a value".to_string()))?;
    match value.parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(NavError::Config(format!("--cycles needs a positive count, got {}", value))),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("marga_nav=info,marga_plan=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let args = Args::parse(&args)?;

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            NavConfig::load(path)?
        }
        None if Path::new("marga-nav.toml").exists() => {
            info!("Loading configuration from marga-nav.toml");
            NavConfig::load(Path::new("marga-nav.toml"))?
        }
        None => {
            info!("Using default configuration");
            NavConfig::default()
        }
    };

    // Command line overrides the config file
    if args.svg.is_some() {
        config.output.svg_path = args.svg.clone();
    }
    if args.debug_dir.is_some() {
        config.output.debug_dir = args.debug_dir.clone();
    }

    info!("MargaNav v{}", env!("CARGO_PKG_VERSION"));

    let plan_config = match &config.planner.config_path {
        Some(path) => PlanConfig::load(path)?,
        None => PlanConfig::load_default()?,
    };
    info!(
        "Planner: cell size {:.2}, robot radius {:.2}, max depth {}",
        plan_config.cell_size(),
        plan_config.robot_radius(),
        plan_config.refine.max_depth
    );
    let planner = Planner::new(plan_config)?;

    let mut transport: Box<dyn Transport> = if args.dry_run {
        info!("Dry run: commands will only be logged");
        Box::new(LogTransport::new())
    } else {
        info!("Connecting to {}", config.address());
        Box::new(TcpTransport::connect(
            &config.address(),
            config.connection.timeout(),
            config.connection.pause(),
        )?)
    };

    let mut scene = FileScene::new(&args.scene);
    info!("Reading scene from {:?}", scene.path());

    let (report, mut overlay) = run_cycles(&mut scene, &planner, transport.as_mut(), args.cycles)?;
    save_outputs(&config, &planner, &report, &mut overlay)?;

    info!("MargaNav finished");
    Ok(())
}

/// Run cycles until the robot arrives, a plan goes all the way, or `limit`
/// cycles have run. Returns the last report with its overlay.
fn run_cycles(
    scene: &mut dyn SceneSource,
    planner: &Planner,
    transport: &mut dyn Transport,
    limit: u32,
) -> Result<(CycleReport, SvgOverlay)> {
    let mut cycle = 1;
    loop {
        let mut overlay = SvgOverlay::new(SvgConfig::default()).with_title("MargaNav plan");
        let report = run_cycle(scene, planner, transport, &mut overlay)?;
        log_outcome(&report);

        if cycle >= limit || !needs_another_cycle(&report) {
            return Ok((report, overlay));
        }
        info!("Cycle {} stopped short, starting cycle {}", cycle, cycle + 1);
        cycle += 1;
    }
}

fn needs_another_cycle(report: &CycleReport) -> bool {
    match &report.outcome {
        PlanOutcome::AlreadyAtDestination => false,
        PlanOutcome::Planned(plan) => plan.refinement.needs_replan(),
    }
}

/// Summarize what the cycle sent and whether the robot stops short.
fn log_outcome(report: &CycleReport) {
    match &report.outcome {
        PlanOutcome::AlreadyAtDestination => info!("Robot is already at the destination"),
        PlanOutcome::Planned(plan) => {
            let refinement = &plan.refinement;
            match refinement.outcome {
                RefineOutcome::Complete => info!("Plan sent: {} commands", report.commands.len()),
                RefineOutcome::Shortened => warn!(
                    "Plan shortened after {} halvings ({} of {} primitives sent); \
                     run another cycle to reach the destination",
                    refinement.depth,
                    refinement.actions.len(),
                    refinement.requested
                ),
                RefineOutcome::Truncated => warn!(
                    "Plan truncated to {} of {} primitives; run another cycle to continue",
                    refinement.actions.len(),
                    refinement.requested
                ),
            }
        }
    }
}

/// Write the SVG overlay and debug field images.
fn save_outputs(
    config: &NavConfig,
    planner: &Planner,
    report: &CycleReport,
    overlay: &mut SvgOverlay,
) -> Result<()> {
    if config.output.svg_path.is_none() && config.output.debug_dir.is_none() {
        return Ok(());
    }

    let snapshot = &report.snapshot;
    let cell_size = planner.config().cell_size();
    let fields = planner.fields(snapshot)?;

    if let Some(svg_path) = &config.output.svg_path {
        create_parent(svg_path)?;
        overlay.set_start(Pose2D::at_cell_center(
            snapshot.robot_cell,
            cell_size,
            snapshot.heading_degrees,
        ));
        overlay
            .save(&fields.buffered, cell_size, svg_path)
            .map_err(|e| NavError::Output(format!("Failed to save SVG: {}", e)))?;
        info!(
            "SVG saved to {:?} ({} trial, {} approved regions)",
            svg_path,
            overlay.trial_regions().len(),
            overlay.approved_regions().len()
        );
    }

    if let Some(dir) = &config.output.debug_dir {
        std::fs::create_dir_all(dir)?;
        write_maze(&snapshot.grid, &dir.join("maze.txt"))?;
        export_direction_pgm(&fields.directions, &dir.join("directions.pgm"))?;
        export_clearance_pgm(&fields.clearance, CLEARANCE_GAIN, &dir.join("clearance.pgm"))?;
        info!(
            "Debug output written to {:?} ({} reachable cells)",
            dir,
            fields.distances.reachable_count()
        );
    }

    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marga_plan::io::parse_maze;
    use marga_plan::{CycleError, GridCoord, Snapshot};

    /// Hands out the same snapshot every cycle and counts captures.
    struct RepeatScene {
        snapshot: Snapshot,
        captures: u32,
    }

    impl RepeatScene {
        fn new(maze: &str, robot: GridCoord, destination: GridCoord) -> Self {
            Self {
                snapshot: Snapshot {
                    grid: parse_maze(maze).unwrap(),
                    destination,
                    robot_cell: robot,
                    heading_degrees: 0.0,
                },
                captures: 0,
            }
        }
    }

    impl SceneSource for RepeatScene {
        fn capture(&mut self) -> std::result::Result<Snapshot, CycleError> {
            self.captures += 1;
            Ok(self.snapshot.clone())
        }
    }

    fn open_planner() -> Planner {
        let mut config = PlanConfig::default();
        config.robot.radius = 0.0;
        Planner::new(config).unwrap()
    }

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("marga-nav")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_full_command_line() {
        let parsed = Args::parse(&args(&[
            "scene.yaml",
            "--dry-run",
            "--config",
            "nav.toml",
            "--svg",
            "out/plan.svg",
            "--debug-dir",
            "out",
            "--cycles",
            "5",
        ]))
        .unwrap();
        assert_eq!(parsed.scene, PathBuf::from("scene.yaml"));
        assert!(parsed.dry_run);
        assert_eq!(parsed.cycles, 5);
        assert_eq!(parsed.config, Some(PathBuf::from("nav.toml")));
        assert_eq!(parsed.svg, Some(PathBuf::from("out/plan.svg")));
        assert_eq!(parsed.debug_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_scene_is_required() {
        assert!(matches!(Args::parse(&args(&["--dry-run"])), Err(NavError::Config(_))));
    }

    #[test]
    fn test_missing_flag_value() {
        assert!(Args::parse(&args(&["scene.yaml", "--svg"])).is_err());
        assert!(Args::parse(&args(&["scene.yaml", "--verbose"])).is_err());
        assert!(Args::parse(&args(&["a.yaml", "b.yaml"])).is_err());
    }

    #[test]
    fn test_cycle_count_must_be_positive() {
        assert_eq!(Args::parse(&args(&["scene.yaml"])).unwrap().cycles, 1);
        assert!(Args::parse(&args(&["scene.yaml", "--cycles"])).is_err());
        assert!(Args::parse(&args(&["scene.yaml", "--cycles", "0"])).is_err());
        assert!(Args::parse(&args(&["scene.yaml", "--cycles", "two"])).is_err());
    }

    #[test]
    fn test_complete_plan_stops_after_one_cycle() {
        let maze = "........\n........\n........";
        let mut scene = RepeatScene::new(maze, GridCoord::new(1, 1), GridCoord::new(6, 1));
        let mut transport = LogTransport::new();
        let (report, _) = run_cycles(&mut scene, &open_planner(), &mut transport, 4).unwrap();

        assert_eq!(scene.captures, 1);
        assert!(!needs_another_cycle(&report));
        assert_eq!(transport.sent(), report.commands.as_slice());
    }

    #[test]
    fn test_arrival_stops_cycles() {
        let mut scene = RepeatScene::new("....", GridCoord::new(2, 0), GridCoord::new(2, 0));
        let mut transport = LogTransport::new();
        let (report, _) = run_cycles(&mut scene, &open_planner(), &mut transport, 4).unwrap();

        assert_eq!(scene.captures, 1);
        assert_eq!(report.outcome, PlanOutcome::AlreadyAtDestination);
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn test_short_plans_repeat_up_to_limit() {
        // Heavy drift while driving keeps the long advance from clearing the corridor walls
        let mut config = PlanConfig::default();
        config.robot.radius = 0.0;
        config.motion.advance.rate.error = 45.0;
        let planner = Planner::new(config).unwrap();

        let maze = "##########\n#........#\n##########";
        let mut scene = RepeatScene::new(maze, GridCoord::new(1, 1), GridCoord::new(8, 1));
        let mut transport = LogTransport::new();
        let (report, _) = run_cycles(&mut scene, &planner, &mut transport, 3).unwrap();

        assert_eq!(scene.captures, 3);
        assert!(needs_another_cycle(&report));
        assert_eq!(transport.sent().len(), 3 * report.commands.len());
    }

    #[test]
    fn test_dry_run_cycle_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("scene.yaml");
        std::fs::write(
            &scene_path,
            "maze: |\n  ........\n  ........\n  ........\ndestination: [6, 1]\nrobot: [1, 1]\nheading: 20.0\n",
        )
        .unwrap();

        let mut plan_config = PlanConfig::default();
        plan_config.robot.radius = 0.0;
        let planner = Planner::new(plan_config).unwrap();

        let mut scene = FileScene::new(&scene_path);
        let mut transport = LogTransport::new();
        let mut overlay = SvgOverlay::new(SvgConfig::default());
        let report = run_cycle(&mut scene, &planner, &mut transport, &mut overlay).unwrap();
        assert_eq!(transport.sent(), report.commands.as_slice());
        assert!((report.commands[0].turn_degrees + 20.0).abs() < 1e-3);

        let mut config = NavConfig::default();
        config.output.svg_path = Some(dir.path().join("svg/plan.svg"));
        config.output.debug_dir = Some(dir.path().join("debug"));
        save_outputs(&config, &planner, &report, &mut overlay).unwrap();

        let svg = std::fs::read_to_string(dir.path().join("svg/plan.svg")).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(dir.path().join("debug/directions.pgm").exists());
        assert!(dir.path().join("debug/clearance.pgm").exists());
        let maze = marga_plan::io::read_maze(&dir.path().join("debug/maze.txt")).unwrap();
        assert_eq!(maze, report.snapshot.grid);
    }
}
