//! Main CLI application for the burr puzzle solver

use anyhow::{Context, Result};
use burr_solver::{
    config::{CliOverrides, Settings},
    puzzle::{example_puzzle, load_puzzle_from_file, save_puzzle_to_file},
    utils::{ColorOutput, ReportFormatter},
    AssemblerOptions, ProblemCache,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "burr_solver")]
#[command(about = "Interlocking puzzle assembly and disassembly solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle: enumerate assemblies and test disassembly
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        /// Problem index within the puzzle file (overrides config)
        #[arg(long)]
        problem: Option<usize>,

        /// Maximum assemblies to enumerate (overrides config)
        #[arg(short, long)]
        max_assemblies: Option<usize>,

        /// Disable rotation symmetry reduction
        #[arg(long)]
        no_symmetry_reduction: bool,

        /// Record the move sequence for each solvable assembly
        #[arg(long)]
        traces: bool,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show each assembly and its trace
        #[arg(long)]
        show_details: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and puzzle files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Analyze a puzzle without solving it
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        /// Problem index within the puzzle file (overrides config)
        #[arg(long)]
        problem: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            puzzle,
            problem,
            max_assemblies,
            no_symmetry_reduction,
            traces,
            output,
            show_details,
            verbose,
        } => solve_command(
            config,
            puzzle,
            problem,
            max_assemblies,
            no_symmetry_reduction,
            traces,
            output,
            show_details,
            verbose,
        ),
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Analyze {
            config,
            puzzle,
            problem,
        } => analyze_command(config, puzzle, problem),
    }
}

#[allow(clippy::too_many_arguments)]
fn solve_command(
    config_path: PathBuf,
    puzzle_file: Option<PathBuf>,
    problem_index: Option<usize>,
    max_assemblies: Option<usize>,
    no_symmetry_reduction: bool,
    collect_traces: bool,
    output_dir: Option<PathBuf>,
    show_details: bool,
    verbose: bool,
) -> Result<()> {
    println!("{}", ColorOutput::info("Starting burr puzzle solver"));

    // Load configuration
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!(
                "Config file {} not found, using defaults",
                config_path.display()
            ))
        );
        Settings::default()
    };

    // Apply CLI overrides
    let cli_overrides = CliOverrides {
        puzzle_file,
        problem_index,
        max_assemblies,
        no_symmetry_reduction: no_symmetry_reduction.then_some(true),
        collect_traces,
        output_dir,
    };
    settings.merge_with_cli(&cli_overrides);

    if verbose {
        println!("Configuration:");
        println!("  Puzzle file: {}", settings.input.puzzle_file.display());
        println!("  Problem index: {}", settings.input.problem_index);
        println!("  Max assemblies: {}", settings.assembler.max_assemblies);
        println!(
            "  Symmetry reduction: {}",
            settings.assembler.symmetry_reduction
        );
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!();
    }

    // Validate settings
    settings
        .validate()
        .context("Configuration validation failed")?;

    let puzzle = load_puzzle_from_file(&settings.input.puzzle_file)?;

    let start_time = Instant::now();
    println!(
        "{}",
        ColorOutput::info("Enumerating assemblies and testing disassembly...")
    );
    let report = burr_solver::solve_problem(&puzzle, &settings)?;
    let total_time = start_time.elapsed();

    if report.assemblies.is_empty() {
        println!("{}", ColorOutput::warning("No assemblies found"));
        return Ok(());
    }

    println!(
        "{}",
        ColorOutput::success(&format!(
            "Found {} assembly(ies), {} solvable, in {:.3}s",
            report.assemblies.len(),
            report.solvable,
            total_time.as_secs_f64()
        ))
    );

    println!(
        "\n{}",
        ReportFormatter::format_report(&report, &puzzle, show_details)
    );

    // Save the report
    ReportFormatter::save_report(
        &report,
        &puzzle,
        &settings.output.output_directory,
        settings.output.format,
    )
    .context("Failed to save report")?;

    println!(
        "{}",
        ColorOutput::success(&format!(
            "Report saved to {}",
            settings.output.output_directory.display()
        ))
    );

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    // Create directories
    let config_dir = directory.join("config");
    let input_dir = directory.join("input/puzzles");
    let output_dir = directory.join("output/solutions");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Create default configuration
    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        let default_settings = Settings::default();
        default_settings
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    // Create an example puzzle
    let puzzle_path = input_dir.join("example.yaml");
    if !puzzle_path.exists() || force {
        save_puzzle_to_file(&example_puzzle(), &puzzle_path)
            .context("Failed to create example puzzle")?;
        println!("Created: {}", puzzle_path.display());
    } else {
        println!("Skipped: {} (already exists)", puzzle_path.display());
    }

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your puzzles to {}", input_dir.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

fn analyze_command(
    config_path: PathBuf,
    puzzle_file: Option<PathBuf>,
    problem_index: Option<usize>,
) -> Result<()> {
    println!("{}", ColorOutput::info("Analyzing puzzle..."));

    // Load configuration
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)?
    } else {
        Settings::default()
    };
    settings.merge_with_cli(&CliOverrides {
        puzzle_file,
        problem_index,
        ..CliOverrides::default()
    });

    let puzzle = load_puzzle_from_file(&settings.input.puzzle_file)
        .with_context(|| format!("Failed to load {}", settings.input.puzzle_file.display()))?;

    println!("Shapes:");
    for shape in &puzzle.shapes {
        let [x, y, z] = shape.dimensions();
        println!(
            "  {}: {}x{}x{}, {} cells ({} variable)",
            shape.name(),
            x,
            y,
            z,
            shape.size(),
            shape.size() - shape.filled_size()
        );
    }

    let options = AssemblerOptions {
        max_assemblies: settings.assembler.max_assemblies,
        symmetry_reduction: settings.assembler.symmetry_reduction,
    };
    let mut cache = ProblemCache::new(&puzzle, settings.input.problem_index, options)
        .context("Failed to prepare problem")?;

    println!("\n{}", cache.matrix_statistics());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        // Test that CLI parsing works
        let cli = Cli::try_parse_from([
            "burr_solver",
            "solve",
            "--config",
            "test.yaml",
            "--max-assemblies",
            "5",
        ]);

        assert!(cli.is_ok());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("input/puzzles/example.yaml").exists());
    }
}
