//! Configuration settings for the burr puzzle solver

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub input: InputConfig,
    pub assembler: AssemblerConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub puzzle_file: PathBuf,
    pub problem_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblerConfig {
    pub max_assemblies: usize,
    pub symmetry_reduction: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Worker threads for solving assemblies; 0 lets the runtime pick.
    pub parallel_workers: usize,
    pub collect_traces: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: InputConfig {
                puzzle_file: PathBuf::from("input/puzzles/example.yaml"),
                problem_index: 0,
            },
            assembler: AssemblerConfig {
                max_assemblies: 1_000_000,
                symmetry_reduction: true,
            },
            solver: SolverConfig {
                parallel_workers: 0,
                collect_traces: false,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                output_directory: PathBuf::from("output/solutions"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.assembler.max_assemblies == 0 {
            anyhow::bail!("Maximum assemblies must be positive");
        }

        if !self.input.puzzle_file.exists() {
            anyhow::bail!(
                "Puzzle file does not exist: {}",
                self.input.puzzle_file.display()
            );
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref puzzle_file) = cli_overrides.puzzle_file {
            self.input.puzzle_file = puzzle_file.clone();
        }
        if let Some(problem_index) = cli_overrides.problem_index {
            self.input.problem_index = problem_index;
        }
        if let Some(max_assemblies) = cli_overrides.max_assemblies {
            self.assembler.max_assemblies = max_assemblies;
        }
        if let Some(no_symmetry_reduction) = cli_overrides.no_symmetry_reduction {
            self.assembler.symmetry_reduction = !no_symmetry_reduction;
        }
        if cli_overrides.collect_traces {
            self.solver.collect_traces = true;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub puzzle_file: Option<PathBuf>,
    pub problem_index: Option<usize>,
    pub max_assemblies: Option<usize>,
    pub no_symmetry_reduction: Option<bool>,
    pub collect_traces: bool,
    pub output_dir: Option<PathBuf>,
}
