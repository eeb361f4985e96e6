//! Configuration management for the burr puzzle solver

pub mod settings;

pub use settings::{
    Settings, InputConfig, AssemblerConfig, SolverConfig, OutputConfig,
    OutputFormat, CliOverrides,
};
