//! Display and output formatting utilities

use crate::assembly::Assembly;
use crate::config::OutputFormat;
use crate::disassembly::{DisassemblyTrace, SolveReport};
use crate::puzzle::Puzzle;
use crate::PuzzleReport;
use anyhow::Result;
use std::path::Path;

/// Format solve results for display
pub struct ReportFormatter;

impl ReportFormatter {
    /// Format a full puzzle report for console output
    pub fn format_report(report: &PuzzleReport, puzzle: &Puzzle, show_details: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Problem: {} ===\n", report.problem));
        output.push_str(&format!("Assemblies: {}\n", report.assemblies.len()));
        output.push_str(&format!("Solvable: {}\n", report.solvable));
        output.push_str(&format!(
            "States explored: {}\n",
            report
                .reports
                .iter()
                .map(|r| r.states_explored)
                .sum::<usize>()
        ));
        output.push('\n');
        output.push_str(&Self::format_report_summary(&report.reports));

        if show_details {
            for solve in &report.reports {
                output.push('\n');
                output.push_str(&format!("Assembly {}:\n", solve.assembly + 1));
                output.push_str(&Self::format_assembly(
                    &report.assemblies[solve.assembly],
                    puzzle,
                ));
                if let Some(trace) = &solve.trace {
                    output.push_str(&Self::format_trace(trace));
                }
            }
        }

        output
    }

    /// Format the per-assembly verdicts as a summary table
    pub fn format_report_summary(reports: &[SolveReport]) -> String {
        let mut output = String::new();

        output.push_str("Assembly | Solvable | States   | Phases\n");
        output.push_str("---------|----------|----------|-------\n");

        for report in reports {
            let phases = report
                .trace
                .as_ref()
                .map(|t| t.phases.len().to_string())
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:8} | {:8} | {:8} | {}\n",
                report.assembly + 1,
                if report.solvable { "yes" } else { "no" },
                report.states_explored,
                phases
            ));
        }

        output
    }

    /// Format one assembly as a placement list
    pub fn format_assembly(assembly: &Assembly, puzzle: &Puzzle) -> String {
        let mut output = String::new();
        for annotation in assembly {
            let name = puzzle
                .shapes
                .get(annotation.shape)
                .map(|s| s.name())
                .unwrap_or("?");
            output.push_str(&format!(
                "  {} rotation {:2} at ({}, {}, {})\n",
                name,
                annotation.rotation,
                annotation.offset[0],
                annotation.offset[1],
                annotation.offset[2]
            ));
        }
        output
    }

    /// Format a disassembly trace phase by phase
    pub fn format_trace(trace: &DisassemblyTrace) -> String {
        let mut output = String::new();
        for (i, phase) in trace.phases.iter().enumerate() {
            output.push_str(&format!(
                "  Phase {}: pieces {:?}, {} move(s)\n",
                i + 1,
                phase.pieces,
                phase.states.len()
            ));
            for state in &phase.states {
                output.push_str(&format!(
                    "    move {:?} by ({}, {}, {})\n",
                    state.moving, state.direction[0], state.direction[1], state.direction[2]
                ));
            }
        }
        output
    }

    /// Save a report to the output directory in the configured format
    pub fn save_report<P: AsRef<Path>>(
        report: &PuzzleReport,
        puzzle: &Puzzle,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        match format {
            OutputFormat::Text => {
                let filepath = output_dir.join("report.txt");
                let content = Self::format_report(report, puzzle, true);
                std::fs::write(filepath, content)?;
            }
            OutputFormat::Json => {
                let filepath = output_dir.join("report.json");
                let content = serde_json::to_string_pretty(report)?;
                std::fs::write(filepath, content)?;
            }
        }

        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
            Color::Cyan => 36,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disassembly::{MoveState, SeparationPhase};

    #[test]
    fn test_summary_formatting() {
        let reports = vec![
            SolveReport {
                assembly: 0,
                solvable: true,
                states_explored: 12,
                trace: None,
            },
            SolveReport {
                assembly: 1,
                solvable: false,
                states_explored: 40,
                trace: None,
            },
        ];
        let summary = ReportFormatter::format_report_summary(&reports);
        assert!(summary.contains("yes"));
        assert!(summary.contains("no"));
        assert!(summary.contains("40"));
    }

    #[test]
    fn test_trace_formatting() {
        let trace = DisassemblyTrace {
            phases: vec![SeparationPhase {
                pieces: vec![0, 1],
                states: vec![MoveState {
                    moving: vec![1],
                    direction: [0, 0, 1],
                    offsets: vec![[0, 0, 0], [0, 0, 1]],
                }],
            }],
        };
        let formatted = ReportFormatter::format_trace(&trace);
        assert!(formatted.contains("Phase 1"));
        assert!(formatted.contains("(0, 0, 1)"));
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        // Should either be colored or plain text
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
