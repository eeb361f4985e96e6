//! Puzzle file loading and saving.
//!
//! Puzzles are stored as YAML: a list of shapes (dense grids given as a
//! layer string) and a list of problems referencing them by index.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::puzzle::problem::{PieceEntry, Problem, Puzzle};
use crate::puzzle::voxel::Voxel;

#[derive(Debug, Serialize, Deserialize)]
struct PuzzleFile {
    shapes: Vec<ShapeDef>,
    problems: Vec<ProblemDef>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ShapeDef {
    name: String,
    /// Grid dimensions as `[x, y, z]`.
    size: [i32; 3],
    /// Cell codes with x varying fastest, then y, then z. Whitespace is
    /// ignored so layers can be split across lines.
    cells: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProblemDef {
    name: String,
    result: usize,
    pieces: Vec<PieceDef>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PieceDef {
    shape: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<u32>,
}

impl PieceDef {
    fn to_entry(&self) -> Result<PieceEntry> {
        match (self.count, self.min, self.max) {
            (Some(count), None, None) => Ok(PieceEntry::fixed(self.shape, count)),
            (None, min, Some(max)) => Ok(PieceEntry::ranged(self.shape, min.unwrap_or(0), max)),
            _ => anyhow::bail!(
                "piece for shape {} must give either 'count' or 'max' (with optional 'min')",
                self.shape
            ),
        }
    }

    fn from_entry(entry: &PieceEntry) -> Self {
        if entry.min == entry.max {
            Self {
                shape: entry.shape,
                count: Some(entry.min),
                min: None,
                max: None,
            }
        } else {
            Self {
                shape: entry.shape,
                count: None,
                min: Some(entry.min),
                max: Some(entry.max),
            }
        }
    }
}

/// Loads and validates a puzzle from a YAML file.
pub fn load_puzzle_from_file(path: &Path) -> Result<Puzzle> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read puzzle file: {}", path.display()))?;
    let puzzle = parse_puzzle(&content)
        .with_context(|| format!("Failed to parse puzzle file: {}", path.display()))?;
    Ok(puzzle)
}

/// Parses and validates a puzzle from YAML text.
pub fn parse_puzzle(content: &str) -> Result<Puzzle> {
    let file: PuzzleFile = serde_yaml::from_str(content).context("Invalid puzzle YAML")?;
    let mut shapes = Vec::with_capacity(file.shapes.len());
    for def in &file.shapes {
        shapes.push(Voxel::parse(
            &def.name,
            def.size[0],
            def.size[1],
            def.size[2],
            &def.cells,
        )?);
    }
    let mut problems = Vec::with_capacity(file.problems.len());
    for def in &file.problems {
        let pieces = def
            .pieces
            .iter()
            .map(PieceDef::to_entry)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Invalid piece list in problem '{}'", def.name))?;
        problems.push(Problem {
            name: def.name.clone(),
            result: def.result,
            pieces,
        });
    }
    let puzzle = Puzzle { shapes, problems };
    puzzle.validate()?;
    Ok(puzzle)
}

/// Saves a puzzle as YAML.
pub fn save_puzzle_to_file(puzzle: &Puzzle, path: &Path) -> Result<()> {
    let file = PuzzleFile {
        shapes: puzzle
            .shapes
            .iter()
            .map(|v| {
                let [x, y, z] = v.dimensions();
                let mut cells = String::with_capacity(v.volume() as usize);
                for zz in 0..z {
                    for yy in 0..y {
                        for xx in 0..x {
                            cells.push(match v.state(xx, yy, zz) {
                                crate::puzzle::voxel::CellState::Filled => '#',
                                crate::puzzle::voxel::CellState::Variable => '+',
                                crate::puzzle::voxel::CellState::Empty => '_',
                            });
                        }
                    }
                }
                ShapeDef {
                    name: v.name().to_string(),
                    size: [x, y, z],
                    cells,
                }
            })
            .collect(),
        problems: puzzle
            .problems
            .iter()
            .map(|p| ProblemDef {
                name: p.name.clone(),
                result: p.result,
                pieces: p.pieces.iter().map(PieceDef::from_entry).collect(),
            })
            .collect(),
    };
    let content = serde_yaml::to_string(&file).context("Failed to serialize puzzle")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write puzzle file: {}", path.display()))?;
    Ok(())
}

/// A small worked example: two bars filling a 2x2x1 slab. Used by the
/// setup command so a fresh checkout has something to solve.
pub fn example_puzzle() -> Puzzle {
    let slab = Voxel::parse("slab", 2, 2, 1, "####").expect("static shape");
    let domino = Voxel::parse("domino", 1, 2, 1, "##").expect("static shape");
    Puzzle {
        shapes: vec![slab, domino],
        problems: vec![Problem {
            name: "two dominoes".to_string(),
            result: 0,
            pieces: vec![PieceEntry::fixed(1, 2)],
        }],
    }
}
