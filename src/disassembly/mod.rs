//! Disassembly analysis: movement generation, BFS search, node pooling
//! and separation traces.

pub mod movement;
pub mod node;
pub mod problem_cache;
pub mod search;
pub mod trace;

pub use movement::{SolverCache, MAX_DISTANCE};
pub use node::{Node, NodeHandle, NodePool, RootDetails};
pub use problem_cache::{AssemblerOptions, ProblemCache, SolveReport};
pub use search::{run, SearchOutcome};
pub use trace::{DisassemblyTrace, MoveState, SeparationPhase};
