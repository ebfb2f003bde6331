pub mod node;
pub mod output;
pub mod project;
pub mod table;

pub use node::{RawNode, Scalar};
pub use output::Output;
pub use project::{CommitGraph, ParameterSet, ProjectHandle, SchemaVersion};
pub use table::{Cell, Column, Table};
