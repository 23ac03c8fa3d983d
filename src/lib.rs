//! Guillotine cutting-stock optimizer for rectangular panels.
//!
//! [`optimize`] lays pieces out on fixed-size panels with a saw kerf between
//! them, and [`derive_cut_sequence`] turns a finished panel into rip and cross
//! cuts a panel saw operator can follow.

pub mod config;
pub mod cutlist;
pub mod error;
pub mod guillotine;
pub mod offcut;
pub mod project;
pub mod render;
pub mod solver;
pub mod summary;
pub mod types;

pub use cutlist::{CrossCut, RipCut, derive_cut_sequence};
pub use error::{Error, Result};
pub use solver::{Solver, optimize};
pub use types::{EdgeBanding, Offcut, Panel, Piece, PlacedPiece, Rotation, Solution};
