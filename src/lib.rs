//! Gemfall - Match-3 Game Engine Library
//!
//! A UI-free tile-matching engine: board mechanics, run detection,
//! cascade resolution with special tiles, deadlock recovery, session
//! control, and a Monte Carlo balance simulator.
//!
//! A host owns rendering and input. It feeds taps to
//! [`session::Session::select_cell`], applies the returned events, and
//! reads the board back through [`session::Session::board_snapshot`].

pub mod board;
pub mod constants;
pub mod matches;
pub mod moves;
pub mod resolve;
pub mod session;
pub mod simulator;
pub mod tile;
