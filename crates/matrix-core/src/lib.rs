//! Task state synchronization for the
//! four-quadrant board: keeps the cards on
//! screen in step with the remote task API.

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod form;
pub mod keyboard;
pub mod notice;
pub mod orchestrator;
pub mod quadrant_list;
pub mod render;
pub mod session;

pub use matrix_shared::{
  ApiEnvelope,
  Quadrant,
  TaskCreate,
  TaskDto,
  TaskId
};
