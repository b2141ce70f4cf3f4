//! Core of a side-scrolling action platformer: platform physics, melee
//! combat, patrolling enemies, loot and progression.
//!
//! The crate is renderer-agnostic.  [`compute::tick`] advances a
//! [`entities::GameState`] by one fixed step and [`compute::visible_bodies`]
//! hands the result to whatever draws it; the bundled binary draws with
//! crossterm.

pub mod camera;
pub mod combat;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod level;
pub mod loot;
pub mod objects;
pub mod patrol;
pub mod physics;
pub mod progression;
