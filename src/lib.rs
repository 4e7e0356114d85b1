//! A two-snake duel: a human-steered snake against an AI opponent on a
//! bounded grid, with power-ups, portals and short-lived clones.

pub mod ai;
pub mod app;
pub mod arena;
pub mod config;
pub mod grid;
pub mod items;
pub mod movement;
pub mod outcome;
pub mod persistence;
pub mod render;
pub mod snake;
pub mod stats;
pub mod titles;
