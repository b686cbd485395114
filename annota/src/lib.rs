#![warn(clippy::pedantic)]

pub mod clock;
pub mod gizmos;
pub mod input;
pub mod pen_tools;
pub mod script;
pub mod settings;
