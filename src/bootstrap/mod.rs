//! Startup wiring: configuration, persistence, chain access and the task graph.

mod controllers;
mod core;
mod periodic;

pub(crate) use controllers::build_controllers;
pub(crate) use core::{CoreBootstrap, build_core};
pub(crate) use periodic::build_periodic_tasks_deps;
