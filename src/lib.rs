//! Scene-view controls for a 3D viewer: camera orbit and fly, sun and
//! environment-light rotation, model manipulation, a render-quality throttle
//! and the run-loop that drives them.

pub mod app;
pub mod config;
pub mod geometry;
pub mod gui;
pub mod interaction;
pub mod render;
