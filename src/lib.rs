#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

pub mod config;
pub mod debug;
pub mod input;
pub mod logging;
pub mod quad;
pub mod render_gl;
pub mod resources;
