use std::mem;

use super::shader::{Error, Program, ShaderPaths, UniformValue};
use crate::resources::Resources;

/// Holds exactly one live value and replaces it only with a successfully
/// built successor.
pub struct Reloadable<T> {
    current: T,
    generation: u64,
}

impl<T> Reloadable<T> {
    pub fn new(initial: T) -> Reloadable<T> {
        Reloadable {
            current: initial,
            generation: 0,
        }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    /// Number of successful replacements so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs `build`; on success the new value is adopted and the previous one
    /// dropped. On failure nothing changes.
    pub fn try_replace<E, F>(&mut self, build: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let next = build()?;
        let previous = mem::replace(&mut self.current, next);
        drop(previous);
        self.generation += 1;
        Ok(())
    }
}

/// A program that can be rebuilt from its source files while running.
pub struct HotProgram {
    gl: gl::Gl,
    paths: ShaderPaths,
    program: Reloadable<Program>,
}

impl HotProgram {
    pub fn from_res(gl: &gl::Gl, res: &Resources, paths: ShaderPaths) -> Result<HotProgram, Error> {
        let program = Program::from_res(gl, res, &paths)?;
        info!("Loaded program {} from {:?}", program.id(), paths);

        Ok(HotProgram {
            gl: gl.clone(),
            paths,
            program: Reloadable::new(program),
        })
    }

    pub fn program(&self) -> &Program {
        self.program.current()
    }

    pub fn generation(&self) -> u64 {
        self.program.generation()
    }

    /// Recompiles both stages from disk.
    ///
    /// The running program is replaced only if the new one links; otherwise
    /// it stays in place and the error is returned.
    pub fn reload(&mut self, res: &Resources) -> Result<(), Error> {
        info!("--- Reloading shaders... ---");

        let gl = &self.gl;
        let paths = &self.paths;
        let previous = self.program.current().id();

        match self.program.try_replace(|| Program::from_res(gl, res, paths)) {
            Ok(()) => {
                info!(
                    "Reloaded shaders successfully (program {} replaced {})",
                    self.program.current().id(),
                    previous
                );
                Ok(())
            }
            Err(e) => {
                warn!("Shader reload failed, keeping program {}", previous);
                Err(e)
            }
        }
    }

    pub fn set_used(&self) {
        self.program().set_used();
    }

    pub fn has_uniform(&self, name: &str) -> bool {
        self.program().has_uniform(name)
    }

    pub fn set_uniform<T: UniformValue>(&self, name: &str, value: T) -> Result<(), Error> {
        self.program().set_uniform(name, value)
    }
}
