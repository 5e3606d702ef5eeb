use std::collections::HashMap;
use std::ffi::{CStr, CString};

use crate::resources::{self, Resources};

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Failed to load resource {}", name)]
    ResourceLoad {
        name: String,
        #[cause]
        inner: resources::Error,
    },
    #[fail(display = "Can not determine shader type for resource {}", name)]
    CanNotDetermineShaderTypeForResource { name: String },
    #[fail(display = "Failed to compile shader {}: {}", name, message)]
    CompileError { name: String, message: String },
    #[fail(display = "Failed to link program {}: {}", name, message)]
    LinkError { name: String, message: String },
    #[fail(display = "Program has no active uniform {}", name)]
    UnknownUniform { name: String },
    #[fail(display = "Uniform {} does not accept a {} value", name, expected)]
    UniformTypeMismatch { name: String, expected: &'static str },
}

/// Vertex and fragment stage resource names of one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderPaths {
    pub fn new<V: Into<String>, F: Into<String>>(vertex: V, fragment: F) -> ShaderPaths {
        ShaderPaths {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    fn describe(&self) -> String {
        format!("{} + {}", self.vertex, self.fragment)
    }
}

struct Uniform {
    location: gl::types::GLint,
    typ: gl::types::GLenum,
}

/// A linked program. The GL object is deleted on drop.
pub struct Program {
    gl: gl::Gl,
    id: gl::types::GLuint,

    uniforms: HashMap<String, Uniform>,
}

impl Program {
    pub fn from_res(gl: &gl::Gl, res: &Resources, paths: &ShaderPaths) -> Result<Program, Error> {
        let vert = Shader::from_res(gl, res, &paths.vertex);
        let frag = Shader::from_res(gl, res, &paths.fragment);

        let shaders = collect_stages(vert, frag)?;

        Program::from_shaders(gl, &shaders[..]).map_err(|message| Error::LinkError {
            name: paths.describe(),
            message,
        })
    }

    pub fn from_sources(gl: &gl::Gl, vert: &CStr, frag: &CStr) -> Result<Program, Error> {
        let vert = Shader::from_vert_source(gl, vert).map_err(|message| Error::CompileError {
            name: "<vertex source>".into(),
            message,
        });
        let frag = Shader::from_frag_source(gl, frag).map_err(|message| Error::CompileError {
            name: "<fragment source>".into(),
            message,
        });

        let shaders = collect_stages(vert, frag)?;

        Program::from_shaders(gl, &shaders[..]).map_err(|message| Error::LinkError {
            name: "<sources>".into(),
            message,
        })
    }

    pub fn from_shaders(gl: &gl::Gl, shaders: &[Shader]) -> Result<Program, String> {
        let program_id = unsafe { gl.CreateProgram() };

        for shader in shaders {
            unsafe {
                gl.AttachShader(program_id, shader.id());
            }
        }

        unsafe {
            gl.LinkProgram(program_id);
        }

        let mut success: gl::types::GLint = 1;
        unsafe {
            gl.GetProgramiv(program_id, gl::LINK_STATUS, &mut success);
        }

        if success == 0 {
            let mut len: gl::types::GLint = 0;
            unsafe {
                gl.GetProgramiv(program_id, gl::INFO_LOG_LENGTH, &mut len);
            }

            let mut buffer = vec![0u8; len.max(1) as usize];
            let mut written: gl::types::GLsizei = 0;
            unsafe {
                gl.GetProgramInfoLog(
                    program_id,
                    buffer.len() as gl::types::GLsizei,
                    &mut written,
                    buffer.as_mut_ptr() as *mut gl::types::GLchar,
                );
                gl.DeleteProgram(program_id);
            }

            let message = info_log_to_string(buffer, written);
            error!("Failed to link program: {}", message);
            return Err(message);
        }

        for shader in shaders {
            unsafe {
                gl.DetachShader(program_id, shader.id());
            }
        }

        let uniforms = Program::get_uniforms(gl, program_id);
        debug!(
            "Linked program {} with {} active uniforms",
            program_id,
            uniforms.len()
        );

        Ok(Program {
            gl: gl.clone(),
            id: program_id,
            uniforms,
        })
    }

    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }

    pub fn set_used(&self) {
        unsafe {
            self.gl.UseProgram(self.id);
        }
    }

    fn get_uniforms(gl: &gl::Gl, id: gl::types::GLuint) -> HashMap<String, Uniform> {
        let mut uniforms = HashMap::new();

        let mut total: gl::types::GLint = 0;
        unsafe {
            gl.GetProgramiv(id, gl::ACTIVE_UNIFORMS, &mut total);
        }

        for index in 0..total.max(0) {
            let mut name_len: gl::types::GLsizei = 0;
            let mut size: gl::types::GLint = 0;
            let mut typ: gl::types::GLenum = gl::ZERO;
            let mut name = vec![0u8; 256];

            unsafe {
                gl.GetActiveUniform(
                    id,
                    index as gl::types::GLuint,
                    name.len() as gl::types::GLsizei,
                    &mut name_len,
                    &mut size,
                    &mut typ,
                    name.as_mut_ptr() as *mut gl::types::GLchar,
                );
            }
            name.truncate(name_len.max(0) as usize);

            let name = match CString::new(name) {
                Ok(name) => name,
                Err(_) => continue,
            };
            let location = unsafe { gl.GetUniformLocation(id, name.as_ptr()) };

            uniforms.insert(
                uniform_key(&name.to_string_lossy()).to_owned(),
                Uniform { location, typ },
            );
        }

        uniforms
    }

    pub fn has_uniform(&self, name: &str) -> bool {
        self.uniforms.contains_key(name)
    }

    /// Sets an active uniform of this program.
    ///
    /// The program must be in use (`set_used`).
    pub fn set_uniform<T: UniformValue>(&self, name: &str, value: T) -> Result<(), Error> {
        let uniform = self.uniforms.get(name).ok_or_else(|| Error::UnknownUniform {
            name: name.into(),
        })?;

        if !T::accepts(uniform.typ) {
            return Err(Error::UniformTypeMismatch {
                name: name.into(),
                expected: T::TYPE_NAME,
            });
        }

        value.upload(&self.gl, uniform.location);
        Ok(())
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe {
            self.gl.DeleteProgram(self.id);
        }
    }
}

/// A value that can be written to a uniform of a matching GL type.
pub trait UniformValue {
    const TYPE_NAME: &'static str;

    fn accepts(typ: gl::types::GLenum) -> bool;

    fn upload(&self, gl: &gl::Gl, location: gl::types::GLint);
}

impl UniformValue for f32 {
    const TYPE_NAME: &'static str = "float";

    fn accepts(typ: gl::types::GLenum) -> bool {
        typ == gl::FLOAT
    }

    fn upload(&self, gl: &gl::Gl, location: gl::types::GLint) {
        unsafe {
            gl.Uniform1f(location, *self);
        }
    }
}

impl UniformValue for i32 {
    const TYPE_NAME: &'static str = "int";

    fn accepts(typ: gl::types::GLenum) -> bool {
        match typ {
            gl::INT | gl::BOOL | gl::SAMPLER_1D | gl::SAMPLER_2D | gl::SAMPLER_3D
            | gl::SAMPLER_CUBE => true,
            _ => false,
        }
    }

    fn upload(&self, gl: &gl::Gl, location: gl::types::GLint) {
        unsafe {
            gl.Uniform1i(location, *self);
        }
    }
}

impl UniformValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn accepts(typ: gl::types::GLenum) -> bool {
        typ == gl::BOOL || typ == gl::INT
    }

    fn upload(&self, gl: &gl::Gl, location: gl::types::GLint) {
        (*self as i32).upload(gl, location)
    }
}

/// A compiled shader stage. The GL object is deleted on drop.
pub struct Shader {
    gl: gl::Gl,
    id: gl::types::GLuint,
}

impl Shader {
    pub fn from_res(gl: &gl::Gl, res: &Resources, name: &str) -> Result<Shader, Error> {
        let shader_kind = shader_kind_for(name).ok_or_else(|| {
            Error::CanNotDetermineShaderTypeForResource { name: name.into() }
        })?;

        let source = res.load_cstring(name).map_err(|e| Error::ResourceLoad {
            name: name.into(),
            inner: e,
        })?;

        info!("Read {} bytes from {}", source.as_bytes().len(), name);
        trace!("{}", source.to_string_lossy());

        Shader::from_source(gl, &source, shader_kind).map_err(|message| Error::CompileError {
            name: name.into(),
            message,
        })
    }

    pub fn from_source(
        gl: &gl::Gl,
        source: &CStr,
        kind: gl::types::GLenum,
    ) -> Result<Shader, String> {
        // owned before the status check so a failed stage is still deleted
        let shader = Shader {
            gl: gl.clone(),
            id: unsafe { gl.CreateShader(kind) },
        };
        compile(gl, shader.id, source)?;
        Ok(shader)
    }

    pub fn from_vert_source(gl: &gl::Gl, source: &CStr) -> Result<Shader, String> {
        Shader::from_source(gl, source, gl::VERTEX_SHADER)
    }

    pub fn from_frag_source(gl: &gl::Gl, source: &CStr) -> Result<Shader, String> {
        Shader::from_source(gl, source, gl::FRAGMENT_SHADER)
    }

    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.DeleteShader(self.id);
        }
    }
}

fn compile(gl: &gl::Gl, id: gl::types::GLuint, source: &CStr) -> Result<(), String> {
    unsafe {
        gl.ShaderSource(id, 1, &source.as_ptr(), std::ptr::null());
        gl.CompileShader(id);
    }

    let mut success: gl::types::GLint = 1;
    unsafe {
        gl.GetShaderiv(id, gl::COMPILE_STATUS, &mut success);
    }

    if success == 0 {
        let mut len: gl::types::GLint = 0;
        unsafe {
            gl.GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut len);
        }

        let mut buffer = vec![0u8; len.max(1) as usize];
        let mut written: gl::types::GLsizei = 0;
        unsafe {
            gl.GetShaderInfoLog(
                id,
                buffer.len() as gl::types::GLsizei,
                &mut written,
                buffer.as_mut_ptr() as *mut gl::types::GLchar,
            );
        }

        return Err(info_log_to_string(buffer, written));
    }

    Ok(())
}

/// Both stages are compiled before either error is returned, so each
/// failing stage gets its own diagnostic.
fn collect_stages(
    vert: Result<Shader, Error>,
    frag: Result<Shader, Error>,
) -> Result<Vec<Shader>, Error> {
    if let Err(ref e) = vert {
        log_stage_error(e);
    }
    if let Err(ref e) = frag {
        log_stage_error(e);
    }

    Ok(vec![vert?, frag?])
}

/// Arrays are reported as `name[0]`; they are set through their plain name.
fn uniform_key(name: &str) -> &str {
    name.strip_suffix("[0]").unwrap_or(name)
}

fn log_stage_error(e: &Error) {
    match *e {
        Error::ResourceLoad { ref inner, .. } => error!("{}: {}", e, inner),
        _ => error!("{}", e),
    }
}

pub(crate) fn shader_kind_for(name: &str) -> Option<gl::types::GLenum> {
    const POSSIBLE_EXT: [(&str, gl::types::GLenum); 4] = [
        (".vs", gl::VERTEX_SHADER),
        (".vert", gl::VERTEX_SHADER),
        (".fs", gl::FRAGMENT_SHADER),
        (".frag", gl::FRAGMENT_SHADER),
    ];

    POSSIBLE_EXT
        .iter()
        .find(|&&(file_extension, _)| name.ends_with(file_extension))
        .map(|&(_, kind)| kind)
}

/// Decodes an info log of which the driver `written` bytes, minus the terminator.
pub(crate) fn info_log_to_string(mut buffer: Vec<u8>, written: gl::types::GLsizei) -> String {
    let written = (written.max(0) as usize).min(buffer.len());
    buffer.truncate(written);
    if let Some(nul) = buffer.iter().position(|&b| b == 0) {
        buffer.truncate(nul);
    }

    String::from_utf8_lossy(&buffer).trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn unloaded_gl() -> gl::Gl {
        gl::Gl::load_with(|_| std::ptr::null())
    }

    #[test]
    fn missing_sources_abort_before_compiling() {
        let dir = tempfile::tempdir().unwrap();
        let res = Resources::from_path(dir.path());
        let paths = ShaderPaths::new("shaders/main.vs", "shaders/main.fs");

        match Program::from_res(&unloaded_gl(), &res, &paths) {
            Err(Error::ResourceLoad {
                name,
                inner: resources::Error::NotFound { path },
            }) => {
                assert_eq!(name, "shaders/main.vs");
                assert_eq!(path, dir.path().join("shaders").join("main.vs"));
            }
            Err(other) => panic!("expected ResourceLoad, got {:?}", other),
            Ok(_) => panic!("missing files must not produce a program"),
        }
    }

    #[test]
    fn unknown_extension_is_rejected_before_loading() {
        let dir = tempfile::tempdir().unwrap();
        let res = Resources::from_path(dir.path());

        match Shader::from_res(&unloaded_gl(), &res, "shaders/main.glsl") {
            Err(Error::CanNotDetermineShaderTypeForResource { name }) => {
                assert_eq!(name, "shaders/main.glsl")
            }
            Err(other) => panic!("expected CanNotDetermineShaderTypeForResource, got {:?}", other),
            Ok(_) => panic!("stage should not be guessed"),
        }
    }

    #[test]
    fn vertex_stage_error_wins() {
        let vert = Err(Error::CompileError {
            name: "shaders/main.vs".into(),
            message: "0:1(1): error: syntax error".into(),
        });
        let frag = Err(Error::ResourceLoad {
            name: "shaders/main.fs".into(),
            inner: resources::Error::NotFound {
                path: Path::new("assets/shaders/main.fs").into(),
            },
        });

        match collect_stages(vert, frag) {
            Err(Error::CompileError { name, message }) => {
                assert_eq!(name, "shaders/main.vs");
                assert_eq!(message, "0:1(1): error: syntax error");
            }
            Err(other) => panic!("expected CompileError, got {:?}", other),
            Ok(_) => panic!("failed stages must not be collected"),
        }
    }

    #[test]
    fn empty_vertex_source_aborts_before_compiling() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("shaders")).unwrap();
        std::fs::write(dir.path().join("shaders").join("main.vs"), b"").unwrap();
        let res = Resources::from_path(dir.path());

        let vert = Shader::from_res(&unloaded_gl(), &res, "shaders/main.vs");
        let frag = Shader::from_res(&unloaded_gl(), &res, "shaders/main.fs");

        match collect_stages(vert, frag) {
            Err(Error::ResourceLoad {
                inner: resources::Error::EmptyFile { .. },
                ..
            }) => {}
            Err(other) => panic!("expected the vertex EmptyFile error, got {:?}", other),
            Ok(_) => panic!("failed stages must not be collected"),
        }
    }

    #[test]
    fn array_uniforms_are_keyed_by_plain_name() {
        assert_eq!(uniform_key("lights[0]"), "lights");
        assert_eq!(uniform_key("time"), "time");
        assert_eq!(uniform_key("material.color"), "material.color");
    }

    #[test]
    fn stage_is_picked_from_extension() {
        assert_eq!(shader_kind_for("shaders/main.vs"), Some(gl::VERTEX_SHADER));
        assert_eq!(shader_kind_for("triangle.vert"), Some(gl::VERTEX_SHADER));
        assert_eq!(shader_kind_for("shaders/main.fs"), Some(gl::FRAGMENT_SHADER));
        assert_eq!(shader_kind_for("triangle.frag"), Some(gl::FRAGMENT_SHADER));
        assert_eq!(shader_kind_for("shaders/main.glsl"), None);
    }

    #[test]
    fn info_log_stops_at_written_length() {
        let mut buffer = b"0:3(1): error: syntax error\n".to_vec();
        buffer.extend_from_slice(&[0, b'x', b'x']);

        let message = info_log_to_string(buffer, 28);

        assert_eq!(message, "0:3(1): error: syntax error");
    }

    #[test]
    fn info_log_stops_at_terminator() {
        let message = info_log_to_string(b"bad link\0garbage".to_vec(), 16);

        assert_eq!(message, "bad link");
    }

    #[test]
    fn info_log_tolerates_bogus_lengths() {
        assert_eq!(info_log_to_string(b"abc".to_vec(), -1), "");
        assert_eq!(info_log_to_string(b"abc".to_vec(), 99), "abc");
    }

    #[test]
    fn uniform_types_are_matched() {
        assert!(f32::accepts(gl::FLOAT));
        assert!(!f32::accepts(gl::INT));

        assert!(i32::accepts(gl::INT));
        assert!(i32::accepts(gl::SAMPLER_2D));
        assert!(!i32::accepts(gl::FLOAT));

        assert!(bool::accepts(gl::BOOL));
        assert!(bool::accepts(gl::INT));
        assert!(!bool::accepts(gl::FLOAT_VEC2));
    }

    #[test]
    fn shader_paths_describe_both_stages() {
        let paths = ShaderPaths::new("shaders/main.vs", "shaders/main.fs");

        assert_eq!(paths.describe(), "shaders/main.vs + shaders/main.fs");
    }
}
