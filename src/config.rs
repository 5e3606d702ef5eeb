use std::path::PathBuf;

use clap::Parser;

use crate::render_gl::ShaderPaths;
use crate::resources::{self, Resources, DEFAULT_MAX_FILE_SIZE};

/// Opens a window and draws a quad with a shader pair that reloads on `R`.
#[derive(Debug, Clone, Parser)]
#[command(name = "glitter", version)]
pub struct Config {
    /// Asset root; defaults to the `assets` directory next to the executable
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Vertex shader, relative to the asset root
    #[arg(long, default_value = "shaders/main.vs")]
    pub vertex_shader: String,

    /// Fragment shader, relative to the asset root
    #[arg(long, default_value = "shaders/main.fs")]
    pub fragment_shader: String,

    #[arg(long, default_value = "OpenGL")]
    pub title: String,

    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Draw polygon outlines only
    #[arg(long)]
    pub wireframe: bool,

    /// Largest shader file accepted, in bytes
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_FILE_SIZE,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_shader_size: u64,

    /// env_logger filter, overrides RUST_LOG
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl Config {
    pub fn shader_paths(&self) -> ShaderPaths {
        ShaderPaths::new(self.vertex_shader.clone(), self.fragment_shader.clone())
    }

    pub fn resources(&self) -> Result<Resources, resources::Error> {
        let res = match self.assets {
            Some(ref root) => Resources::from_path(root.clone()),
            None => Resources::from_relative_exe_path(&PathBuf::from("assets"))?,
        };

        Ok(res.with_max_file_size(self.max_shader_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn defaults_point_at_main_shaders() {
        let config = Config::try_parse_from(&["glitter"]).unwrap();

        assert_eq!(
            config.shader_paths(),
            ShaderPaths::new("shaders/main.vs", "shaders/main.fs")
        );
        assert_eq!((config.width, config.height), (1280, 800));
        assert_eq!(config.max_shader_size, DEFAULT_MAX_FILE_SIZE);
        assert!(!config.wireframe);
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn explicit_asset_root_is_used_as_is() {
        let config = Config::try_parse_from(&[
            "glitter",
            "--assets",
            "../Glitter",
            "--vertex-shader",
            "Shaders/main.vs",
            "--max-shader-size",
            "4096",
            "--wireframe",
        ])
        .unwrap();

        let res = config.resources().unwrap();

        assert_eq!(res.root_path(), Path::new("../Glitter"));
        assert_eq!(
            res.path_of(&config.vertex_shader),
            Path::new("../Glitter").join("Shaders").join("main.vs")
        );
        assert!(config.wireframe);
    }

    #[test]
    fn default_asset_root_sits_next_to_executable() {
        let config = Config::try_parse_from(&["glitter"]).unwrap();

        let res = config.resources().unwrap();

        assert!(res.root_path().ends_with("assets"));
        assert!(res.root_path().is_absolute());
    }

    #[test]
    fn zero_shader_size_is_rejected() {
        assert!(Config::try_parse_from(&["glitter", "--max-shader-size", "0"]).is_err());
    }

    #[test]
    fn largest_shader_size_loads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.fs"), b"void main() {}").unwrap();
        let root = dir.path().to_str().unwrap();

        let config = Config::try_parse_from(&[
            "glitter",
            "--assets",
            root,
            "--max-shader-size",
            "18446744073709551615",
        ])
        .unwrap();

        assert_eq!(config.max_shader_size, u64::MAX);
        assert!(config.resources().unwrap().load_cstring("main.fs").is_ok());
    }

    #[test]
    fn rejects_non_numeric_size() {
        assert!(Config::try_parse_from(&["glitter", "--width", "wide"]).is_err());
    }
}
