use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::process;
use std::time::Instant;

use clap::Parser;
use failure::err_msg;
use log::{debug, error, info};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use sdl2::video::GLProfile;

use glitter::config::Config;
use glitter::debug::failure_to_string;
use glitter::input::KeyEdge;
use glitter::logging::init_logging;
use glitter::quad::Quad;
use glitter::render_gl::{self, ColorBuffer, HotProgram, Viewport};

fn main() {
    let config = Config::parse();
    init_logging(config.log_filter.as_deref());

    if let Err(e) = run(config) {
        error!("{}", failure_to_string(e));
        process::exit(1);
    }
}

fn run(config: Config) -> Result<(), failure::Error> {
    let res = config.resources()?;
    info!("Loading assets from {:?}", res.root_path());

    let sdl = sdl2::init().map_err(err_msg)?;
    let video_subsystem = sdl.video().map_err(err_msg)?;

    let gl_attr = video_subsystem.gl_attr();
    gl_attr.set_context_profile(GLProfile::Core);
    gl_attr.set_context_version(4, 1);
    gl_attr.set_context_flags().forward_compatible().set();

    let window = video_subsystem
        .window(&config.title, config.width, config.height)
        .opengl()
        .resizable()
        .build()?;

    let _gl_context = window.gl_create_context().map_err(err_msg)?;
    let gl = gl::Gl::load_with(|s| video_subsystem.gl_get_proc_address(s) as *const c_void);

    info!("OpenGL {}", gl_version(&gl));

    let (w, h) = window.drawable_size();
    let mut viewport = Viewport::for_window(w as i32, h as i32);
    viewport.set_used(&gl);

    let color_buffer = ColorBuffer::from_color(0.25, 0.25, 0.25);
    color_buffer.set_used(&gl);

    let mut program = HotProgram::from_res(&gl, &res, config.shader_paths())?;
    let quad = Quad::new(&gl);

    render_gl::set_wireframe(&gl, config.wireframe);

    let mut reload_key = KeyEdge::new();
    let start = Instant::now();

    let mut event_pump = sdl.event_pump().map_err(err_msg)?;
    'main: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'main,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (w, h) = window.drawable_size();
                    if viewport.update_size(w as i32, h as i32) {
                        debug!("Framebuffer resized to {}x{}", w, h);
                        viewport.set_used(&gl);
                    }
                }
                _ => {}
            }
        }

        let keys = event_pump.keyboard_state();
        if keys.is_scancode_pressed(Scancode::Escape) {
            break;
        }
        if reload_key.pressed(keys.is_scancode_pressed(Scancode::R)) {
            if let Err(e) = program.reload(&res) {
                debug!("{}", e);
            }
        }

        color_buffer.clear(&gl);

        program.set_used();
        if program.has_uniform("time") {
            if let Err(e) = program.set_uniform("time", start.elapsed().as_secs_f32()) {
                debug!("{}", e);
            }
        }
        quad.render(&gl);

        window.gl_swap_window();
    }

    info!("Window closed after {} shader reloads", program.generation());
    Ok(())
}

fn gl_version(gl: &gl::Gl) -> String {
    unsafe {
        let version = gl.GetString(gl::VERSION);
        if version.is_null() {
            return "<unknown>".into();
        }
        CStr::from_ptr(version as *const c_char)
            .to_string_lossy()
            .into_owned()
    }
}
