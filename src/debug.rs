/// Renders an error with its whole cause chain, innermost cause first.
pub fn failure_to_string(e: failure::Error) -> String {
    use std::fmt::Write;

    let mut result = String::new();

    for (i, cause) in e
        .iter_chain()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .enumerate()
    {
        if i > 0 {
            let _ = writeln!(&mut result, "   Which caused the following issue:");
        }
        let _ = write!(&mut result, "{}", cause);
        if let Some(backtrace) = cause.backtrace() {
            let backtrace_str = format!("{}", backtrace);
            if !backtrace_str.is_empty() {
                let _ = writeln!(&mut result, " This happened at {}", backtrace);
            } else {
                let _ = writeln!(&mut result);
            }
        } else {
            let _ = writeln!(&mut result);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_gl;
    use crate::resources;
    use std::path::PathBuf;

    #[test]
    fn chain_is_printed_innermost_first() {
        let e = render_gl::Error::ResourceLoad {
            name: "shaders/main.vs".into(),
            inner: resources::Error::NotFound {
                path: PathBuf::from("assets/shaders/main.vs"),
            },
        };

        let text = failure_to_string(e.into());
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("File \"assets/shaders/main.vs\" does not exist"));
        assert_eq!(lines[1], "   Which caused the following issue:");
        assert!(lines[2].starts_with("Failed to load resource shaders/main.vs"));
    }
}
