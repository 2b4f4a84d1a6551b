//! CLI command implementations.

pub(crate) mod ast;
pub(crate) mod render;

use std::io::Read;
use std::path::Path;

pub(crate) use ast::AstArgs;
pub(crate) use render::RenderArgs;

/// Read markdown from `path`, or from stdin when `path` is `-`.
fn read_input(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
}
