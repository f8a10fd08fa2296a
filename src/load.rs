//! Reads and parses an input file into the loaded build state.

use crate::eval::Defines;
use crate::graph::Graph;
use crate::logv;
use crate::parse::Parser;
use anyhow::anyhow;
use std::path::Path;

/// Everything the parse phase produces.
pub struct State {
    pub graph: Graph,
    pub defines: Defines,
    pub build_target: Option<String>,
    /// The program text after macro expansion, for preprocess-only mode.
    pub expanded: Vec<u8>,
}

pub fn read(path: &str) -> anyhow::Result<State> {
    let mut bytes =
        std::fs::read(path).map_err(|err| anyhow!("input file {}: {}", path, err))?;
    logv!("read {} ({} bytes)", path, bytes.len());
    bytes.push(0);

    let mut parser = Parser::new(bytes);
    if let Err(err) = parser.parse() {
        return Err(parser.format_parse_error(Path::new(path), err));
    }
    let expanded = parser.expanded_text().to_vec();
    Ok(State {
        graph: parser.graph,
        defines: parser.defines,
        build_target: parser.build_target,
        expanded,
    })
}
