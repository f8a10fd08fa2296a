//! Build runner: walks the target graph post-order, decides which targets
//! are out of date, and runs their commands through the host shell.

use crate::fs::{self, MTime};
use crate::graph::{Graph, TargetId};
use crate::process;
use crate::{fatal, logv};
use std::fmt;

/// A build command exited with a non-zero status. The process exit code
/// mirrors the child's.
#[derive(Debug)]
pub struct CommandFailed {
    pub code: i32,
}

impl fmt::Display for CommandFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command exited with status {}", self.code)
    }
}

impl std::error::Error for CommandFailed {}

pub struct Work<'a> {
    graph: &'a Graph,
    quiet: bool,
}

impl<'a> Work<'a> {
    pub fn new(graph: &'a Graph, quiet: bool) -> Self {
        Work { graph, quiet }
    }

    /// Builds `name`, first bringing its dependencies up to date.
    pub fn run(&self, name: &str) -> anyhow::Result<()> {
        let mut update_pending = false;
        self.build(name, &mut update_pending)
    }

    fn build(&self, name: &str, parent_update_pending: &mut bool) -> anyhow::Result<()> {
        match self.graph.lookup(name) {
            Some(id) => self.build_target(id, parent_update_pending),
            // A dependency that names no target must be a plain source
            // file already on disk.
            None if fs::exists(name) => Ok(()),
            None => fatal!(
                "target {:?} is neither a known target nor an existing file",
                name
            ),
        }
    }

    fn build_target(&self, id: TargetId, parent_update_pending: &mut bool) -> anyhow::Result<()> {
        let target = self.graph.target(id);
        if target.deps.is_empty() && target.cmds.is_empty() {
            fatal!(
                "no build steps or dependencies given for target {:?}",
                target.name
            );
        }
        logv!(
            "target {:?}: {} dependencies, {} commands",
            target.name,
            target.deps.len(),
            target.cmds.len()
        );

        let mut update_pending = !fs::exists(&target.name);
        for (i, dep) in target.deps.iter().enumerate() {
            logv!("checking dependency {}/{} {:?}", i + 1, target.deps.len(), dep);
            let mut child_update = false;
            self.build(dep, &mut child_update)?;
            if child_update || update_needed(&target.name, dep)? {
                update_pending = true;
            }
        }
        *parent_update_pending = update_pending;

        if !update_pending {
            logv!("target {:?} is up to date", target.name);
            return Ok(());
        }

        logv!("target {:?} must be built", target.name);
        for cmd in &target.cmds {
            if !self.quiet {
                println!("{}", cmd);
            }
            let code = process::run_command(cmd)?;
            if code != 0 {
                return Err(CommandFailed { code }.into());
            }
        }
        if !fs::exists(&target.name) {
            fatal!(
                "commands for {:?} succeeded but the file was not produced",
                target.name
            );
        }
        Ok(())
    }
}

/// A dependency forces a rebuild when it is newer than the target, or
/// when either file is missing.
fn update_needed(target: &str, dep: &str) -> anyhow::Result<bool> {
    Ok(match (fs::stat(target)?, fs::stat(dep)?) {
        (MTime::Stamp(target_mtime), MTime::Stamp(dep_mtime)) => dep_mtime > target_mtime,
        _ => true,
    })
}
