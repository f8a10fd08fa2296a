//! Runs one build command through the host shell. The child inherits
//! stdio; callers get the exit status.

use std::process::Command;

#[cfg(unix)]
pub fn run_command(cmdline: &str) -> anyhow::Result<i32> {
    use std::os::unix::process::ExitStatusExt;

    let status = Command::new("/bin/sh").arg("-c").arg(cmdline).status()?;
    Ok(match status.code() {
        Some(code) => code,
        // Killed by a signal; report 128+N the way shells do.
        None => 128 + status.signal().unwrap_or(0),
    })
}

#[cfg(windows)]
pub fn run_command(cmdline: &str) -> anyhow::Result<i32> {
    let status = Command::new("cmd").arg("/C").arg(cmdline).status()?;
    Ok(status.code().unwrap_or(1))
}
