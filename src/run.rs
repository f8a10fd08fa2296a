//! Command-line entry point.

use crate::{fatal, load, log, work};
use clap::Parser;

/// xmk, an automated build tool.
#[derive(Parser)]
#[command(name = "xmk")]
struct Args {
    /// only run the preprocessor and print the expanded source
    #[arg(short = 'E')]
    preprocess: bool,

    /// verbose output, twice for extra verbose; ignores quiet mode
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// sets the input xmk file
    #[arg(short = 'f', value_name = "PATH", default_value = "default.xmk")]
    file: String,

    /// quiet mode; commands are not echoed to stdout
    #[arg(short = 'q')]
    quiet: bool,
}

pub fn run() -> anyhow::Result<i32> {
    let args = Args::parse();
    log::init(args.verbose);

    let load::State {
        graph,
        build_target,
        expanded,
        ..
    } = load::read(&args.file)?;

    if args.preprocess {
        print!("{}", String::from_utf8_lossy(&expanded));
        return Ok(0);
    }
    // The program text is only needed for preprocess output.
    drop(expanded);

    let build_target = match build_target {
        Some(target) => target,
        None => fatal!("no build target defined; add \"build TARGET_NAME\""),
    };
    work::Work::new(&graph, args.quiet).run(&build_target)?;
    Ok(0)
}
