use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree in src/main.rs
// Build scripts can't reach src/ modules, so the flags are repeated here
fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input Markdown file")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("mdembed")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Re-emit notebook Markdown with local images embedded as data: URIs")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a mdembed.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .about("Render a Markdown file with images embedded (default command)")
                .arg(input_arg())
                .arg(
                    Arg::new("root")
                        .long("root")
                        .value_name("DIR")
                        .help("Directory relative image paths resolve against")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("no-image-embed")
                        .long("no-image-embed")
                        .help("Write the input unchanged instead of re-rendering it")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-svg-convert")
                        .long("no-svg-convert")
                        .help("Embed SVGs as image/svg+xml instead of rasterizing them")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the parsed document as JSON")
                .arg(input_arg()),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "mdembed", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "mdembed", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "mdembed", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
