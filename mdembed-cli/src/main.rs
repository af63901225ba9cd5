// Command-line interface for mdembed
//
// Renders one notebook Markdown cell (or any Markdown file) to canonical Markdown with local
// images inlined as data: URIs, or dumps the parsed document for debugging.
//
// Usage:
//  mdembed <input> [--root <dir>] [--no-image-embed] [--no-svg-convert] [-o <file>]
//  mdembed render <input> ...            - Same as above (explicit)
//  mdembed inspect <input>               - Print the parsed document as JSON
//
// Configuration:
//
// Built-in defaults are layered with ./mdembed.toml (when present) and then the file given with
// --config. Flags win over both. Set RUST_LOG=debug to see which images are embedded or skipped.
// With embedding disabled the input is copied through as is.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use mdembed::{embed_images, parse};
use mdembed_config::{ConfigError, Loader, MdembedConfig};
use std::fs;
use std::path::Path;

const SUBCOMMANDS: &[&str] = &["render", "inspect", "help"];

fn build_cli() -> Command {
    Command::new("mdembed")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Re-emit notebook Markdown with local images embedded as data: URIs")
        .long_about(
            "mdembed parses Markdown with LaTeX math kept verbatim, re-emits it as canonical\n\
            Markdown and replaces local images (Markdown images and raw HTML <img> tags)\n\
            with base64 data: URIs. SVGs are rasterized to PNG unless disabled.\n\n\
            Examples:\n  \
            mdembed cell.md                         # Render to stdout ('render' is optional)\n  \
            mdembed render cell.md -o out.md        # Render to a file\n  \
            mdembed cell.md --root notebooks/       # Resolve images against notebooks/\n  \
            mdembed inspect cell.md                 # Parsed document as JSON",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
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
                .arg(
                    Arg::new("input")
                        .help("Input Markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("root")
                        .long("root")
                        .value_name("DIR")
                        .help("Directory relative image paths resolve against")
                        .long_help(
                            "Directory relative image paths resolve against.\n\n\
                            Defaults to embed.root_path from the configuration, or else\n\
                            the directory containing the input file.",
                        )
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
                .arg(
                    Arg::new("input")
                        .help("Input Markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            // A bare file argument means the default command
            if args.len() > 1 && !args[1].starts_with('-') && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "render".to_string()];
                new_args.extend_from_slice(&args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    match matches.subcommand() {
        Some(("render", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let config_path = sub_matches.get_one::<String>("config").map(|s| s.as_str());
            let config = load_cli_config(config_path, sub_matches);
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_render_command(input, output, &config);
        }
        Some(("inspect", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            handle_inspect_command(input);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Handle the render command
fn handle_render_command(input: &str, output: Option<&str>, config: &MdembedConfig) {
    let source = read_input(input);

    let rendered = if config.embed.enabled {
        let options = config.embed.options(input_dir(input));
        log::debug!("resolving images against {}", options.root_path.display());
        embed_images(&source, &options).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        })
    } else {
        log::debug!("image embedding disabled, writing {input} unchanged");
        source
    };

    match output {
        Some(path) => {
            fs::write(path, rendered).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{rendered}"),
    }
}

/// Handle the inspect command
fn handle_inspect_command(input: &str) {
    let source = read_input(input);
    let document = parse(&source);
    let json = serde_json::to_string_pretty(&document).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });
    println!("{json}");
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Directory containing `input`, `.` for a bare file name.
fn input_dir(input: &str) -> &Path {
    match Path::new(input).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn load_cli_config(explicit_path: Option<&str>, matches: &ArgMatches) -> MdembedConfig {
    let loader = Loader::new().with_optional_file("mdembed.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    apply_flag_overrides(loader, matches)
        .and_then(Loader::build)
        .unwrap_or_else(|err| {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        })
}

fn apply_flag_overrides(
    mut loader: Loader,
    matches: &ArgMatches,
) -> Result<Loader, ConfigError> {
    if let Some(root) = matches.get_one::<String>("root") {
        loader = loader.set_override("embed.root_path", root.as_str())?;
    }
    if matches.get_flag("no-image-embed") {
        loader = loader.set_override("embed.enabled", false)?;
    }
    if matches.get_flag("no-svg-convert") {
        loader = loader.set_override("embed.convert_svgs", false)?;
    }
    Ok(loader)
}
