use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of OutputFormat::NAMES from wikinorm-config
// We need to duplicate this here since build scripts can't access other crates' modules
const OUTPUT_FORMATS: &[&str] = &["events", "json", "tree"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("wikinorm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Normalize wiki markup into a canonical document event stream")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-syntaxes")
                .long("list-syntaxes")
                .help("List available source syntaxes")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a wikinorm.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("normalize")
                .about("Normalize a wiki document (default command)")
                .arg(
                    Arg::new("input")
                        .help("Input file path, or '-' for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source syntax")
                        .value_parser(["sketch/1.0", "events/json"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Output form")
                        .value_parser(clap::builder::PossibleValuesParser::new(OUTPUT_FORMATS))
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("no-links")
                        .long("no-links")
                        .help("Drop links instead of resolving them")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-images")
                        .long("no-images")
                        .help("Drop images instead of resolving them")
                        .action(ArgAction::SetTrue),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "wikinorm", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "wikinorm", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "wikinorm", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
