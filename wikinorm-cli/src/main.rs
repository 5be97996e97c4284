// Command-line interface for wikinorm
//
// This binary reads a wiki document, runs it through the event normalizer and prints the
// normalized result. It is a thin shell over the wikinorm-events library: every bit of
// normalization lives there, this crate only deals with files, flags and configuration.
//
// The source syntax is auto-detected from the file extension, while being overwrittable by
// an explicit --from flag.
// Usage:
//  wikinorm <input> [--from <syntax>] [--to <output>] [--output <file>]   - Normalize (default)
//  wikinorm normalize <input> ...                                         - Same as above (explicit)
//  wikinorm --list-syntaxes                                               - List available syntaxes
//
// Outputs:
//
//  events  - one normalized event per line
//  json    - the event stream as a JSON array
//  tree    - the nested document tree as JSON
//
// Configuration is layered: built-in defaults, then ./wikinorm.toml, then --config <path>,
// then command-line flags.

use clap::{Arg, ArgAction, Command, ValueHint};
use std::fs;
use std::io::Read;
use wikinorm_config::{Loader, OutputFormat, WikinormConfig};
use wikinorm_events::ir::events::listing;
use wikinorm_events::{ImageResolver, LinkResolver, NormalizeError, Normalizer, ParserRegistry};

fn build_cli() -> Command {
    Command::new("wikinorm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Normalize wiki markup into a canonical document event stream")
        .long_about(
            "wikinorm parses a wiki document and prints its normalized event stream.\n\n\
            Examples:\n  \
            wikinorm page.wiki                        # Event listing (stdout)\n  \
            wikinorm page.wiki --to tree              # Document tree as JSON\n  \
            wikinorm capture.json --to json -o out.json\n  \
            wikinorm --list-syntaxes                  # Show available syntaxes"
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
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
                .long_about(
                    "Parse a wiki document and print the normalized result.\n\n\
                    The source syntax is auto-detected from the file extension.\n\
                    Use '-' as input to read from stdin (requires --from).\n\
                    Output goes to stdout by default, or use -o to specify a file."
                )
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
                        .help("Source syntax (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Output form (defaults to output.format from the configuration)")
                        .value_parser(clap::builder::PossibleValuesParser::new(OutputFormat::NAMES))
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
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
        )
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "normalize"
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            if args.len() > 1
                && !args[1].starts_with('-')
                && args[1] != "normalize"
                && args[1] != "help"
            {
                let mut new_args = vec![args[0].clone(), "normalize".to_string()];
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

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    init_logging(&config);

    if matches.get_flag("list-syntaxes") {
        handle_list_syntaxes_command();
        return;
    }

    match matches.subcommand() {
        Some(("normalize", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let to = match sub_matches.get_one::<String>("to") {
                Some(name) => OutputFormat::from_name(name).unwrap_or_else(|| {
                    eprintln!("Error: unknown output '{name}'");
                    std::process::exit(1);
                }),
                None => config.output.format,
            };
            let request = NormalizeRequest {
                input,
                from: sub_matches.get_one::<String>("from").map(|s| s.as_str()),
                to,
                output: sub_matches.get_one::<String>("output").map(|s| s.as_str()),
                links: config.references.links && !sub_matches.get_flag("no-links"),
                images: config.references.images && !sub_matches.get_flag("no-images"),
            };
            handle_normalize_command(&request, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

struct NormalizeRequest<'a> {
    input: &'a str,
    from: Option<&'a str>,
    to: OutputFormat,
    output: Option<&'a str>,
    links: bool,
    images: bool,
}

/// Handle the normalize command
fn handle_normalize_command(request: &NormalizeRequest<'_>, config: &WikinormConfig) {
    let registry = ParserRegistry::default();

    // Auto-detect --from if not provided
    let from = match request.from {
        Some(from) => from.to_string(),
        None => match registry.detect_syntax_from_filename(request.input) {
            Some(detected) => detected,
            None => {
                eprintln!(
                    "Error: Could not detect syntax from filename '{}'",
                    request.input
                );
                eprintln!("Please specify --from explicitly");
                std::process::exit(1);
            }
        },
    };

    let parser = registry.get(&from).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let source = read_input(request.input).unwrap_or_else(|e| {
        eprintln!("Error reading '{}': {e}", request.input);
        std::process::exit(1);
    });

    let mut normalizer = Normalizer::new(parser).with_options((&config.normalizer).into());
    if request.links {
        normalizer = normalizer.with_link_resolver(LinkResolver);
    }
    if request.images {
        normalizer = normalizer.with_image_resolver(ImageResolver);
    }
    log::debug!("normalizing '{}' as {from} into {}", request.input, request.to.name());

    let rendered = render(&normalizer, &source, request.to).unwrap_or_else(|e| {
        eprintln!("Normalization error: {e}");
        std::process::exit(1);
    });

    match request.output {
        Some(path) => {
            fs::write(path, rendered).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{rendered}"),
    }
}

fn render(normalizer: &Normalizer<'_>, source: &str, to: OutputFormat) -> Result<String, RenderError> {
    let mut text = match to {
        OutputFormat::Events => listing(&normalizer.normalize_to_events(source)?),
        OutputFormat::Json => serde_json::to_string_pretty(&normalizer.normalize_to_events(source)?)?,
        OutputFormat::Tree => serde_json::to_string_pretty(&normalizer.normalize_to_tree(source)?)?,
    };
    text.push('\n');
    Ok(text)
}

#[derive(Debug)]
enum RenderError {
    Normalize(NormalizeError),
    Json(serde_json::Error),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Normalize(e) => write!(f, "{e}"),
            RenderError::Json(e) => write!(f, "could not serialize output: {e}"),
        }
    }
}

impl From<NormalizeError> for RenderError {
    fn from(e: NormalizeError) -> Self {
        RenderError::Normalize(e)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::Json(e)
    }
}

fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(input)
    }
}

/// Handle the list-syntaxes command
fn handle_list_syntaxes_command() {
    println!("Available syntaxes:\n");
    let registry = ParserRegistry::default();
    for (syntax, description) in registry.describe() {
        println!("  {syntax:<14}{description}");
    }

    println!("\nOutputs:");
    for name in OutputFormat::NAMES {
        println!("  {name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> WikinormConfig {
    let loader = Loader::new().with_optional_file("wikinorm.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

// RUST_LOG, when set, wins over the configured level.
fn init_logging(config: &WikinormConfig) {
    let level = config
        .logging
        .level
        .parse::<log::LevelFilter>()
        .unwrap_or_else(|_| {
            eprintln!("Invalid logging.level '{}'", config.logging.level);
            std::process::exit(1);
        });
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
