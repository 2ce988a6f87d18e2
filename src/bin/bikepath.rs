//! Command-line interface for path expressions
//!
//! Parses expressions and shows their syntax tree, highlight tokens or
//! diagnostics.

use bikepath::diagnostics::{DiagnosticFormatter, Format};
use bikepath::parser::DEFAULT_MAX_DEPTH;
use bikepath::{ParseError, Parser as PathParser, ParserOptions};
use clap::{Parser, Subcommand, ValueEnum};
use std::process;

#[derive(Parser)]
#[command(name = "bikepath")]
#[command(about = "Parse and inspect outline path expressions")]
#[command(version)]
struct Cli {
    /// Log parser activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Nesting budget: one level per parenthesized predicate, two per function argument
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_MAX_DEPTH,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_depth: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an expression and print its syntax tree
    Parse {
        /// Path expression to parse
        expression: String,
        /// Print the tree as JSON
        #[arg(short, long)]
        json: bool,
        /// Suppress informational messages
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the highlight tokens of an expression
    Tokens {
        /// Path expression to tokenize
        expression: String,
        /// Print the tokens as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Check expression syntax and report a diagnostic
    Validate {
        /// Path expression to validate
        expression: String,
        /// Diagnostic output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Compact,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Format::Text,
            OutputFormat::Compact => Format::Compact,
            OutputFormat::Json => Format::Json,
        }
    }
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let options = ParserOptions {
        max_depth: cli.max_depth,
    };

    match cli.command {
        Commands::Parse {
            expression,
            json,
            quiet,
        } => handle_parse(&expression, options, json, quiet),
        Commands::Tokens { expression, json } => handle_tokens(&expression, options, json),
        Commands::Validate { expression, format } => {
            handle_validate(&expression, options, format.into())
        }
    }
}

fn handle_parse(expression: &str, options: ParserOptions, json: bool, quiet: bool) {
    let mut parser = PathParser::new(expression).with_options(options);
    match parser.parse() {
        Ok(ast) => {
            if !quiet {
                eprintln!("Expression: {expression}");
            }
            if json {
                match serde_json::to_string_pretty(&ast) {
                    Ok(output) => println!("{output}"),
                    Err(e) => {
                        eprintln!("Error serializing syntax tree: {e}");
                        process::exit(1);
                    }
                }
            } else {
                println!("{ast:#?}");
            }
        }
        Err(e) => exit_with(&e),
    }
}

fn handle_tokens(expression: &str, options: ParserOptions, json: bool) {
    let mut parser = PathParser::new(expression).with_options(options);
    let result = parser.parse();

    if json {
        match serde_json::to_string_pretty(parser.tokens()) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                eprintln!("Error serializing tokens: {e}");
                process::exit(1);
            }
        }
    } else {
        for token in parser.tokens() {
            println!("{token}");
        }
    }

    if let Err(e) = result {
        exit_with(&e);
    }
}

fn handle_validate(expression: &str, options: ParserOptions, format: Format) {
    let mut parser = PathParser::new(expression).with_options(options);
    match parser.parse() {
        Ok(_) => {
            if format == Format::Json {
                println!("[]");
            } else {
                println!("VALID");
            }
        }
        Err(e) => {
            let formatter = DiagnosticFormatter::new(format);
            println!("{}", formatter.format(&e.to_diagnostic()));
            process::exit(1);
        }
    }
}

fn exit_with(error: &ParseError) -> ! {
    eprintln!("{error}");
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_max_depth_must_be_positive() {
        assert!(Cli::try_parse_from(["bikepath", "--max-depth", "0", "parse", "x"]).is_err());

        let cli = Cli::try_parse_from(["bikepath", "--max-depth", "1", "parse", "x"]).unwrap();
        assert_eq!(cli.max_depth, 1);
        assert!(PathParser::new("x").with_max_depth(cli.max_depth).parse().is_ok());
    }
}
