use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod host;

use cmdtree::{to_json, to_yaml, CommandTable, CommandTree};
use host::{Choices, LoadOptions, TerminalSender};

/// Load a command definition file and try it out.
#[derive(Debug, Parser)]
#[command(name = "cmdtree", version, about)]
struct Cli {
    /// Command definition file
    #[arg(short, long, env = "CMDTREE_FILE", global = true)]
    file: Option<PathBuf>,

    /// Prefix for qualified labels (`prefix:label`)
    #[arg(long, default_value = "cmdtree", global = true)]
    prefix: String,

    /// Act as the console instead of a player
    #[arg(long, global = true)]
    console: bool,

    /// Grant a permission to the sender; `*` grants all
    #[arg(long = "grant", value_name = "PERMISSION", global = true)]
    grants: Vec<String>,

    /// YAML file overriding user-facing messages
    #[arg(long, value_name = "FILE", global = true)]
    messages: Option<PathBuf>,

    /// Register a custom argument type accepting fixed words (`name=a,b,c`)
    #[arg(long = "choices", value_name = "NAME=VALUES", global = true)]
    choices: Vec<Choices>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Dispatch one command line
    Run {
        /// The command line, label first
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        words: Vec<String>,
    },
    /// Print completions for a partial command line
    Complete {
        /// The partial line; end it with a space to complete the next word
        line: String,
    },
    /// Print the loaded command tree
    Tree {
        #[arg(long, value_enum, default_value_t = Format::Dsl)]
        format: Format,
    },
    /// Read command lines from stdin; lines starting with `?` are completed
    Repl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Dsl,
    Json,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let Some(file) = &cli.file else {
        bail!("no command file given, use --file or set CMDTREE_FILE");
    };
    let options = LoadOptions {
        prefix: &cli.prefix,
        messages: cli.messages.as_deref(),
        choices: &cli.choices,
    };
    let (tree, table) = host::load(file, &options)?;
    let sender = TerminalSender::new(cli.console, &cli.grants);

    match cli.command {
        Commands::Run { words } => {
            if !table.dispatch_line(&tree, &sender, &words.join(" ")) {
                bail!("unknown command '{}'", words[0]);
            }
        }
        Commands::Complete { line } => {
            for candidate in table.complete_line(&tree, &sender, &line).unwrap_or_default() {
                println!("{candidate}");
            }
        }
        Commands::Tree { format } => print_tree(&tree, format)?,
        Commands::Repl => repl(&tree, &table, &sender)?,
    }

    Ok(())
}

fn print_tree(tree: &CommandTree, format: Format) -> Result<()> {
    match format {
        Format::Dsl => print!("{}", tree.forest_to_dsl()),
        Format::Json => println!("{}", to_json(&tree.shapes())?),
        Format::Yaml => print!("{}", to_yaml(&tree.shapes())?),
    }
    Ok(())
}

fn repl(tree: &CommandTree, table: &CommandTable, sender: &TerminalSender) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        match line.trim() {
            "" => continue,
            "exit" | "quit" => break,
            _ => {}
        }

        if let Some(partial) = line.strip_prefix('?') {
            match table.complete_line(tree, sender, partial) {
                Some(candidates) => println!("{}", candidates.join("  ")),
                None => println!("(no completions)"),
            }
        } else if !table.dispatch_line(tree, sender, line) {
            println!("Unknown command. Labels: {}", table.labels().collect::<Vec<_>>().join(", "));
        }
    }
    Ok(())
}
