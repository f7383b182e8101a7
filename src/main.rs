use anyhow::{Context, Result};
use clap::{Parser as CliParser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use serde_json::Value;

use sqltree::{format, parse_dialect, Dialect};

const HISTORY_FILE: &str = ".sqltree_history";

#[derive(CliParser)]
#[command(author, version, about = "sqltree - parse SQL into a JSON tree")]
struct Cli {
    /// SQL dialect: ansi, mysql, sqlserver, bigquery
    #[arg(short, long, default_value = "ansi")]
    dialect: Dialect,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive shell
    Shell,

    /// Parse a SQL statement and print its JSON tree
    Parse {
        /// SQL text to parse
        sql: String,
    },

    /// Parse a SQL statement and print it back as formatted SQL
    Format {
        /// SQL text to parse
        sql: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Parse { sql }) => {
            let tree = parse_tree(&sql, cli.dialect)?;
            print_tree(&tree, cli.pretty)?;
        }
        Some(Commands::Format { sql }) => {
            let stmt = parse_dialect(&sql, cli.dialect)
                .with_context(|| format!("failed to parse: {}", sql))?;
            let text = format(&stmt).context("statement cannot be rendered back to SQL")?;
            println!("{}", text);
        }
        Some(Commands::Shell) | None => {
            run_shell(cli.dialect, cli.pretty)?;
        }
    }
    Ok(())
}

fn parse_tree(sql: &str, dialect: Dialect) -> Result<Value> {
    let stmt = parse_dialect(sql, dialect)
        .with_context(|| format!("failed to parse: {}", sql))?;
    Ok(stmt.to_json())
}

fn print_tree(tree: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(tree)?
    } else {
        serde_json::to_string(tree)?
    };
    println!("{}", text);
    Ok(())
}

fn run_shell(dialect: Dialect, pretty: bool) -> Result<()> {
    println!(
        "sqltree shell ({} dialect). Enter SQL, 'help' for assistance or 'exit' to quit.",
        dialect
    );

    let mut rl = Editor::<(), DefaultHistory>::new()?;
    if let Err(err) = rl.load_history(HISTORY_FILE) {
        if !err.to_string().contains("No such file or directory") {
            println!("Error loading history: {}", err);
        }
    }

    loop {
        let readline = rl.readline("sqltree> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);

                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match line.to_lowercase().as_str() {
                    "exit" | "quit" => break,
                    "help" => print_help(),
                    _ => match parse_tree(line, dialect) {
                        Ok(tree) => {
                            if let Err(err) = print_tree(&tree, pretty) {
                                println!("Error: {}", err);
                            }
                        }
                        Err(err) => println!("Error: {:#}", err),
                    },
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }

    if let Err(err) = rl.save_history(HISTORY_FILE) {
        log::warn!("could not save history: {}", err);
    }
    Ok(())
}

fn print_help() {
    println!("Enter a SQL statement to see its JSON tree.");
    println!("Commands:");
    println!("  help          Show this help");
    println!("  exit, quit    Leave the shell");
}
