use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use seiri::prelude::*;

/// Canonicalize, compare, and deduplicate node-based workflow graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Canonicalize a workflow file and print (or write) the sorted form
    Canonicalize {
        /// Path to the workflow JSON file
        input: PathBuf,
        /// Write the canonical form here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare two workflow files for structural equivalence
    Compare {
        /// First workflow JSON file
        a: PathBuf,
        /// Second workflow JSON file
        b: PathBuf,
        /// Node IDs of the first workflow whose inputs are ignored
        #[arg(long = "ignore")]
        ignored_nodes: Vec<String>,
    },
    /// Save a workflow into a directory unless an equivalent one exists
    Save {
        /// Path to the workflow JSON file
        input: PathBuf,
        /// Output directory for saved workflows
        #[arg(short, long)]
        dir: PathBuf,
        /// File name stem for a newly saved workflow (supports %node.widget%
        /// and %date:PATTERN% tags)
        #[arg(short, long, default_value = "workflow_")]
        name: String,
        /// Do not append the existing-workflow counter to the file name
        #[arg(long)]
        no_counter: bool,
        /// Node IDs whose inputs are ignored in the duplicate comparison
        #[arg(long = "ignore")]
        ignored_nodes: Vec<String>,
        /// Graph export JSON (enables %node.widget% tags in the file name)
        #[arg(long)]
        graph_info: Option<PathBuf>,
        /// JSON file mapping node type names to display names
        #[arg(long)]
        display_names: Option<PathBuf>,
    },
    /// Count workflow files in a directory
    Count {
        /// Directory to scan
        dir: PathBuf,
        /// Dotted file extension to count
        #[arg(long, default_value = ".json")]
        ext: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Canonicalize { input, output } => run_canonicalize(input, output),
        Command::Compare {
            a,
            b,
            ignored_nodes,
        } => run_compare(a, b, ignored_nodes),
        Command::Save {
            input,
            dir,
            name,
            no_counter,
            ignored_nodes,
            graph_info,
            display_names,
        } => run_save(
            input,
            dir,
            name,
            no_counter,
            ignored_nodes,
            graph_info,
            display_names,
        ),
        Command::Count { dir, ext } => {
            let count = seiri::store::count_files_with_ext(&dir, &[ext.as_str()]);
            println!("{count}");
            ExitCode::SUCCESS
        }
    }
}

fn run_canonicalize(input: PathBuf, output: Option<PathBuf>) -> ExitCode {
    let graph = load_json(&input);
    let sorted = sort_workflow(&graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Canonicalization failed: {}", e)));
    let text = stringify(&sorted);

    match output {
        Some(path) => {
            fs::write(&path, text).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
            });
            println!("Canonical workflow written to {}", path.display());
        }
        None => println!("{text}"),
    }
    ExitCode::SUCCESS
}

fn run_compare(a: PathBuf, b: PathBuf, ignored_nodes: Vec<String>) -> ExitCode {
    let sorted_a = sort_workflow(&load_json(&a))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to canonicalize '{}': {}", a.display(), e)));
    let sorted_b = sort_workflow(&load_json(&b))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to canonicalize '{}': {}", b.display(), e)));

    let equal = are_sorted_workflows_equal(&sorted_a, &sorted_b, &ignored_nodes)
        .unwrap_or_else(|e| exit_with_error(&format!("Comparison failed: {}", e)));

    if equal {
        println!("Workflows are structurally equivalent.");
        ExitCode::SUCCESS
    } else {
        println!("Workflows differ.");
        ExitCode::FAILURE
    }
}

fn run_save(
    input: PathBuf,
    dir: PathBuf,
    name: String,
    no_counter: bool,
    ignored_nodes: Vec<String>,
    graph_info: Option<PathBuf>,
    display_names: Option<PathBuf>,
) -> ExitCode {
    let graph = load_json(&input);

    let names: DisplayNameTable = match display_names {
        Some(path) => serde_json::from_str(&read_file(&path)).unwrap_or_else(|e| {
            exit_with_error(&format!(
                "Failed to parse display names '{}': {}",
                path.display(),
                e
            ))
        }),
        None => DisplayNameTable::new(),
    };
    let info = graph_info.map(|path| load_json(&path));

    // Expand templating tags in the file name before saving.
    let file_name = search_and_replace(&name, Some(&graph), info.as_ref(), &names)
        .unwrap_or_else(|e| exit_with_error(&format!("File name templating failed: {}", e)));

    let store = WorkflowStore::new(dir);
    let request = SaveRequest {
        file_name,
        append_counter: !no_counter,
        ignored_nodes,
        ..SaveRequest::default()
    };
    let outcome = store
        .save_if_unique(Some(&graph), &request)
        .unwrap_or_else(|e| exit_with_error(&format!("Save failed: {}", e)));
    println!("{}", outcome.message());
    ExitCode::SUCCESS
}

fn read_file(path: &PathBuf) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path.display(), e)))
}

fn load_json(path: &PathBuf) -> serde_json::Value {
    serde_json::from_str(&read_file(path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path.display(), e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
