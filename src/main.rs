//! Blueprint Catalog CLI
//!
//! Entry point for the `catalog` command-line tool.

use blueprint_catalog::config::{parse_overrides, parse_value};
use blueprint_catalog::logging::init_tracing;
use blueprint_catalog::{discounted_price, Catalog, LoadedCatalog, Value};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Product catalog built from composable blueprints", version)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the label of every product
    List {
        /// Catalog file (default: built-in sample catalog)
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show one product
    Show {
        /// Product id
        id: String,

        /// Catalog file (default: built-in sample catalog)
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,

        /// Field override composed last (KEY=VALUE, repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Invoke a behavior on a product
    Call {
        /// Product id
        id: String,

        /// Behavior name (e.g. get_label, read, discounted_price)
        behavior: String,

        /// Behavior arguments
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,

        /// Catalog file (default: built-in sample catalog)
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Compute a discounted price
    Discount {
        #[arg(allow_negative_numbers = true)]
        price: f64,

        /// Percentage in [0, 100]; anything else keeps the price
        #[arg(allow_negative_numbers = true)]
        percent: f64,
    },

    /// Load a catalog file and print a summary
    Verify {
        /// Catalog file
        #[arg(long, short = 'f')]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Commands::List { file, json } => run_list(file.as_deref(), json),
        Commands::Show {
            id,
            file,
            set,
            json,
        } => run_show(&id, file.as_deref(), &set, json),
        Commands::Call {
            id,
            behavior,
            args,
            file,
        } => run_call(&id, &behavior, &args, file.as_deref()),
        Commands::Discount { price, percent } => {
            println!("{:.2}", discounted_price(price, percent));
        }
        Commands::Verify { file } => run_verify(&file),
    }
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", context, err);
    process::exit(1);
}

fn load_catalog(path: Option<&Path>) -> Catalog {
    match path {
        Some(path) => match LoadedCatalog::load(path) {
            Ok(loaded) => loaded.catalog,
            Err(e) => fail("Error loading catalog", e),
        },
        None => Catalog::builtin(),
    }
}

fn run_list(path: Option<&Path>, json_output: bool) {
    let catalog = load_catalog(path);

    if json_output {
        let report = match catalog.report() {
            Ok(r) => r,
            Err(e) => fail("Error building report", e),
        };
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => fail("Error serializing output", e),
        }
        return;
    }

    match catalog.labels() {
        Ok(labels) => {
            for (_, label) in labels {
                println!("{}", label);
            }
        }
        Err(e) => fail("Error rendering labels", e),
    }
}

fn run_show(id: &str, path: Option<&Path>, set: &[String], json_output: bool) {
    let mut catalog = load_catalog(path);

    let overrides = match parse_overrides(set) {
        Ok(o) => o,
        Err(e) => fail("Invalid override", e),
    };
    catalog.apply_overrides(&overrides);

    let product = match catalog.require_product(id) {
        Ok(p) => p,
        Err(e) => fail("Error", e),
    };

    if json_output {
        match serde_json::to_string_pretty(product) {
            Ok(json) => println!("{}", json),
            Err(e) => fail("Error serializing output", e),
        }
        return;
    }

    match catalog.call(id, "get_label", &[]) {
        Ok(label) => println!("{}", label),
        Err(e) => fail("Error rendering label", e),
    }
    println!("{}", product);
}

fn run_call(id: &str, behavior: &str, args: &[String], path: Option<&Path>) {
    let catalog = load_catalog(path);
    let args: Vec<Value> = args.iter().map(|a| parse_value(a)).collect();

    match catalog.call(id, behavior, &args) {
        Ok(Value::Number(n)) => println!("{:.2}", n),
        Ok(value) => println!("{}", value),
        Err(e) => fail("Error", e),
    }
}

fn run_verify(path: &Path) {
    let loaded = match LoadedCatalog::load(path) {
        Ok(l) => l,
        Err(e) => fail("Catalog error", e),
    };

    println!("Catalog valid: {}", loaded.source.path);
    println!();
    println!("  Digest: {}", loaded.source.digest);
    let blueprints: Vec<&str> = loaded.catalog.blueprint_names().collect();
    println!("  Blueprints: {}", blueprints.join(", "));
    println!("  Products: {}", loaded.catalog.len());

    match loaded.catalog.report() {
        Ok(report) => {
            for entry in &report.products {
                println!("    {} {}", entry.id, entry.label);
            }
        }
        Err(e) => fail("Catalog error", e),
    }
}
