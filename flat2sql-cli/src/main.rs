use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::Table;
use flat2sql_common::Config;
use flat2sql_core::{
    generate_script, scan_file, scan_with_cleaned, summary_rows, Dialect, FileProfile,
    SUMMARY_HEADER,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "flat2sql", version, about = "Delimited-file profiler and SQL generator")]
struct Cli {
    /// show debugging info (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct DelimiterArg {
    /// comma delimited file
    #[arg(short = 'C', long)]
    comma: bool,
    /// tab delimited file
    #[arg(short = 'T', long)]
    tab: bool,
}

impl DelimiterArg {
    fn as_byte(&self) -> u8 {
        if self.tab {
            b'\t'
        } else {
            b','
        }
    }
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct DialectArg {
    /// generate MySQL DDL and LOAD DATA
    #[arg(short = 'M', long)]
    mysql: bool,
    /// generate SQLite DDL and .import directives
    #[arg(short = 'S', long)]
    sqlite: bool,
}

impl DialectArg {
    fn as_dialect(&self) -> Dialect {
        if self.mysql {
            Dialect::MySql
        } else {
            Dialect::Sqlite
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Profile a delimited file and print a per-column summary
    Profile {
        input_file: PathBuf,
        #[command(flatten)]
        delimiter: DelimiterArg,
        /// report format
        #[arg(short = 'f', long, value_parser = ["pretty", "tab", "json"])]
        format: Option<String>,
    },
    /// Generate CREATE TABLE and bulk-import SQL plus a cleaned data file
    ToSql {
        input_file: PathBuf,
        #[command(flatten)]
        delimiter: DelimiterArg,
        #[command(flatten)]
        dialect: DialectArg,
        /// table name used in the generated SQL
        #[arg(short = 'n', long = "tablename")]
        table_name: String,
        /// output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load().unwrap_or_default();
    match cli.command {
        Commands::Profile {
            input_file,
            delimiter,
            format,
        } => {
            let format = format.unwrap_or_else(|| config.report.format.clone());
            run_profile(&input_file, delimiter.as_byte(), &format)
        }
        Commands::ToSql {
            input_file,
            delimiter,
            dialect,
            table_name,
            output,
        } => {
            let out_dir =
                output.unwrap_or_else(|| PathBuf::from(config.sql.output_dir.clone()));
            run_to_sql(
                &input_file,
                delimiter.as_byte(),
                dialect.as_dialect(),
                &table_name,
                &out_dir,
            )
        }
    }
}

fn run_profile(input: &Path, delimiter: u8, format: &str) -> Result<()> {
    let profile = scan_file(input, delimiter)
        .with_context(|| format!("failed to profile {}", input.display()))?;
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&profile)?),
        "tab" => {
            println!("{}", SUMMARY_HEADER.join("\t"));
            for row in summary_rows(&profile.columns) {
                println!("{}", row.join("\t"));
            }
        }
        _ => print_summary_table(&profile),
    }
    Ok(())
}

fn run_to_sql(
    input: &Path,
    delimiter: u8,
    dialect: Dialect,
    table_name: &str,
    out_dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;
    let base = input
        .file_name()
        .context("input path has no file name")?
        .to_string_lossy()
        .into_owned();
    let dat_path = out_dir.join(format!("{base}.dat"));
    let sql_path = out_dir.join(format!("{base}.sql"));

    tracing::debug!(input = %input.display(), dat = %dat_path.display(), %dialect, "generating");

    // same sentinel for cleaning and for the import statement
    let sentinel = dialect.null_sentinel();
    let profile = match scan_with_cleaned(input, delimiter, &dat_path, sentinel) {
        Ok(p) => p,
        Err(e) => {
            // an aborted scan leaves a partial cleaned file behind
            let _ = std::fs::remove_file(&dat_path);
            return Err(anyhow::Error::from(e)
                .context(format!("failed to profile {}", input.display())));
        }
    };
    print_summary_table(&profile);

    let written = generate_script(dialect, table_name, &profile.columns, &dat_path, delimiter)
        .map_err(anyhow::Error::from)
        .and_then(|script| {
            std::fs::write(&sql_path, format!("{}\n{}\n", script.ddl, script.import))
                .with_context(|| format!("cannot write {}", sql_path.display()))
        });
    if let Err(e) = written {
        // don't leave a cleaned file with no matching SQL behind
        let _ = std::fs::remove_file(&dat_path);
        return Err(e);
    }

    println!("Wrote {}", dat_path.display());
    println!("Wrote {}", sql_path.display());
    Ok(())
}

fn print_summary_table(profile: &FileProfile) {
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN);
    table.set_header(SUMMARY_HEADER);
    for row in summary_rows(&profile.columns) {
        table.add_row(row);
    }
    println!("File Summary:");
    println!("{table}");
}
