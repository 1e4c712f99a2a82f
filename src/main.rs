use retag::config::{FileDefaults, Options};
use retag::source::{self, Archive};
use retag::OutputFormat;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// retag - add, remove and clear struct field tags in Go source files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Go file to process
    #[arg(long, short = 'f')]
    file: PathBuf,

    /// Read unsaved file contents as an archive from stdin
    #[arg(long)]
    modified: bool,

    /// Select the fields of the struct with this name
    #[arg(long = "struct", value_name = "NAME")]
    struct_name: Option<String>,

    /// Select the fields declared on line N, or on lines N through M
    #[arg(long, value_name = "N[,M]")]
    line: Option<String>,

    /// Select the field containing this byte offset
    #[arg(long)]
    offset: Option<usize>,

    /// Select every struct field in the file
    #[arg(long)]
    all: bool,

    /// Keys to add, optionally with a value: json,xml:name
    #[arg(long, value_delimiter = ',', value_name = "KEYS")]
    add_tags: Vec<String>,

    /// key:value tags to add verbatim (repeatable, commas kept)
    #[arg(long, value_name = "KEY:VALUE")]
    add_literal: Vec<String>,

    /// Options to add to existing keys: json=omitempty,hcl=squash
    #[arg(long, value_delimiter = ',', value_name = "KEY=OPTION")]
    add_options: Vec<String>,

    /// Keys to remove
    #[arg(long, value_delimiter = ',', value_name = "KEYS")]
    remove_tags: Vec<String>,

    /// Options to remove: json=omitempty
    #[arg(long, value_delimiter = ',', value_name = "KEY=OPTION")]
    remove_options: Vec<String>,

    /// Remove all tags
    #[arg(long)]
    clear_tags: bool,

    /// Remove all options, keeping keys and names
    #[arg(long)]
    clear_options: bool,

    /// Naming convention for generated names: snakecase, camelcase,
    /// lispcase, pascalcase, titlecase or keep
    #[arg(long)]
    transform: Option<String>,

    /// Regenerate names of keys that already exist
    #[arg(long = "override")]
    override_existing: bool,

    /// Sort tag keys alphabetically
    #[arg(long)]
    sort: bool,

    /// Leave unexported fields alone
    #[arg(long)]
    skip_unexported: bool,

    /// Output format: source or json
    #[arg(long)]
    format: Option<String>,

    /// Write the result back to the file instead of stdout
    #[arg(long, short = 'w')]
    write: bool,

    /// Where to start looking for retag.toml (defaults to the file's directory)
    #[arg(long, short = 'c')]
    config_dir: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> Options {
        Options {
            struct_name: self.struct_name.clone(),
            line: self.line.clone(),
            offset: self.offset,
            all: self.all,
            add: self.add_tags.clone(),
            add_literal: self.add_literal.clone(),
            add_options: self.add_options.clone(),
            remove: self.remove_tags.clone(),
            remove_options: self.remove_options.clone(),
            clear: self.clear_tags,
            clear_options: self.clear_options,
            transform: self.transform.clone(),
            format: self.format.clone(),
            override_existing: self.override_existing,
            sort: self.sort,
            skip_unexported: self.skip_unexported,
        }
    }

    fn config_dir(&self) -> PathBuf {
        self.config_dir.clone().unwrap_or_else(|| {
            self.file
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new("."))
                .to_path_buf()
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let defaults = FileDefaults::load(args.config_dir())?;

    // RUST_LOG wins over the config file; default to "warn"
    let log_level = defaults
        .as_ref()
        .and_then(|(_, d)| d.log_level.clone())
        .unwrap_or_else(|| "warn".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let defaults = match defaults {
        Some((path, defaults)) => {
            info!("Using defaults from: {}", path.display());
            defaults
        }
        None => FileDefaults::default(),
    };

    let config = args.options().with_defaults(&defaults).build()?;
    if args.write && config.format != OutputFormat::Source {
        anyhow::bail!("--write can only be used with the source output format");
    }

    let archive = if args.modified {
        Some(Archive::read(io::stdin().lock()).context("Failed to read modified archive")?)
    } else {
        None
    };

    let source = source::load_source(&args.file, archive.as_ref())
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    info!("Rewriting tags in: {}", args.file.display());
    let output = retag::run(&source, &config)?;

    if args.write {
        fs::write(&args.file, &output)
            .with_context(|| format!("Failed to write {}", args.file.display()))?;
        info!("Wrote {}", args.file.display());
    } else if config.format == OutputFormat::Json {
        println!("{}", output);
    } else {
        print!("{}", output);
    }

    Ok(())
}
