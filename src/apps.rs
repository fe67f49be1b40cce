use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, error::ErrorKind};

use crate::config::{ExtractionConfig, NormalizationConfig, SplitConfig, ValidityConfig};
use crate::constants::splits::{DEFAULT_SUBSET_RATIO, DEFAULT_TRAIN_RATIO};
use crate::constants::validator::DEFAULT_VERSION;
use crate::dataset::{DatasetOrigin, DatasetSummary, load_dataset};
use crate::pipeline::ExtractionPipeline;
use crate::splits::train_test_split;
use crate::summary::summarize_dir;

#[derive(Debug, Parser)]
#[command(
    name = "kotlin-tasks",
    disable_help_subcommand = true,
    about = "Build code-completion tasks from Kotlin sources",
    long_about = "Extract condition, function, import, loop, and variable fragments from Kotlin sources, write them as signature/body JSONL, summarize the corpus, and split it into train/test files.",
    after_help = "Set RUST_LOG=kotlin_tasks=debug for per-file progress."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract tasks from a directory of source files.
    Extract {
        #[arg(
            long = "source-dir",
            value_name = "DIR",
            help = "Directory scanned recursively for source files"
        )]
        source_dir: PathBuf,
        #[command(flatten)]
        options: ExtractArgs,
    },
    /// Print per-file and total record counts.
    Summary {
        #[arg(long, value_name = "DIR", help = "Directory holding .jsonl files")]
        dir: PathBuf,
    },
    /// Shuffle the corpus and write train.jsonl / test.jsonl.
    Split {
        #[arg(long = "input-dir", value_name = "DIR", help = "Directory holding task files")]
        input_dir: PathBuf,
        #[arg(
            long = "output-dir",
            value_name = "DIR",
            help = "Destination for train/test files (defaults to the input directory)"
        )]
        output_dir: Option<PathBuf>,
        #[arg(
            long,
            default_value_t = DEFAULT_TRAIN_RATIO,
            value_parser = parse_ratio,
            help = "Fraction of records assigned to train"
        )]
        ratio: f64,
        #[arg(long, help = "Optional deterministic shuffle seed")]
        seed: Option<u64>,
    },
    /// Load a JSONL dataset and print its shape.
    Inspect {
        #[arg(long, value_name = "PATH", required_unless_present = "url")]
        file: Option<PathBuf>,
        #[arg(long, value_name = "URL", conflicts_with = "file")]
        url: Option<String>,
        #[arg(long = "use-subset", help = "Keep only a leading fraction of records")]
        use_subset: bool,
        #[arg(
            long = "subset-ratio",
            default_value_t = DEFAULT_SUBSET_RATIO,
            value_parser = parse_ratio,
            help = "Fraction kept when --use-subset is set"
        )]
        subset_ratio: f64,
    },
    /// Fetch plain-text sources over HTTP and extract tasks from them.
    Fetch {
        #[arg(long = "url", value_name = "URL", help = "Source URL, repeat as needed")]
        urls: Vec<String>,
        #[arg(
            long = "url-file",
            value_name = "PATH",
            help = "File listing one URL per line (blank lines and # comments ignored)"
        )]
        url_file: Option<PathBuf>,
        #[arg(
            long = "error-log",
            value_name = "PATH",
            default_value = crate::constants::files::ERROR_LOG_FILE,
            help = "Append-only log of failed fetches"
        )]
        error_log: PathBuf,
        #[command(flatten)]
        options: ExtractArgs,
    },
}

#[derive(Debug, Args)]
struct ExtractArgs {
    #[arg(
        long = "output-dir",
        value_name = "DIR",
        default_value = "tasks",
        help = "Directory receiving <category>_tasks.jsonl files"
    )]
    output_dir: PathBuf,
    #[arg(
        long,
        default_value_t = DEFAULT_VERSION,
        value_parser = parse_profile,
        help = "Validity profile: 1 (500 characters, braces) or 2 (1000 characters, braces and parentheses)"
    )]
    profile: u8,
    #[arg(
        long = "no-literal-masking",
        help = "Keep string and numeric literals verbatim"
    )]
    no_literal_masking: bool,
    #[arg(
        long = "extension",
        value_name = "EXT",
        help = "Source extension to scan, repeat as needed (default: kt)"
    )]
    extensions: Vec<String>,
    #[arg(long = "follow-links", help = "Follow symlinks while scanning")]
    follow_links: bool,
}

impl ExtractArgs {
    fn to_config(&self) -> Result<ExtractionConfig, Box<dyn Error>> {
        let mut config = ExtractionConfig::default()
            .with_validity(ValidityConfig::for_version(self.profile)?)
            .with_normalization(
                NormalizationConfig::default().with_literal_masking(!self.no_literal_masking),
            )
            .with_follow_links(self.follow_links);
        if !self.extensions.is_empty() {
            config = config.with_source_extensions(self.extensions.iter().cloned());
        }
        Ok(config)
    }
}

/// Run the command-line interface over `args_iter` (without the program name).
pub fn run_cli<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<Cli, _>(std::iter::once("kotlin-tasks".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    match cli.command {
        Command::Extract {
            source_dir,
            options,
        } => {
            let pipeline = ExtractionPipeline::new(options.to_config()?)?;
            let tasks = pipeline.extract_dir(&source_dir)?;
            pipeline.write_tasks(&tasks, &options.output_dir)?;
            print_summary(&options.output_dir)?;
        }
        Command::Summary { dir } => print_summary(&dir)?,
        Command::Split {
            input_dir,
            output_dir,
            ratio,
            seed,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| input_dir.clone());
            let mut config = SplitConfig::new(input_dir, &output_dir).with_train_ratio(ratio);
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            let outcome = train_test_split(&config)?;
            println!(
                "Wrote {} train and {} test records to {}",
                outcome.train,
                outcome.test,
                output_dir.display()
            );
            print_summary(&output_dir)?;
        }
        Command::Inspect {
            file,
            url,
            use_subset,
            subset_ratio,
        } => {
            let origin = match (file, url) {
                (Some(path), _) => DatasetOrigin::File(path),
                (None, Some(url)) => DatasetOrigin::Url(url),
                (None, None) => return Err("inspect needs --file or --url".into()),
            };
            let records = load_dataset(&origin, use_subset.then_some(subset_ratio))?;
            println!("Source: {origin}");
            println!("{}", DatasetSummary::from_records(&records));
        }
        Command::Fetch {
            urls,
            url_file,
            error_log,
            options,
        } => run_fetch(urls, url_file, error_log, &options)?,
    }
    Ok(())
}

fn print_summary(dir: &Path) -> Result<(), Box<dyn Error>> {
    println!("{}", summarize_dir(dir)?);
    Ok(())
}

#[cfg(feature = "remote")]
fn run_fetch(
    mut urls: Vec<String>,
    url_file: Option<PathBuf>,
    error_log: PathBuf,
    options: &ExtractArgs,
) -> Result<(), Box<dyn Error>> {
    use crate::transport::fs::ErrorLog;
    use crate::transport::http::fetch_sources;

    if let Some(path) = url_file {
        urls.extend(read_url_list(&path)?);
    }
    if urls.is_empty() {
        return Err("fetch needs at least one --url or a non-empty --url-file".into());
    }
    let log = ErrorLog::new(error_log);
    let fetched = fetch_sources(&urls, &log)?;
    let pipeline = ExtractionPipeline::new(options.to_config()?)?;
    let tasks = pipeline.extract_texts(fetched.iter().map(|(_, text)| text));
    pipeline.write_tasks(&tasks, &options.output_dir)?;
    println!(
        "Fetched {} of {} sources (failures appended to {})",
        fetched.len(),
        urls.len(),
        log.path().display()
    );
    print_summary(&options.output_dir)
}

#[cfg(not(feature = "remote"))]
fn run_fetch(
    _urls: Vec<String>,
    _url_file: Option<PathBuf>,
    _error_log: PathBuf,
    _options: &ExtractArgs,
) -> Result<(), Box<dyn Error>> {
    Err("fetch requires building with the `remote` feature".into())
}

#[cfg(feature = "remote")]
fn read_url_list(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn parse_ratio(raw: &str) -> Result<f64, String> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("could not parse ratio '{}' as a float", raw.trim()))?;
    if !parsed.is_finite() || !(0.0..=1.0).contains(&parsed) {
        return Err(format!("ratio must be within [0, 1], got {parsed}"));
    }
    Ok(parsed)
}

fn parse_profile(raw: &str) -> Result<u8, String> {
    match raw.trim() {
        "1" => Ok(1),
        "2" => Ok(2),
        other => Err(format!("unknown validity profile '{other}' (expected 1 or 2)")),
    }
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
