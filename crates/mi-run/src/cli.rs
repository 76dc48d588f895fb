use clap::{Parser, Subcommand};
use colored::Colorize;
use mi_engine::{EngineConfig, StopReason};
use mi_parser::{
    CorrelationId, MAX_SEQUENCE, Record, RecordKind, ResultClass, SEQUENCE_WIDTH, parse_record,
};
use miette::{IntoDiagnostic, miette};
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::{fs, path::PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mi")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(after_help = "# Examples:\n\n\
    ## To inspect a captured GDB/MI transcript:\n\
    mi parse gdb.log\n\n\
    ## To print records as JSON lines:\n\
    gdb -i=mi ./a.out | mi parse --format json\n\n\
    ## To prefix a command for action 3:\n\
    mi encode --owner 3 --sequence 0 -- -break-insert main.c:10")]
#[command(about = "mi inspects GDB/MI output and correlation prefixes.", long_about = None)]
pub struct Cli {
    /// Load engine settings from a TOML file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when MI_LOG is not set
    #[arg(long, global = true)]
    log: Option<String>,

    #[clap(subcommand)]
    commands: Commands,
}

#[derive(Clone, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decode and parse every line of MI output
    Parse {
        /// Output format
        #[arg(short = 'F', long, value_enum, default_value_t)]
        format: OutputFormat,
        /// File with captured output; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Prefix a command with its correlation id
    Encode {
        #[arg(long, default_value_t = 0)]
        owner: i32,
        #[arg(long)]
        sequence: i64,
        #[arg(allow_hyphen_values = true)]
        command: String,
    },
    /// Split the correlation prefix off one line of output
    Decode { line: String },
}

impl Cli {
    pub fn run(&self) -> miette::Result<()> {
        let config = match &self.config {
            Some(path) => EngineConfig::load(path).into_diagnostic()?,
            None => EngineConfig::default(),
        };
        self.init_logging(&config);

        if !io::stdout().is_terminal() {
            colored::control::set_override(false);
        }

        match &self.commands {
            Commands::Parse { format, file } => match file {
                Some(path) => {
                    let file = fs::File::open(path)
                        .map_err(|e| miette!("Failed to open {}: {}", path.display(), e))?;
                    Self::parse(BufReader::new(file), format)
                }
                None => Self::parse(io::stdin().lock(), format),
            },
            Commands::Encode {
                owner,
                sequence,
                command,
            } => {
                if *owner < 0 {
                    return Err(miette!("Owner must not be negative: {}", owner));
                }
                if !(0..=MAX_SEQUENCE).contains(sequence) {
                    return Err(miette!(
                        "Sequence must fit in {} digits: {}",
                        SEQUENCE_WIDTH,
                        sequence
                    ));
                }

                println!("{}{}", CorrelationId::new(*owner, *sequence).encode(), command);
                Ok(())
            }
            Commands::Decode { line } => {
                let (id, rest) = CorrelationId::decode(line).into_diagnostic()?;
                let owner = if id.has_owner() {
                    id.owner.to_string()
                } else {
                    "none".to_string()
                };
                let sequence = if id.has_owner() {
                    id.sequence.to_string()
                } else {
                    "none".to_string()
                };

                println!("owner: {}\nsequence: {}\nrecord: {}", owner, sequence, rest);
                Ok(())
            }
        }
    }

    fn init_logging(&self, config: &EngineConfig) {
        let default_filter = self.log.as_deref().unwrap_or(&config.log_filter);
        let filter = EnvFilter::try_from_env("MI_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));

        // Already initialised when `run` is called twice in one process.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
    }

    fn parse(input: impl BufRead, format: &OutputFormat) -> miette::Result<()> {
        let stdout = io::stdout();
        let mut handle = BufWriter::new(stdout.lock());

        for (index, line) in input.lines().enumerate() {
            let line = line.into_diagnostic()?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }

            let (id, rest) = match CorrelationId::decode(line) {
                Ok(decoded) => decoded,
                Err(e) => {
                    debug!(line = %line, error = %e, "Skipping line");
                    if matches!(format, OutputFormat::Text) {
                        writeln!(handle, "{} {}: {}", "skip".dimmed(), index + 1, line).into_diagnostic()?;
                    }
                    continue;
                }
            };
            let record = parse_record(rest);

            match format {
                OutputFormat::Text => write_text(&mut handle, index + 1, id, &record)?,
                OutputFormat::Json => {
                    let value = serde_json::json!({
                        "line": index + 1,
                        "id": id.has_owner().then_some(id),
                        "record": record,
                        "error": record.parse_error().map(|e| e.to_string()),
                    });
                    writeln!(handle, "{}", value).into_diagnostic()?;
                }
            }
        }

        handle.flush().into_diagnostic()
    }
}

fn write_text(handle: &mut impl Write, line: usize, id: CorrelationId, record: &Record) -> miette::Result<()> {
    let label = match record.kind() {
        RecordKind::Result if record.is_error() => "error".red().bold(),
        RecordKind::Result => "result".green(),
        RecordKind::ExecAsync => "exec".cyan(),
        RecordKind::StatusAsync => "status".blue(),
        RecordKind::NotifyAsync => "notify".blue(),
        RecordKind::Malformed => "malformed".yellow(),
    };

    write!(handle, "{} {} [{}] {}", label, line, id, record.debug_string()).into_diagnostic()?;

    if record.kind() == RecordKind::ExecAsync && record.class() == ResultClass::Stopped {
        write!(handle, " (stop: {})", StopReason::parse(record.body())).into_diagnostic()?;
    }
    if let Some(error) = record.parse_error() {
        write!(handle, " {}: {}", "parse error".red(), error).into_diagnostic()?;
    }

    writeln!(handle).into_diagnostic()
}
