use clap::{Args, Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stegbit::cli::{
    decode_file, encode_file, show_info, DecodeOptions, EncodeOptions, InfoOptions,
};
use stegbit::{CarrierReport, ContainerKind, SecurityToken, StegConfig, TokenKind};

/// Version info from build.rs
const VERSION: &str = env!("STEGBIT_VERSION");
const BUILD: &str = env!("STEGBIT_BUILD");
const PROFILE: &str = env!("STEGBIT_PROFILE");
const GIT_HASH: &str = env!("STEGBIT_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| {
        format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH)
    })
}

#[derive(Parser)]
#[command(name = "stegbit")]
#[command(author, about = "Hide files in the least significant bits of PNG, WAV, MP4 and text covers", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct KeyArgs {
    /// Security key; must match on decode
    #[arg(long, short = 'k', default_value = "0")]
    key: String,

    /// How the key is interpreted
    #[arg(long, default_value = "int", value_parser = parse_key_type)]
    key_type: TokenKind,

    /// Container format, overriding the file extension
    #[arg(long, value_parser = parse_format)]
    format: Option<ContainerKind>,

    /// Cover bytes to leave untouched before the hidden data
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<i64>,
}

#[derive(Args)]
struct TuningArgs {
    /// Cover bytes processed per buffer
    #[arg(long, allow_negative_numbers = true)]
    buffer_capacity: Option<i64>,

    /// JSON file with persisted settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(long)]
    force: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a payload file inside a cover file
    #[command(alias = "e")]
    Encode {
        #[command(flatten)]
        key: KeyArgs,

        #[command(flatten)]
        tuning: TuningArgs,

        /// Cover file
        cover: PathBuf,

        /// File to hide
        payload: PathBuf,

        /// Output carrier file
        output: PathBuf,
    },

    /// Recover a hidden payload from a carrier file
    #[command(alias = "d")]
    Decode {
        #[command(flatten)]
        key: KeyArgs,

        #[command(flatten)]
        tuning: TuningArgs,

        /// Carrier file
        cover: PathBuf,

        /// Output file for the recovered payload
        output: PathBuf,
    },

    /// Show how much a cover file can hide
    #[command(alias = "i")]
    Info {
        #[command(flatten)]
        key: KeyArgs,

        /// Payload file to check against the capacity
        #[arg(long)]
        payload: Option<PathBuf>,

        /// Cover file to inspect
        cover: PathBuf,
    },
}

fn parse_key_type(s: &str) -> Result<TokenKind, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_format(s: &str) -> Result<ContainerKind, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn build_config(
    config_path: Option<&Path>,
    offset: Option<i64>,
    buffer_capacity: Option<i64>,
) -> stegbit::Result<StegConfig> {
    let mut config = match config_path {
        Some(path) => StegConfig::load(path)?,
        None => StegConfig::default(),
    };
    if let Some(offset) = offset {
        config = config.with_offset(offset)?;
    }
    if let Some(capacity) = buffer_capacity {
        config = config.with_buffer_capacity(capacity)?;
    }
    Ok(config)
}

fn print_report(action: &str, report: &CarrierReport, path: &Path) {
    println!(
        "{} {} bytes ({} cover) {}",
        action,
        report.stats.payload_bytes,
        report.descriptor.kind,
        path.display()
    );
    println!("sha256: {}", report.stats.payload_sha256);
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("stegbit {}", get_version());
        return ExitCode::SUCCESS;
    }

    init_logger(cli.verbose);

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Encode {
            key,
            tuning,
            cover,
            payload,
            output,
        } => SecurityToken::parse(key.key_type, &key.key)
            .and_then(|token| {
                let config =
                    build_config(tuning.config.as_deref(), key.offset, tuning.buffer_capacity)?;
                let options = EncodeOptions {
                    token,
                    config,
                    format: key.format,
                    force: tuning.force,
                };
                encode_file(&cover, &payload, &output, &options)
            })
            .map(|report| print_report("Hid", &report, &output)),

        Commands::Decode {
            key,
            tuning,
            cover,
            output,
        } => SecurityToken::parse(key.key_type, &key.key)
            .and_then(|token| {
                let config =
                    build_config(tuning.config.as_deref(), key.offset, tuning.buffer_capacity)?;
                let options = DecodeOptions {
                    token,
                    config,
                    format: key.format,
                    force: tuning.force,
                };
                decode_file(&cover, &output, &options)
            })
            .map(|report| print_report("Recovered", &report, &output)),

        Commands::Info {
            key,
            payload,
            cover,
        } => SecurityToken::parse(key.key_type, &key.key)
            .and_then(|token| {
                let config = build_config(None, key.offset, None)?;
                let options = InfoOptions {
                    token,
                    config,
                    format: key.format,
                    payload,
                };
                show_info(&cover, &options)
            })
            .map(|info| print!("{}", info)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
