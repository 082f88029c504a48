mod logging;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::{Parser, Subcommand, ValueEnum};
use eloc_lora_core::format::format_unix_timestamp;
use eloc_lora_core::{Codec, CodecConfig, DOWNLINK_CHANNEL, DownlinkCommand};
use glob::glob;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::logging::{LogFormat, LogLevel, init_logging};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("ELOC_LORA_BUILD_COMMIT"),
    ", built ",
    env!("ELOC_LORA_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  eloc-lora uplink decode 00000000006553f1004d03 --channel 1\n  eloc-lora uplink decode --input uplinks.txt --human-time\n  eloc-lora downlink encode --color green --counter 300\n  eloc-lora downlink decode 012c01";

#[derive(Parser, Debug)]
#[command(name = "eloc-lora")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode and encode ELOC sensor LoRaWAN payloads.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Log output format (stderr)
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Node -> server payloads.
    Uplink {
        #[command(subcommand)]
        command: UplinkCommands,
    },
    /// Server -> node payloads.
    Downlink {
        #[command(subcommand)]
        command: DownlinkCommands,
    },
}

#[derive(Subcommand, Debug)]
enum UplinkCommands {
    /// Decode one payload, or every `<channel> <payload>` line of a file.
    Decode {
        /// Payload bytes in the selected encoding
        #[arg(required_unless_present = "input")]
        payload: Option<String>,

        /// Channel (FPort) the payload arrived on
        #[arg(short, long, required_unless_present = "input")]
        channel: Option<u8>,

        /// File (or glob matching one file) of `<channel> <payload>` lines
        #[arg(short, long, conflicts_with_all = ["payload", "channel"])]
        input: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,

        /// Channel map as JSON (defaults: tagged 1, counter 2)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Add a human-readable `time` next to each timestamp
        #[arg(long)]
        human_time: bool,
    },
}

#[derive(Subcommand, Debug)]
enum DownlinkCommands {
    /// Encode a color/counter command.
    Encode {
        /// Color name (red, green, blue)
        #[arg(long)]
        color: String,

        #[arg(long)]
        counter: u16,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Decode a downlink payload (color only).
    Decode {
        /// Payload bytes in the selected encoding
        payload: String,

        /// Channel (FPort) the payload is sent on
        #[arg(short, long, default_value_t = DOWNLINK_CHANNEL)]
        channel: u8,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Text encoding of payloads
    #[arg(long, value_enum, default_value = "hex")]
    encoding: PayloadEncoding,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Exit with a non-zero code if any result carries errors
    #[arg(long)]
    strict: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PayloadEncoding {
    Hex,
    Base64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let result = match cli.command {
        Commands::Uplink { command } => match command {
            UplinkCommands::Decode {
                payload,
                channel,
                input,
                output,
                config,
                human_time,
            } => cmd_uplink_decode(payload, channel, input, &output, config, human_time),
        },
        Commands::Downlink { command } => match command {
            DownlinkCommands::Encode {
                color,
                counter,
                pretty,
            } => cmd_downlink_encode(color, counter, pretty),
            DownlinkCommands::Decode {
                payload,
                channel,
                output,
            } => cmd_downlink_decode(&payload, channel, &output),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(err.code)
        }
    }
}

/// Exit code for payloads the codec rejected.
const EXIT_CODEC: u8 = 1;
/// Exit code for usage, configuration and I/O failures.
const EXIT_USAGE: u8 = 2;

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
    code: u8,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
            code: EXIT_USAGE,
        }
    }

    fn codec(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            code: EXIT_CODEC,
            ..Self::new(message, hint)
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_uplink_decode(
    payload: Option<String>,
    channel: Option<u8>,
    input: Option<PathBuf>,
    output: &OutputArgs,
    config: Option<PathBuf>,
    human_time: bool,
) -> Result<(), CliError> {
    let codec = load_codec(config.as_deref())?;
    debug!(channels = ?codec.config().channels, "uplink channel map");

    let uplinks = match (input, payload, channel) {
        (Some(input), _, _) => {
            let resolved = resolve_input_path(&input)?;
            read_uplink_lines(&resolved, output.encoding)?
        }
        (None, Some(payload), Some(channel)) => {
            vec![(channel, decode_payload_text(&payload, output.encoding)?)]
        }
        _ => {
            return Err(CliError::new(
                "missing payload",
                Some("pass <PAYLOAD> --channel <N>, or --input <FILE>".to_string()),
            ));
        }
    };

    let mut failed = 0usize;
    for (channel, bytes) in &uplinks {
        let result = codec.decode_uplink(bytes, *channel);
        if !result.errors.is_empty() {
            failed += 1;
        }
        let mut value = serde_json::to_value(&result).context("JSON serialization failed")?;
        if human_time {
            add_human_time(&mut value);
        }
        println!("{}", to_json(&value, output.pretty)?);
    }
    info!(total = uplinks.len(), failed, "uplinks decoded");

    if output.strict && failed > 0 {
        return Err(CliError::codec(
            format!("{} of {} uplinks failed to decode", failed, uplinks.len()),
            Some("inspect the `errors` field of each result".to_string()),
        ));
    }
    Ok(())
}

fn cmd_downlink_encode(color: String, counter: u16, pretty: bool) -> Result<(), CliError> {
    let result = Codec::default().encode_downlink(&DownlinkCommand::new(color, counter));
    println!("{}", to_json(&result, pretty)?);
    if let Some(error) = result.errors.first() {
        return Err(CliError::codec(
            format!("downlink encoding failed: {}", error),
            Some("valid colors are red, green, blue".to_string()),
        ));
    }
    Ok(())
}

fn cmd_downlink_decode(payload: &str, channel: u8, output: &OutputArgs) -> Result<(), CliError> {
    let bytes = decode_payload_text(payload, output.encoding)?;
    let result = Codec::default().decode_downlink(&bytes, channel);
    println!("{}", to_json(&result, output.pretty)?);
    if output.strict && !result.errors.is_empty() {
        return Err(CliError::codec(
            format!("downlink decoding failed: {}", result.errors.join("; ")),
            Some(format!("downlinks use channel {}", DOWNLINK_CHANNEL)),
        ));
    }
    Ok(())
}

fn load_codec(path: Option<&Path>) -> Result<Codec, CliError> {
    let Some(path) = path else {
        return Ok(Codec::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: CodecConfig = serde_json::from_str(&json)
        .with_context(|| format!("Invalid config: {}", path.display()))?;
    debug!(?config, "config loaded");
    Codec::new(config).map_err(|err| {
        CliError::new(
            format!("invalid channel map: {}", err),
            Some("tagged and counter need distinct channels other than 0 and 4".to_string()),
        )
    })
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn add_human_time(result: &mut Value) {
    let Some(data) = result.get_mut("data").and_then(Value::as_object_mut) else {
        return;
    };
    let time = data
        .get("timestamp")
        .and_then(Value::as_u64)
        .and_then(format_unix_timestamp);
    if let Some(time) = time {
        data.insert("time".to_string(), Value::String(time));
    }
}

fn decode_payload_text(text: &str, encoding: PayloadEncoding) -> Result<Vec<u8>, CliError> {
    let text = text.trim();
    match encoding {
        PayloadEncoding::Hex => {
            let digits = text
                .strip_prefix("0x")
                .or_else(|| text.strip_prefix("0X"))
                .unwrap_or(text);
            hex::decode(digits).map_err(|err| {
                CliError::new(
                    format!("invalid hex payload '{}': {}", text, err),
                    Some("use an even number of hex digits, e.g. 012c01".to_string()),
                )
            })
        }
        PayloadEncoding::Base64 => BASE64.decode(text).map_err(|err| {
            CliError::new(
                format!("invalid base64 payload '{}': {}", text, err),
                Some("network servers usually deliver `frm_payload` as standard base64".to_string()),
            )
        }),
    }
}

fn read_uplink_lines(
    path: &Path,
    encoding: PayloadEncoding,
) -> Result<Vec<(u8, Vec<u8>)>, CliError> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let mut uplinks = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = index + 1;
        let mut fields = line.split_whitespace();
        let (Some(channel), Some(payload), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(CliError::new(
                format!("{}:{}: expected `<channel> <payload>`", path.display(), line_no),
                None,
            ));
        };
        let channel = channel.parse::<u8>().map_err(|_| {
            CliError::new(
                format!("{}:{}: invalid channel '{}'", path.display(), line_no, channel),
                Some("channels are 0..=255".to_string()),
            )
        })?;
        let bytes = decode_payload_text(payload, encoding).map_err(|err| CliError {
            message: format!("{}:{}: {}", path.display(), line_no, err.message),
            ..err
        })?;
        uplinks.push((channel, bytes));
    }

    if uplinks.is_empty() {
        return Err(CliError::new(
            format!("no uplinks in {}", path.display()),
            Some("write one `<channel> <payload>` pair per line".to_string()),
        ));
    }
    Ok(uplinks)
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        if !input.is_file() {
            return Err(CliError::new(
                format!("input file not found: {}", input.display()),
                Some("pass a text file of `<channel> <payload>` lines".to_string()),
            ));
        }
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single input file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_payload_accepts_prefix() {
        let bytes = decode_payload_text("0x012C01", PayloadEncoding::Hex).unwrap();
        assert_eq!(bytes, [1, 44, 1]);
    }

    #[test]
    fn base64_payload() {
        let bytes = decode_payload_text("ASwB", PayloadEncoding::Base64).unwrap();
        assert_eq!(bytes, [1, 44, 1]);
    }

    #[test]
    fn odd_hex_is_usage_error() {
        let err = decode_payload_text("123", PayloadEncoding::Hex).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
        assert!(err.hint.is_some());
    }

    #[test]
    fn human_time_only_touches_timestamps() {
        let mut value = serde_json::json!({
            "data": {"type": "status_report", "timestamp": 1_700_000_000u64},
            "warnings": [],
            "errors": []
        });
        add_human_time(&mut value);
        assert_eq!(value["data"]["time"], "14 Nov 2023 22:13:20");

        let mut value = serde_json::json!({"data": null, "warnings": [], "errors": ["unknown channel"]});
        add_human_time(&mut value);
        assert!(value["data"].is_null());
    }

    #[test]
    fn decode_requires_channel_with_payload() {
        let err = Cli::try_parse_from(["eloc-lora", "uplink", "decode", "00"])
            .expect_err("channel is required");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn input_conflicts_with_payload() {
        let err = Cli::try_parse_from([
            "eloc-lora", "uplink", "decode", "00", "--input", "uplinks.txt",
        ])
        .expect_err("conflicting args should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
