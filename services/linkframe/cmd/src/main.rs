//! linkframe command-line tool.
//!
//! Frames payloads with COBS and an optional trailing CRC, unframes byte
//! streams, computes checksums, and generates CRC lookup tables.

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use link_crc::{codegen, CrcParams, CrcProfile, CrcStandard, CHECK_INPUT};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[macro_use]
mod logging;
mod config;
mod frames;

use config::LinkConfig;
use frames::{decode_stream, encode_payload, parse_hex, parse_int};
use logging::LinkLogFormatter;

/// COBS framing and CRC tool
#[derive(Parser, Debug)]
#[command(name = "linkframe", version, about = "COBS framing with table-driven CRC checks")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Configuration file path
    #[arg(long, default_value = "linkframe.yaml", global = true)]
    config: PathBuf,

    /// Largest payload accepted, overriding the configuration
    #[arg(long, global = true)]
    max_frame_len: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Frame one payload
    Encode(FrameArgs),
    /// Decode every frame in a stream, one hex payload per line
    Decode(FrameArgs),
    /// Print the checksum of the input
    Checksum {
        /// CRC profile name
        #[arg(long)]
        crc: String,
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Build a CRC lookup table
    Table(TableArgs),
    /// List known CRC profiles
    Profiles {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct FrameArgs {
    /// CRC profile name, or "none"
    #[arg(long)]
    crc: Option<String>,
    /// Read and write hex text instead of raw bytes
    #[arg(long)]
    hex: bool,
    /// Input file (stdin when omitted)
    file: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct TableArgs {
    /// Register width in bits
    #[arg(long, value_parser = parse_int)]
    bits: u32,
    /// Generator polynomial, MSB-first, without the top bit
    #[arg(long, value_parser = parse_int)]
    poly: u32,
    /// Initial register value
    #[arg(long, value_parser = parse_int, default_value = "0")]
    init: u32,
    /// Final XOR value
    #[arg(long, value_parser = parse_int, default_value = "0")]
    xorout: u32,
    /// Build a reflected table
    #[arg(long)]
    lsb_first: bool,
    /// Name used for the generated constants
    #[arg(long, default_value = "crc")]
    name: String,
    /// Write generated Rust source to this file
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print the table
    #[arg(long)]
    print: bool,
}

/// One row of `profiles` output
#[derive(Debug, Serialize)]
struct ProfileInfo {
    name: String,
    #[serde(flatten)]
    params: CrcParams,
    check: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::new("warn")
        .add_directive(format!("linkframe={}", args.log_level).parse()?)
        .add_directive(format!("link_cobs={}", args.log_level).parse()?)
        .add_directive(format!("link_crc={}", args.log_level).parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .event_format(LinkLogFormatter::new("linkframe"))
        .init();

    info!("Starting linkframe v{}", env!("CARGO_PKG_VERSION"));

    let mut config = LinkConfig::load_from_file(&args.config)?;
    if let Some(max_frame_len) = args.max_frame_len {
        config.max_frame_len = max_frame_len;
        config.validate()?;
    }

    let result = run(args.command, &config);
    if let Err(e) = &result {
        component_error!("cli", "{:#}", e);
    }
    result
}

fn run(command: Command, config: &LinkConfig) -> Result<()> {
    match command {
        Command::Encode(frame_args) => encode(&frame_args, config),
        Command::Decode(frame_args) => decode(&frame_args, config),
        Command::Checksum { crc, file } => checksum(&crc, file.as_deref(), config),
        Command::Table(table_args) => table(&table_args),
        Command::Profiles { json } => profiles(json, config),
    }
}

fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => std::fs::read(path).with_context(|| format!("failed to read {:?}", path)),
        None => {
            let mut data = Vec::new();
            std::io::stdin()
                .read_to_end(&mut data)
                .context("failed to read stdin")?;
            Ok(data)
        }
    }
}

fn encode(frame_args: &FrameArgs, config: &LinkConfig) -> Result<()> {
    let profile = config.resolve_profile(frame_args.crc.as_deref())?;
    let mut payload = read_input(frame_args.file.as_deref())?;
    if frame_args.hex {
        payload = parse_hex(&payload)?;
    }

    let frame = encode_payload(&payload, profile.as_deref(), config.max_frame_len)?;
    component_info!("cli", "Framed {} payload bytes into {}", payload.len(), frame.len());

    let mut stdout = std::io::stdout().lock();
    if frame_args.hex {
        writeln!(stdout, "{}", hex::encode(&frame))?;
    } else {
        stdout.write_all(&frame)?;
    }
    stdout.flush()?;
    Ok(())
}

fn decode(frame_args: &FrameArgs, config: &LinkConfig) -> Result<()> {
    let profile = config.resolve_profile(frame_args.crc.as_deref())?;
    let mut stream = read_input(frame_args.file.as_deref())?;
    if frame_args.hex {
        stream = parse_hex(&stream)?;
    }

    let report = decode_stream(&stream, profile.as_deref(), config.max_frame_len)?;

    let mut stdout = std::io::stdout().lock();
    for frame in &report.frames {
        writeln!(stdout, "{}", hex::encode(frame))?;
    }
    stdout.flush()?;

    if report.dropped() > 0 {
        component_warn!(
            "cli",
            "Dropped {} frames ({} malformed, {} overflowed, {} bad checksum, truncated tail: {})",
            report.dropped(),
            report.malformed,
            report.overflowed,
            report.bad_checksum,
            report.truncated
        );
    }
    Ok(())
}

fn checksum(name: &str, file: Option<&Path>, config: &LinkConfig) -> Result<()> {
    let profile = config
        .resolve_profile(Some(name))?
        .with_context(|| format!("{:?} does not name a CRC profile", name))?;
    let data = read_input(file)?;

    println!("{}", codegen::hex_fmt(profile.checksum(&data), profile.width()));
    Ok(())
}

fn table(table_args: &TableArgs) -> Result<()> {
    let params = CrcParams::new(
        table_args.bits,
        table_args.poly,
        table_args.init,
        table_args.xorout,
        table_args.lsb_first,
    );
    let profile = CrcProfile::build(&params).context("cannot build CRC table")?;
    let source = codegen::render_rust(&table_args.name, &profile);

    if let Some(out) = &table_args.out {
        std::fs::write(out, &source).with_context(|| format!("failed to write {:?}", out))?;
        component_info!("codegen", "Wrote {} table to {:?}", table_args.name, out);
    }

    if table_args.print {
        println!("CRC Table");
        println!("Bits: {}", params.bits);
        println!("Polynomial: {}", codegen::hex_fmt(params.poly, params.bits));
        println!("LSB First (reflected): {}", params.lsb_first);
        println!("Values:");
        println!("{}", codegen::table_str(profile.table(), params.bits));
    } else if table_args.out.is_none() {
        print!("{}", source);
    }
    Ok(())
}

fn profiles(json: bool, config: &LinkConfig) -> Result<()> {
    let mut rows: Vec<ProfileInfo> = CrcStandard::ALL
        .into_iter()
        .map(|standard| ProfileInfo {
            name: standard.name().to_string(),
            params: standard.params(),
            check: Some(standard.check()),
        })
        .collect();

    rows.extend(config.profiles.iter().map(|(name, params)| ProfileInfo {
        name: name.clone(),
        params: *params,
        check: CrcProfile::build(params)
            .ok()
            .map(|profile| profile.checksum(CHECK_INPUT)),
    }));

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<20} {:>4} {:>10} {:>10} {:>10} {:>9} {:>10}",
        "NAME", "BITS", "POLY", "INIT", "XOROUT", "LSB_FIRST", "CHECK"
    );
    for row in &rows {
        let p = &row.params;
        println!(
            "{:<20} {:>4} {:>10} {:>10} {:>10} {:>9} {:>10}",
            row.name,
            p.bits,
            codegen::hex_fmt(p.poly, p.bits),
            codegen::hex_fmt(p.init, p.bits),
            codegen::hex_fmt(p.xorout, p.bits),
            p.lsb_first,
            row.check
                .map(|check| codegen::hex_fmt(check, p.bits))
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    Ok(())
}
