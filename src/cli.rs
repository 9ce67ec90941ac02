//! Command-line surface: argument parsing, one-shot conversion and the interactive loop.
//!
//! Everything that touches stdin, stdout or the filesystem lives here; the conversion
//! modules stay pure.

use crate::constants::scheme;
use crate::error::Result;
use crate::input::Input;
use crate::{PROGRAM_DESC, PROGRAM_NAME, vless, vpn};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use serde_json::Value;
use std::io::{BufRead, Write};
use std::path::Path;

const SEPARATOR_WIDTH: usize = 60;

/// Convert between vless:// links, vpn:// tokens and Xray JSON configs
#[derive(Parser, Debug)]
#[command(name = "vless-linker", about, long_about = None, disable_version_flag = true)]
pub struct Args {
    /// vless:// link, vpn:// token, inline JSON or path to a .json file; omit for interactive mode
    pub input: Option<String>,

    /// Output representation (defaults: json for links and tokens, uri for JSON)
    #[arg(short, long, value_enum)]
    pub to: Option<Target>,

    /// Display name appended to generated links (defaults to the server address)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Emit debug log on stderr
    #[arg(long)]
    pub verbose: bool,

    /// Print name and version
    #[arg(short = 'v', long)]
    pub version: bool,
}

/// Output representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// Pretty-printed JSON
    Json,
    /// `vless://` link
    Uri,
    /// Compressed `vpn://` token
    Vpn,
}

impl Target {
    /// Target used when none is requested.
    pub fn default_for(input: &Input<'_>) -> Self {
        match input {
            Input::Vless(_) | Input::Vpn(_) => Target::Json,
            Input::Json(_) => Target::Uri,
        }
    }
}

/// `--version` line.
pub fn version_line() -> String {
    format!(
        "{} v{} - {}",
        PROGRAM_NAME,
        env!("CARGO_PKG_VERSION"),
        PROGRAM_DESC
    )
}

/// Entry point behind `main`.
///
/// # Errors
///
/// Any conversion or IO error of a one-shot conversion.
pub fn run(args: Args) -> Result<()> {
    if args.version {
        println!("{}", version_line());
        return Ok(());
    }

    let stdout = std::io::stdout();
    match args.input {
        Some(src) => {
            let text = read_source(&src)?;
            let input = Input::detect(&text)?;
            let target = args.to.unwrap_or_else(|| Target::default_for(&input));
            let output = convert(&input, target, args.name.as_deref())?;
            writeln!(stdout.lock(), "{}", output)?;
            Ok(())
        }
        None => {
            let stdin = std::io::stdin();
            interactive(stdin.lock(), stdout.lock())
        }
    }
}

/// Read `src` from disk when it names an existing `.json` file, otherwise use it verbatim.
///
/// # Errors
///
/// `Io` if the file exists but cannot be read.
pub fn read_source(src: &str) -> Result<String> {
    let path = Path::new(src);
    let is_json_file = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json_file && path.is_file() {
        info!("Loading configuration from {}", src);
        return Ok(std::fs::read_to_string(path)?);
    }
    Ok(src.to_string())
}

/// Resolve any input to a configuration value.
///
/// # Errors
///
/// Errors of [`vless::from_uri`] and [`vpn::decode`].
pub fn load_config(input: &Input<'_>) -> Result<Value> {
    match input {
        Input::Vless(uri) => vless::from_uri(uri),
        Input::Vpn(token) => vpn::decode(token),
        Input::Json(value) => Ok(value.clone()),
    }
}

/// Render a configuration in the requested representation.
///
/// A missing `name` falls back to the server address.
///
/// # Errors
///
/// `Conversion` when a link cannot be built from `config`.
pub fn render(config: &Value, target: Target, name: Option<&str>) -> Result<String> {
    match target {
        Target::Json => Ok(serde_json::to_string_pretty(config)?),
        Target::Uri => {
            let name = match name {
                Some(name) => name.to_string(),
                None => vless::default_name(config).unwrap_or_default(),
            };
            vless::to_uri(config, &name)
        }
        Target::Vpn => vpn::encode(config),
    }
}

/// [`load_config`] followed by [`render`].
///
/// # Errors
///
/// Errors of either step.
pub fn convert(input: &Input<'_>, target: Target, name: Option<&str>) -> Result<String> {
    render(&load_config(input)?, target, name)
}

/// Prompt-driven loop over `reader`, writing prompts and results to `out`.
///
/// Terminates on `exit`, `quit`, `q` or end of input. Conversion errors are reported and
/// the loop continues.
///
/// # Errors
///
/// `Io` if reading or writing fails.
pub fn interactive<R: BufRead, W: Write>(mut reader: R, mut out: W) -> Result<()> {
    writeln!(out, "{} v{}", PROGRAM_NAME, env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "{}", PROGRAM_DESC)?;
    writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;

    loop {
        writeln!(out, "\nEnter 'exit' or 'quit' (or press Ctrl+C) to close the program.")?;
        let Some(src) = prompt(
            &mut reader,
            &mut out,
            "Enter VLESS URL, VPN URL, JSON, or JSON file path: ",
        )?
        else {
            writeln!(out, "\nGoodbye!")?;
            return Ok(());
        };

        if matches!(src.to_lowercase().as_str(), "exit" | "quit" | "q") {
            writeln!(out, "Goodbye!")?;
            return Ok(());
        }
        if src.is_empty() {
            writeln!(out, "Empty input. Please try again.")?;
            continue;
        }

        match handle_line(&src, &mut reader, &mut out) {
            Ok(Some(output)) => {
                writeln!(out, "\n{}\n", "=".repeat(SEPARATOR_WIDTH))?;
                writeln!(out, "{}", output)?;
            }
            Ok(None) => {
                writeln!(out, "\nGoodbye!")?;
                return Ok(());
            }
            Err(err) => writeln!(out, "Error: {}", err)?,
        }
    }
}

/// One interactive conversion. `Ok(None)` means input ended during a follow-up prompt.
fn handle_line<R: BufRead, W: Write>(
    src: &str,
    reader: &mut R,
    out: &mut W,
) -> Result<Option<String>> {
    let text = read_source(src)?;
    let input = Input::detect(&text)?;

    let target = match input {
        Input::Vless(_) => Target::Json,
        Input::Json(_) => Target::Uri,
        Input::Vpn(_) => {
            writeln!(out, "\nChoose conversion type:")?;
            writeln!(out, "1. {} to {}", scheme::VPN, scheme::VLESS)?;
            writeln!(out, "2. {} to json", scheme::VPN)?;
            loop {
                match prompt(reader, out, "Enter choice (1 or 2): ")?.as_deref() {
                    Some("1") => break Target::Uri,
                    Some("2") => break Target::Json,
                    Some(_) => writeln!(out, "Invalid choice. Please enter 1 or 2.")?,
                    None => return Ok(None),
                }
            }
        }
    };

    let config = load_config(&input)?;
    if target != Target::Uri {
        return render(&config, target, None).map(Some);
    }

    let address = vless::default_name(&config).unwrap_or_default();
    let question = format!("Enter VLESS name (leave empty to use '{}'): ", address);
    let name = match prompt(reader, out, &question)? {
        Some(name) if !name.is_empty() => name,
        _ => address,
    };
    debug!("rendering link named '{}'", name);
    render(&config, target, Some(&name)).map(Some)
}

/// Write `question`, read one trimmed line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    reader: &mut R,
    out: &mut W,
    question: &str,
) -> Result<Option<String>> {
    write!(out, "{}", question)?;
    out.flush()?;
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
