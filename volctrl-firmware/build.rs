//! Build script for volctrl-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates volctrl.toml at compile time
//! - Generates the board constants included by `config::board`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const BAUDRATES: &[i64] = &[9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600];

fn main() {
    setup_linker();
    let board = validate_config();
    generate_constants(&board);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated board values
struct Board {
    baudrate: i64,
    echo: bool,
    verbose: bool,
    settle_ms: i64,
    low: i64,
    high: i64,
    tolerance: i64,
    default_ms: i64,
    registration_timeout_ms: i64,
}

/// Validate volctrl.toml and extract the board values
fn validate_config() -> Board {
    println!("cargo:rerun-if-changed=volctrl.toml");

    let config_path = Path::new("volctrl.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: volctrl.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a volctrl.toml board file in the          ║\n\
            ║  volctrl-firmware directory.                                     ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read volctrl.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in volctrl.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let mut int = |section: &str, key: &str, min: i64, max: i64| -> i64 {
        match config.get(section).and_then(|s| s.get(key)) {
            Some(toml::Value::Integer(v)) if (min..=max).contains(v) => *v,
            Some(toml::Value::Integer(_)) => {
                errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
                min
            }
            Some(_) => {
                errors.push(format!("[{}] {} must be an integer", section, key));
                min
            }
            None => {
                errors.push(format!("[{}] missing '{}'", section, key));
                min
            }
        }
    };

    let baudrate = int("serial", "baudrate", 0, i64::MAX);
    let settle_ms = int("motor", "settle_ms", 0, 1000);
    let low = int("limits", "low", 0, 1023);
    let high = int("limits", "high", 0, 1023);
    let tolerance = int("setvol", "tolerance", 1, 64);
    let default_ms = int("timer", "default_ms", 0, 1400);
    let registration_timeout_ms = int("ir", "registration_timeout_ms", 1000, 60000);

    let mut flag = |key: &str| -> bool {
        match config.get("serial").and_then(|s| s.get(key)) {
            Some(toml::Value::Boolean(b)) => *b,
            Some(_) => {
                errors.push(format!("[serial] {} must be true or false", key));
                false
            }
            None => false,
        }
    };
    let echo = flag("echo");
    let verbose = flag("verbose");

    if !BAUDRATES.contains(&baudrate) {
        errors.push(format!("[serial] baudrate {} is not a standard rate", baudrate));
    }
    if low >= high {
        errors.push(format!("[limits] low ({}) must be below high ({})", low, high));
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid board configuration in volctrl.toml              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=volctrl.toml validated successfully");

    Board {
        baudrate,
        echo,
        verbose,
        settle_ms,
        low,
        high,
        tolerance,
        default_ms,
        registration_timeout_ms,
    }
}

/// Write the board constants to `$OUT_DIR/board_config.rs`
fn generate_constants(board: &Board) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("board_config.rs")).unwrap();

    writeln!(f, "// Generated from volctrl.toml").unwrap();
    writeln!(f, "pub const BAUDRATE: u32 = {};", board.baudrate).unwrap();
    writeln!(f, "pub const ECHO: bool = {};", board.echo).unwrap();
    writeln!(f, "pub const VERBOSE: bool = {};", board.verbose).unwrap();
    writeln!(f, "pub const SETTLE_MS: u16 = {};", board.settle_ms).unwrap();
    writeln!(f, "pub const LOW_LIMIT: u16 = {};", board.low).unwrap();
    writeln!(f, "pub const HIGH_LIMIT: u16 = {};", board.high).unwrap();
    writeln!(f, "pub const TOLERANCE: u16 = {};", board.tolerance).unwrap();
    writeln!(f, "pub const DEFAULT_INC_DURATION_MS: u16 = {};", board.default_ms).unwrap();
    writeln!(
        f,
        "pub const REGISTRATION_TIMEOUT_MS: u32 = {};",
        board.registration_timeout_ms
    )
    .unwrap();
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
