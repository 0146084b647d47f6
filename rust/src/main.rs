//! Minimal CLI around the password hashing core. Plaintexts are taken from the
//! argument list and never printed back.

use std::env;
use std::process::ExitCode;

use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zenith_crypto::config::{load_config, RuntimeConfig};
use zenith_crypto::crypto::passwords::{generate_hash, needs_rehash, verify_hash};

fn print_usage() -> ExitCode {
    eprintln!(
        "Commands:\n  hash-password <plaintext> [config]\n  \
         verify-password <plaintext> <argon2id-hash>\n  \
         needs-rehash <argon2id-hash> [config]\n  show-config <path>"
    );
    ExitCode::from(64)
}

fn init_tracing(default_level: Option<&str>) {
    let filter = env::var("RUST_LOG")
        .ok()
        .or_else(|| default_level.map(str::to_string))
        .unwrap_or_else(|| "info".into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn runtime_config(path: Option<&str>) -> Result<RuntimeConfig, ExitCode> {
    match path {
        Some(path) => load_config(path).map_err(|err| {
            eprintln!("config load failed: {err}");
            ExitCode::FAILURE
        }),
        None => Ok(RuntimeConfig::default()),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return print_usage();
    }

    let config_arg = match args[1].as_str() {
        "hash-password" | "needs-rehash" => args.get(3),
        "show-config" => args.get(2),
        _ => None,
    };
    let config = match runtime_config(config_arg.map(String::as_str)) {
        Ok(config) => config,
        Err(code) => return code,
    };
    init_tracing(config.log_level.as_deref());

    match args[1].as_str() {
        "hash-password" => {
            if !(3..=4).contains(&args.len()) {
                return print_usage();
            }
            match generate_hash(args[2].as_bytes(), config.salt_bytes(), &config.params) {
                Ok(hash) => {
                    println!("{hash}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("hashing failed: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        "verify-password" => {
            if args.len() != 4 {
                return print_usage();
            }
            match verify_hash(args[2].as_bytes(), &args[3]) {
                Ok(true) => {
                    println!("match");
                    ExitCode::SUCCESS
                }
                Ok(false) => {
                    println!("no-match");
                    ExitCode::FAILURE
                }
                Err(err) => {
                    eprintln!("verification failed: {err}");
                    ExitCode::from(2)
                }
            }
        }
        "needs-rehash" => {
            if !(3..=4).contains(&args.len()) {
                return print_usage();
            }
            match needs_rehash(&args[2], &config.params) {
                Ok(stale) => {
                    println!("{}", if stale { "yes" } else { "no" });
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("rehash check failed: {err}");
                    ExitCode::from(2)
                }
            }
        }
        "show-config" => {
            if args.len() != 3 {
                return print_usage();
            }
            let salt = if config.salt.is_some() {
                "<redacted in output>"
            } else {
                "<random per hash>"
            };
            let printable = json!({
                "hashing": {
                    "timeCost": config.params.time_cost(),
                    "memoryCost": config.params.memory_cost(),
                    "parallelism": config.params.parallelism(),
                    "keyLength": config.params.key_length(),
                    "saltLength": config.params.salt_length(),
                },
                "salt": salt,
                "logLevel": config.log_level,
            });
            match serde_json::to_string_pretty(&printable) {
                Ok(text) => {
                    println!("{text}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("rendering config failed: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        _ => print_usage(),
    }
}
