//! country-skill: voice skill entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Resolve effective log level (CLI `-v` flags > config), init logger once
//!   4. Build the skill (knowledge provider + handler list), once
//!   5. `--invoke <path>`: handle one request envelope, print the response, exit
//!   6. Otherwise serve the HTTP channel until Ctrl-C

use std::io::Read;

use tracing::info;

use country_skill::config::Config;
use country_skill::envelope::RequestEnvelope;
use country_skill::error::AppError;
use country_skill::skill::Skill;
use country_skill::{config, logger};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present; ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let config = config::load(&config::config_path(args.config_path.as_deref()))?;

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    let filter = logger::parse_filter(effective_log_level)?;
    logger::init(filter, args.log_level.is_some())?;

    info!(
        skill_name = %config.skill_name,
        log_level = %effective_log_level,
        knowledge = %config.knowledge.provider,
        authority = %config.resolution.authority,
        skill_id_verified = config.skill_id.is_some(),
        "config loaded"
    );

    let skill = Skill::from_config(&config)
        .map_err(|e| AppError::Config(format!("knowledge provider: {e}")))?;

    info!(handlers = ?skill.handler_names(), "skill ready");

    if let Some(source) = args.invoke {
        return invoke_once(&skill, &source).await;
    }

    if !config.comms_http_should_load() {
        return Err(AppError::Config(
            "comms.http is disabled and no --invoke given; nothing to do".into(),
        ));
    }

    serve(&config, skill).await
}

#[cfg(feature = "channel-axum")]
async fn serve(config: &Config, skill: Skill) -> Result<(), AppError> {
    use std::sync::Arc;

    use country_skill::comms::SkillChannel;
    use tokio_util::sync::CancellationToken;

    let shutdown = CancellationToken::new();

    // Ctrl-C handler cancels the token so the channel shuts down gracefully.
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    let channel = SkillChannel::new("http0", &config.comms.http, Arc::new(skill));
    channel.run(shutdown).await
}

#[cfg(not(feature = "channel-axum"))]
async fn serve(_config: &Config, _skill: Skill) -> Result<(), AppError> {
    Err(AppError::Config(
        "built without channel-axum; only --invoke is available".into(),
    ))
}

/// Read one request envelope from `source` (`-` = stdin), print the response.
async fn invoke_once(skill: &Skill, source: &str) -> Result<(), AppError> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)
            .map_err(|e| AppError::Invoke(format!("cannot read {source}: {e}")))?
    };

    let envelope: RequestEnvelope = serde_json::from_str(&raw)
        .map_err(|e| AppError::Invoke(format!("malformed request envelope: {e}")))?;

    let reply = skill
        .invoke(&envelope)
        .await
        .map_err(|e| AppError::Invoke(e.to_string()))?;

    let json = serde_json::to_string_pretty(&reply)
        .map_err(|e| AppError::Invoke(format!("cannot serialize response: {e}")))?;
    println!("{json}");
    Ok(())
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
    invoke: Option<String>,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;
    let mut invoke = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: country-skill [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
                println!("      --invoke <PATH|->      Handle one request envelope and print the response");
                println!("  -v, -vv, -vvv, -vvvv       Set logging verbosity (warn, info, debug, trace)");
                std::process::exit(0);
            }
            "-f" | "--config" => {
                if let Some(path) = iter.next() {
                    config_path = Some(path);
                } else {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--invoke" => {
                if let Some(path) = iter.next() {
                    invoke = Some(path);
                } else {
                    eprintln!("error: --invoke requires a path argument (or - for stdin)");
                    std::process::exit(1);
                }
            }
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            other => {
                eprintln!("error: unexpected argument '{other}' (see --help)");
                std::process::exit(1);
            }
        }
    }

    let log_level = match verbosity {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("debug"),
        _ => Some("trace"),
    };

    CliArgs { log_level, config_path, invoke }
}
