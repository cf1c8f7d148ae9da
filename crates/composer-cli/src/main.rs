//! Terminal front end for the mail composer
//!
//! Drives one session: draft from a prompt, optionally change the tone,
//! pick a subject and hand the email to the logging transport.

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use composer_core::{ComposerConfig, ComposerController, GeminiClient, LoggingTransport};
use composer_types::{ComposerSnapshot, Tone};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with INFO as default if RUST_LOG not set
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let matches = command().get_matches();

    let config_path = matches.get_one::<String>("config");
    let mut config = ComposerConfig::load(config_path)?;
    if let Some(delay) = matches.get_one::<u64>("send-delay-ms") {
        config.transport.send_delay_ms = *delay;
    }
    match config_path {
        Some(path) => log::info!("Loaded configuration from {}", path),
        None => log::info!("No config file given, using defaults"),
    }

    let client = GeminiClient::new(config.gemini.clone())?;
    log::info!("Using model {}", client.model());
    let controller = ComposerController::new(client, LoggingTransport::new(config.transport.clone()));

    let succeeded = run_session(&controller, &matches).await;

    print_snapshot(&controller.snapshot())?;
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

fn command() -> Command {
    Command::new("mail-composer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Draft, refine and send an email with AI assistance")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Configuration file path (JSON)")
        )
        .arg(
            Arg::new("prompt")
                .long("prompt")
                .short('p')
                .value_name("TEXT")
                .help("What the email should say")
                .required(true)
        )
        .arg(
            Arg::new("to")
                .long("to")
                .value_name("RECIPIENTS")
                .help("Comma-separated recipients; without it only a draft is produced")
        )
        .arg(
            Arg::new("tone")
                .long("tone")
                .value_name("TONE")
                .help("Rewrite the draft in this tone")
                .value_parser(["Formal", "Casual", "Persuasive"])
        )
        .arg(
            Arg::new("subject")
                .long("subject")
                .value_name("TEXT")
                .help("Subject line; overrides the suggestions")
        )
        .arg(
            Arg::new("pick")
                .long("pick")
                .value_name("INDEX")
                .help("Which suggested subject to use")
                .value_parser(clap::value_parser!(usize))
                .default_value("0")
        )
        .arg(
            Arg::new("send-delay-ms")
                .long("send-delay-ms")
                .value_name("MS")
                .help("Simulated delivery delay of the logging transport")
                .value_parser(clap::value_parser!(u64))
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Stop before sending")
                .action(clap::ArgAction::SetTrue)
        )
}

/// Runs the session steps; errors are already recorded on the session, so
/// this only reports whether the last attempted step succeeded.
async fn run_session(
    controller: &ComposerController<GeminiClient, LoggingTransport>,
    matches: &ArgMatches,
) -> bool {
    if let Some(prompt) = matches.get_one::<String>("prompt") {
        controller.set_prompt(prompt.as_str());
    }
    if let Err(e) = controller.generate().await {
        log::error!("Failed to generate email: {}", e);
        return false;
    }

    if let Some(tone) = matches.get_one::<String>("tone") {
        let tone: Tone = match tone.parse() {
            Ok(tone) => tone,
            Err(e) => {
                log::error!("{}", e);
                return false;
            }
        };
        if let Err(e) = controller.refine(tone).await {
            log::error!("Failed to refine tone: {}", e);
            return false;
        }
    }

    if let Some(subject) = matches.get_one::<String>("subject") {
        controller.set_subject(subject.as_str());
    } else {
        let pick = matches.get_one::<usize>("pick").copied().unwrap_or(0);
        match controller.choose_suggestion(pick) {
            Ok(subject) => log::info!("Using suggested subject: {}", subject),
            Err(e) => log::warn!("{}", e),
        }
    }

    let recipients = match matches.get_one::<String>("to") {
        Some(to) if !matches.get_flag("dry-run") => to,
        _ => {
            log::info!("Draft only, not sending");
            return true;
        }
    };

    controller.set_recipients(recipients.as_str());
    match controller.send().await {
        Ok(receipt) => {
            log::info!("{} ({} recipient(s))", receipt.message, receipt.recipients);
            true
        }
        Err(e) => {
            log::error!("Failed to send email: {}", e);
            false
        }
    }
}

fn print_snapshot(snapshot: &ComposerSnapshot) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize session")?;
    println!("{}", json);
    Ok(())
}
