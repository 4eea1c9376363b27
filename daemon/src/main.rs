//! badged daemon: entry point for scanning vouchers and managing badges.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::Parser;

use badged_crypto::{generate_keypair, keypair_from_private, CertificateEnvelope};
use badged_node::tracing_spans::command_span;
use badged_node::{init_logging, BadgeNode, SessionConfig};
use badged_scanner::{FrameSource, LineFrames, TextDecoder};
use badged_types::{Badge, PrivateKey, Serial};

#[derive(Parser)]
#[command(name = "badged", about = "Voucher redemption and badge ledger")]
struct Cli {
    /// Data directory for the badge ledger.
    #[arg(long, env = "BADGED_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Cooldown between redemptions, in milliseconds.
    #[arg(long, env = "BADGED_COOLDOWN_MS")]
    cooldown_ms: Option<u64>,

    /// Trusted issuer public keys, hex (comma-separated).
    #[arg(long = "trusted-key", env = "BADGED_TRUSTED_KEYS", value_delimiter = ',')]
    trusted_keys: Vec<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BADGED_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BADGED_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "BADGED_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Scan payloads, one text line per frame, until the input ends or a
    /// shutdown signal arrives.
    Scan {
        /// Read frames from this file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Inspect the badge ledger.
    Badges {
        #[command(subcommand)]
        action: BadgesAction,
    },
    /// Work with voucher certificates.
    Cert {
        #[command(subcommand)]
        action: CertAction,
    },
}

#[derive(clap::Subcommand)]
enum BadgesAction {
    /// List every badge, newest serial first.
    List {
        /// Print the badges as a JSON array.
        #[arg(long)]
        json: bool,
    },
    /// Show one badge.
    Show { serial: String },
}

#[derive(clap::Subcommand)]
enum CertAction {
    /// Verify a payload's certificate without redeeming it.
    Check { payload: String },
    /// Print a payload's certificate content without verifying it.
    Inspect { payload: String },
    /// Sign voucher content and print the payload to encode in a QR code.
    Issue {
        /// Issuer private key, hex.
        #[arg(long, env = "BADGED_ISSUER_KEY")]
        private_key: String,
        /// Certificate domain tag.
        #[arg(long, default_value = "voucher")]
        domain: String,
        /// Voucher content as a JSON object.
        content: String,
    },
    /// Generate an issuer key pair.
    Keygen,
}

impl Cli {
    /// File settings (or defaults) with CLI flags and env vars on top.
    fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SessionConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(ms) = self.cooldown_ms {
            config.cooldown_ms = ms;
        }
        if !self.trusted_keys.is_empty() {
            config.trusted_keys = self.trusted_keys.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.session_config()?;
    init_logging(config.log_format()?, &config.log_level);

    match cli.command {
        Command::Scan { input } => scan(config, input).await,
        Command::Badges { action } => {
            let node = BadgeNode::open(config)?;
            match action {
                BadgesAction::List { json } => list_badges(&node, json),
                BadgesAction::Show { serial } => show_badge(&node, &serial),
            }
        }
        Command::Cert { action } => match action {
            CertAction::Check { payload } => {
                let _span = command_span("cert_check").entered();
                let node = BadgeNode::open(config)?;
                if node.orchestrator().check(&payload)? {
                    println!("valid");
                    Ok(())
                } else {
                    bail!("certificate is not valid")
                }
            }
            CertAction::Inspect { payload } => {
                let _span = command_span("cert_inspect").entered();
                let node = BadgeNode::open(config)?;
                let content = node.orchestrator().inspect(&payload)?;
                println!("{}", serde_json::to_string_pretty(&content)?);
                Ok(())
            }
            CertAction::Issue {
                private_key,
                domain,
                content,
            } => issue(&private_key, &domain, &content),
            CertAction::Keygen => {
                let keypair = generate_keypair();
                println!("private: {}", hex::encode(keypair.private.0));
                println!("public:  {}", keypair.public);
                Ok(())
            }
        },
    }
}

async fn scan(config: SessionConfig, input: Option<PathBuf>) -> anyhow::Result<()> {
    let node = BadgeNode::open(config)?;
    let frames: Box<dyn FrameSource> = match &input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Box::new(LineFrames::new(BufReader::new(file)))
        }
        None => Box::new(LineFrames::new(BufReader::new(io::stdin()))),
    };

    let (mut session, mut reports) = node.start_session(frames, Arc::new(TextDecoder))?;
    let shutdown = session.shutdown_handle();
    let signals = tokio::spawn(async move { shutdown.wait_for_signal().await });

    // The channel closes when the input ends or a signal stops the session.
    while let Some(report) = reports.recv().await {
        match &report.result {
            Ok(outcome) => {
                let badge = outcome.badge();
                println!(
                    "#{} {} [{}] {}",
                    report.attempt,
                    report.status_message(),
                    badge.serial,
                    badge.display_name()
                );
            }
            Err(e) => println!("#{} {} ({e})", report.attempt, report.status_message()),
        }
    }

    session.stop().await?;
    signals.abort();
    tracing::info!(stats = ?session.stats(), "badged scan exited cleanly");
    Ok(())
}

fn list_badges(node: &BadgeNode, json: bool) -> anyhow::Result<()> {
    let _span = command_span("badges_list").entered();
    let badges = node.ledger().list()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&badges)?);
        return Ok(());
    }
    if badges.is_empty() {
        println!("no badges yet");
    }
    for badge in &badges {
        println!(
            "{}\t{}\t{}\t{}",
            badge.serial,
            badge.display_name(),
            badge.holder,
            badge.formatted_date()
        );
    }
    Ok(())
}

fn show_badge(node: &BadgeNode, serial: &str) -> anyhow::Result<()> {
    let _span = command_span("badges_show").entered();
    let serial = Serial::parse(serial)?;
    let Some(badge) = node.ledger().get(&serial)? else {
        bail!("no badge with serial {serial}");
    };
    print_badge(&badge);
    Ok(())
}

fn print_badge(badge: &Badge) {
    println!("{}", badge.display_name());
    println!("Serial: {}", badge.serial);
    println!("{}", badge.display_description());
    println!("Redeemed: {}", badge.formatted_date());
    println!("Certificate: {}", badge.certificate_data);
}

fn issue(private_key: &str, domain: &str, content: &str) -> anyhow::Result<()> {
    let _span = command_span("cert_issue").entered();
    let parsed: serde_json::Value =
        serde_json::from_str(content).context("voucher content must be JSON")?;
    if !parsed.is_object() {
        bail!("voucher content must be a JSON object");
    }
    let issuer = keypair_from_private(PrivateKey::from_hex(private_key)?);
    let envelope = CertificateEnvelope::issue(domain, content.as_bytes(), &issuer);
    println!("{}", STANDARD.encode(envelope.to_bytes()?));
    Ok(())
}
