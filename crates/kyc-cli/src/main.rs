//! kycvault: operator tooling for encrypted KYC document containers
//!
//! Commands:
//!   encrypt <input> [-o <out>]                 - seal a file, print its record as JSON
//!   decrypt <input> [-o <out>] [--expect-hash] - open a container, optionally verify digest
//!   inspect <input>                            - container metadata (no secret needed)
//!   hash <input>                               - SHA-256 of a file
//!   verify <input> <hash>                      - compare a file against a SHA-256 digest
//!   config show                                - print the effective configuration
//!
//! The passphrase is read from the environment variable named by
//! `crypto.passphrase_env` (default `KYC_ENCRYPTION_SECRET`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use kyc_core::VaultConfig;
use kyc_crypto::{EncryptionConfig, FileCodec};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "kycvault",
    version,
    about = "Encrypt, decrypt and inspect KYC document containers"
)]
struct Cli {
    /// Path to config.toml
    #[arg(
        long,
        short = 'c',
        env = "KYC_VAULT_CONFIG",
        default_value = "/etc/kyc-vault/config.toml"
    )]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "KYC_LOG")]
    log: Option<String>,

    /// Log format; overrides the config file
    #[arg(long, env = "KYC_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, ValueEnum, PartialEq)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a file into a container
    Encrypt {
        /// Plaintext file
        input: PathBuf,
        /// Container path (default: <input>.enc)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Original filename to record (default: input file name)
        #[arg(long)]
        name: Option<String>,
        /// Overwrite the output if it exists
        #[arg(long)]
        force: bool,
    },

    /// Decrypt a container
    Decrypt {
        /// Container file
        input: PathBuf,
        /// Plaintext path (default: input without .enc, else <input>.dec)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// SHA-256 recorded at upload; decryption fails if the content differs
        #[arg(long)]
        expect_hash: Option<String>,
        /// Overwrite the output if it exists
        #[arg(long)]
        force: bool,
    },

    /// Show container metadata without decrypting
    Inspect {
        input: PathBuf,
    },

    /// Print the SHA-256 digest of a file
    Hash {
        input: PathBuf,
    },

    /// Check a file against a SHA-256 digest (exit status 1 on mismatch)
    Verify {
        input: PathBuf,
        hash: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = VaultConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;

    let level = cli.log.clone().unwrap_or_else(|| config.logging.level.clone());
    let format = cli.log_format.clone().unwrap_or(match config.logging.format.as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Text,
    });
    init_logging(&level, &format);

    if !cli.config.exists() {
        warn!("config file not found: {}  (using defaults)", cli.config.display());
    }

    match cli.command {
        Commands::Encrypt { input, output, name, force } => {
            cmd_encrypt(&config, &input, output.as_deref(), name.as_deref(), force)
        }
        Commands::Decrypt { input, output, expect_hash, force } => {
            cmd_decrypt(&config, &input, output.as_deref(), expect_hash.as_deref(), force)
        }
        Commands::Inspect { input } => cmd_inspect(&input),
        Commands::Hash { input } => cmd_hash(&input),
        Commands::Verify { input, hash } => cmd_verify(&input, &hash),
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &cli.config),
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries command output; logs go to stderr
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn build_codec(config: &VaultConfig) -> Result<FileCodec> {
    let encryption = EncryptionConfig::from_env(&config.crypto).with_context(|| {
        format!(
            "initialising encryption (secret from ${})",
            config.crypto.passphrase_env
        )
    })?;
    info!(algorithm = encryption.algorithm(), "encryption key derived");
    Ok(FileCodec::new(encryption))
}

// ── `kycvault encrypt` ────────────────────────────────────────────────────────

fn cmd_encrypt(
    config: &VaultConfig,
    input: &Path,
    output: Option<&Path>,
    name: Option<&str>,
    force: bool,
) -> Result<()> {
    let plaintext =
        std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let codec = build_codec(config)?;

    let original_name = match name {
        Some(n) => n.to_string(),
        None => input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".into()),
    };

    let sealed = kyc_crypto::seal(&codec, &original_name, &plaintext)
        .with_context(|| format!("encrypting {}", input.display()))?;

    let out_path = output.map(Path::to_path_buf).unwrap_or_else(|| encrypted_path(input));
    write_output(&out_path, &sealed.container, force)?;

    info!(
        input = %input.display(),
        output = %out_path.display(),
        bytes = sealed.record.original_size,
        "encrypted"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&sealed.record).context("serializing record")?
    );
    Ok(())
}

// ── `kycvault decrypt` ────────────────────────────────────────────────────────

fn cmd_decrypt(
    config: &VaultConfig,
    input: &Path,
    output: Option<&Path>,
    expect_hash: Option<&str>,
    force: bool,
) -> Result<()> {
    let container =
        std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    if !kyc_crypto::is_encrypted(&container) {
        anyhow::bail!("{} is not an encrypted container", input.display());
    }

    let codec = build_codec(config)?;
    let plaintext = kyc_crypto::open(&codec, &container, expect_hash)
        .with_context(|| format!("decrypting {}", input.display()))?;

    let out_path = output.map(Path::to_path_buf).unwrap_or_else(|| decrypted_path(input));
    write_output(&out_path, &plaintext, force)?;

    info!(
        input = %input.display(),
        output = %out_path.display(),
        bytes = plaintext.len() as u64,
        verified = expect_hash.is_some(),
        "decrypted"
    );
    println!("{}", out_path.display());
    Ok(())
}

// ── `kycvault inspect` ────────────────────────────────────────────────────────

fn cmd_inspect(input: &Path) -> Result<()> {
    let data = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let meta = kyc_crypto::encryption_metadata(&data);
    println!(
        "{}",
        serde_json::to_string_pretty(&meta).context("serializing metadata")?
    );
    Ok(())
}

// ── `kycvault hash` / `kycvault verify` ───────────────────────────────────────

fn cmd_hash(input: &Path) -> Result<()> {
    let data = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    println!("{}  {}", kyc_crypto::generate_file_hash(&data), input.display());
    Ok(())
}

fn cmd_verify(input: &Path, hash: &str) -> Result<()> {
    let data = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    if !kyc_crypto::verify_file_integrity(&data, hash) {
        anyhow::bail!(
            "{}: digest mismatch (actual {})",
            input.display(),
            kyc_crypto::generate_file_hash(&data)
        );
    }
    println!("{}: OK", input.display());
    Ok(())
}

// ── `kycvault config show` ────────────────────────────────────────────────────

fn cmd_config_show(config: &VaultConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = config.to_toml().context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn encrypted_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".enc");
    PathBuf::from(name)
}

fn decrypted_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext == "enc" && input.file_stem().is_some() => input.with_extension(""),
        _ => {
            let mut name = input.as_os_str().to_owned();
            name.push(".dec");
            PathBuf::from(name)
        }
    }
}

fn write_output(path: &Path, data: &[u8], force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    std::fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}
