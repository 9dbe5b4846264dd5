use anyhow::Context;

use mediavault_core::models::{MetaEntry, MetaEntryType};

/// Parse a `--meta` argument of the form `name=type:value`, where `type` is
/// one of url, text-input, free-text, number. The value may be empty.
pub fn parse_meta_arg(arg: &str) -> anyhow::Result<MetaEntry> {
    let (name, rest) = arg
        .split_once('=')
        .with_context(|| format!("Expected name=type:value, got '{}'", arg))?;
    let (entry_type, value) = rest
        .split_once(':')
        .with_context(|| format!("Expected type:value after '=', got '{}'", rest))?;
    let entry_type: MetaEntryType = entry_type
        .parse()
        .with_context(|| format!("Unknown metadata type '{}'", entry_type))?;
    Ok(MetaEntry::new(name, entry_type, value))
}

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
