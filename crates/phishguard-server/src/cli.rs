use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "phishguard-server")]
#[command(author, version, about = "Phishing URL classification service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    /// Path to the XGBoost JSON model
    #[arg(short, long, env = "PHISHGUARD_MODEL")]
    pub model: Option<String>,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
