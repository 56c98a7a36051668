use clap::Parser;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(author, version, about = "Information gathering toolkit", long_about = None)]
pub struct Cli {
    /// Module to run; the interactive menu starts when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable detailed debug logging (global)
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Enable verbose logging (global)
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// JSON config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Per-probe timeout in milliseconds (overrides config)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Probes in flight at once; 1 is strictly sequential (overrides config)
    #[arg(short = 'c', long, global = true)]
    pub concurrency: Option<usize>,

    /// Also print negative and errored probes
    #[arg(long, global = true, default_value_t = false)]
    pub show_misses: bool,

    /// Disable coloured output
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Commands {
    /// Domain registration data
    Whois { target: String },

    /// A, AAAA, MX, NS, TXT and CNAME records
    Dns { target: String },

    /// IP geolocation
    Geo { target: String },

    /// TCP connect scan
    Ports {
        target: String,

        /// Use the short 12-port list instead of the extended one
        #[arg(long, default_value_t = false)]
        common: bool,

        /// Explicit ports, e.g. 22,80,8000-8010
        #[arg(short = 'p', long, conflicts_with = "common")]
        ports: Option<String>,
    },

    /// Subdomain brute force
    Subdomains { target: String },

    /// Directory brute force (200 and 403 are reported)
    Dirs { target: String },

    /// Web technology fingerprint
    Tech { target: String },

    /// Interactive menu
    Menu,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
