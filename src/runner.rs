use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Context;
use reqwest::Client;

use crate::cli::{Cli, Commands};
use recon_kit::analyze::TechDetector;
use recon_kit::config::Config;
use recon_kit::discover::SubdomainProbe;
use recon_kit::dns::{DnsRecordProbe, HickoryResolver, RECORD_TYPES};
use recon_kit::http_client::{create_probe_client, Redirects};
use recon_kit::lookup::{GeoLocator, WhoisClient};
use recon_kit::output::{Console, Tone};
use recon_kit::probe::http_probe::DirectoryProbe;
use recon_kit::probe::tcp_connect::TcpConnectProbe;
use recon_kit::probe::wordlists::{self, COMMON_PORTS, DIRECTORY_WORDS, EXTENDED_PORTS, SUBDOMAIN_WORDS};
use recon_kit::probe::{Probe, ProbeEngine};
use recon_kit::target::Target;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortList {
    Extended,
    Common,
    Custom(Vec<u16>),
}

impl PortList {
    fn ports(&self) -> Vec<u16> {
        match self {
            PortList::Extended => EXTENDED_PORTS.to_vec(),
            PortList::Common => COMMON_PORTS.to_vec(),
            PortList::Custom(ports) => ports.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Module {
    Whois,
    Dns,
    Geo,
    Ports(PortList),
    Subdomains,
    Dirs,
    Tech,
}

/// Everything a module needs, built once per process.
pub struct Toolkit {
    config: Config,
    console: Console,
    show_misses: bool,
    /// Subdomain resolution, `timeout_ms` per query.
    host_resolver: Arc<HickoryResolver>,
    /// DNS record lookups, `lookup_timeout_ms` per query.
    record_resolver: Arc<HickoryResolver>,
    path_client: Client,
    follow_client: Client,
}

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Configure logging based on global flags.
    // Keep external crates (reqwest/hyper/hickory) quiet so result lines stay readable.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter_str = format!(
        "recon_kit={crate},reqwest=info,hyper=info,hickory_proto=warn,hickory_resolver=warn",
        crate = crate_level
    );
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    config.validate()?;

    let console = Console::new(!cli.no_color && std::io::stdout().is_terminal());
    tracing::debug!(?config, "Configuration loaded");
    let toolkit = Toolkit::new(config, console, cli.show_misses)?;

    let (module, target) = match cli.command {
        None | Some(Commands::Menu) => return crate::menu::run_menu(&toolkit).await,
        Some(Commands::Whois { target }) => (Module::Whois, target),
        Some(Commands::Dns { target }) => (Module::Dns, target),
        Some(Commands::Geo { target }) => (Module::Geo, target),
        Some(Commands::Ports { target, common, ports }) => {
            let list = match ports {
                Some(raw) => PortList::Custom(wordlists::parse_ports(&raw).map_err(anyhow::Error::msg)?),
                None if common => PortList::Common,
                None => PortList::Extended,
            };
            (Module::Ports(list), target)
        }
        Some(Commands::Subdomains { target }) => (Module::Subdomains, target),
        Some(Commands::Dirs { target }) => (Module::Dirs, target),
        Some(Commands::Tech { target }) => (Module::Tech, target),
    };

    toolkit.run_reported(&module, &target).await;
    Ok(())
}

impl Toolkit {
    pub fn new(config: Config, console: Console, show_misses: bool) -> anyhow::Result<Self> {
        let path_client = create_probe_client(config.http_timeout(), &config.user_agent, Redirects::None)?;
        let follow_client = create_probe_client(config.http_timeout(), &config.user_agent, Redirects::Follow)?;
        let host_resolver = Arc::new(HickoryResolver::from_system(config.timeout()));
        let record_resolver = Arc::new(HickoryResolver::from_system(config.lookup_timeout()));
        Ok(Self { config, console, show_misses, host_resolver, record_resolver, path_client, follow_client })
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Run one module; any failure is printed, never propagated.
    pub async fn run_reported(&self, module: &Module, raw_target: &str) {
        if let Err(e) = self.run(module, raw_target).await {
            tracing::warn!(?module, error = %e, "Module failed");
            self.console.error(&e);
        }
    }

    pub async fn run(&self, module: &Module, raw_target: &str) -> anyhow::Result<()> {
        let target = Target::parse(raw_target)?;
        match module {
            Module::Whois => self.whois(&target).await,
            Module::Dns => self.dns(&target).await,
            Module::Geo => self.geo(&target).await,
            Module::Ports(list) => self.ports(&target, list.ports()).await,
            Module::Subdomains => self.subdomains(&target).await,
            Module::Dirs => self.dirs(&target).await,
            Module::Tech => self.tech(&target).await,
        }
    }

    /// Resolver whose per-query budget matches the engine timeout of `module`.
    fn resolver(&self, module: &Module) -> &Arc<HickoryResolver> {
        match module {
            Module::Dns => &self.record_resolver,
            _ => &self.host_resolver,
        }
    }

    fn engine(&self, timeout: std::time::Duration) -> ProbeEngine {
        ProbeEngine::new(timeout, self.config.concurrency)
    }

    async fn session<P: Probe>(
        &self,
        engine: ProbeEngine,
        target: &Target,
        candidates: &[P::Candidate],
        probe: &P,
        noun: &str,
    ) {
        let reporter = self.console.reporter(self.show_misses);
        let session = engine.run(target, candidates, probe, &reporter).await;
        reporter.finish();
        self.console.summary(&session, noun);
    }

    async fn whois(&self, target: &Target) -> anyhow::Result<()> {
        self.console.section("WHOIS Lookup");
        let client = WhoisClient::new(self.config.whois_server.clone(), self.config.lookup_timeout());
        let record = client.lookup(target).await?;
        self.console.fields(&record.fields());
        Ok(())
    }

    async fn dns(&self, target: &Target) -> anyhow::Result<()> {
        self.console.section("DNS Lookup");
        let domain = Target::parse(&target.host())?;
        let probe = DnsRecordProbe::new(self.resolver(&Module::Dns).clone());
        let engine = self.engine(self.config.lookup_timeout());
        self.session(engine, &domain, &RECORD_TYPES, &probe, "record types").await;
        Ok(())
    }

    async fn geo(&self, target: &Target) -> anyhow::Result<()> {
        self.console.section("IP Geolocation");
        let locator = GeoLocator::new(
            self.follow_client.clone(),
            self.config.geo_endpoint.clone(),
            self.config.lookup_timeout(),
        );
        let location = locator.locate(target).await?;
        self.console.fields(&location.fields());
        Ok(())
    }

    async fn ports(&self, target: &Target, ports: Vec<u16>) -> anyhow::Result<()> {
        self.console.section("Port Scanner");
        let host = Target::parse(&target.host())?;
        let engine = self.engine(self.config.timeout());
        self.session(engine, &host, &ports, &TcpConnectProbe, "open ports").await;
        Ok(())
    }

    async fn subdomains(&self, target: &Target) -> anyhow::Result<()> {
        self.console.section("Subdomain Finder");
        let domain = Target::parse(&target.host())?;
        let probe = SubdomainProbe::new(self.resolver(&Module::Subdomains).clone());
        let words = wordlists::words(SUBDOMAIN_WORDS);
        let engine = self.engine(self.config.timeout());
        self.session(engine, &domain, &words, &probe, "subdomains").await;
        Ok(())
    }

    async fn dirs(&self, target: &Target) -> anyhow::Result<()> {
        self.console.section("Directory Brute Forcer");
        let base = Target::parse(&target.url()?)?;
        let probe = DirectoryProbe::new(self.path_client.clone());
        let words = wordlists::words(DIRECTORY_WORDS);
        let engine = self.engine(self.config.http_timeout());
        self.session(engine, &base, &words, &probe, "directories").await;
        Ok(())
    }

    async fn tech(&self, target: &Target) -> anyhow::Result<()> {
        self.console.section("Technology Detector");
        let detector = TechDetector::new(self.follow_client.clone(), self.config.http_timeout());
        let report = detector.detect(target).await;

        if let Some(e) = &report.error {
            self.console.error(e);
        }

        println!("{}", self.console.paint(Tone::Good, "Server Information:"));
        for (label, value) in report.fingerprint.header_fields() {
            println!("  {}: {}", label, value);
        }
        for product in &report.fingerprint.products {
            match &product.version {
                Some(version) => println!("  Product: {} {}", product.name, version),
                None => println!("  Product: {}", product.name),
            }
        }

        println!("\n{}", self.console.paint(Tone::Good, "Technologies Detected:"));
        if report.fingerprint.technologies.is_empty() {
            self.console.notice("  No specific technologies detected");
        }
        for tech in &report.fingerprint.technologies {
            println!("  {} {}", self.console.paint(Tone::Good, "✓"), tech);
        }
        Ok(())
    }
}
