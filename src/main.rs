//! addr - look up IP address and ASN ownership and routing information.
//!
//! This is the command-line interface for the addr library.

use addr::{Config, ConfigBuilder, QueryKind, ResolvedRecord, Resolver};
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use log::LevelFilter;
use std::net::IpAddr;

/// Get the version string for addr
fn get_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(env!("CARGO_PKG_VERSION"), "-UNRELEASED")
    } else {
        env!("CARGO_PKG_VERSION")
    }
}

/// Command-line arguments for the lookup tool.
#[derive(Parser, Debug)]
#[clap(
    author,
    version = get_version(),
    about = "Look up IP & ASN ownership and routing information",
    long_about = None
)]
struct Args {
    #[clap(subcommand)]
    command: Option<Command>,

    /// IP addresses, prefixes or ASNs to look up
    queries: Vec<String>,

    /// Output results in JSON format
    #[clap(long, global = true)]
    json: bool,

    /// Disable reverse DNS lookups
    #[clap(long, global = true)]
    no_rdns: bool,

    /// WHOIS server host (default: bgp.tools, env: ADDR_WHOIS_HOST)
    #[clap(long, global = true)]
    whois_host: Option<String>,

    /// WHOIS server port (default: 43, env: ADDR_WHOIS_PORT)
    #[clap(long, global = true)]
    whois_port: Option<u16>,

    /// DNS resolver as host:port (default: 1.1.1.1:53, env: ADDR_DNS_SERVER)
    #[clap(long, global = true)]
    dns_server: Option<String>,

    /// Enable verbose logging (repeat for more detail)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Look up an IP address or prefix
    Ip {
        /// Addresses or prefixes
        queries: Vec<String>,
    },
    /// Look up an ASN
    Asn {
        /// ASNs, with or without the AS prefix
        queries: Vec<String>,
    },
}

/// Which kinds of query an invocation accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Any,
    Ip,
    Asn,
}

/// How results are printed
#[derive(Debug, Clone, Copy)]
struct OutputOptions {
    json: bool,
    rdns: bool,
}

/// JSON output structure for a single query
#[derive(Debug, serde::Serialize)]
struct JsonOutput<'a> {
    query: &'a str,
    #[serde(flatten)]
    record: &'a ResolvedRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    hostnames: Option<&'a [String]>,
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    // Single-threaded runtime; queries run one after another
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to create Tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(async_main(args)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn async_main(args: Args) -> Result<()> {
    let (mode, queries) = match &args.command {
        None => (Mode::Any, &args.queries),
        Some(Command::Ip { queries }) => (Mode::Ip, queries),
        Some(Command::Asn { queries }) => (Mode::Asn, queries),
    };

    if queries.is_empty() {
        print_help(args.command.as_ref())?;
        return Ok(());
    }

    let resolver = Resolver::with_config(build_config(&args)?);
    let options = OutputOptions {
        json: args.json,
        rdns: !args.no_rdns,
    };

    for query in queries {
        let output = lookup(&resolver, mode, query, options).await?;
        println!("{}", output);
    }
    Ok(())
}

/// Print help for the invoked command
fn print_help(command: Option<&Command>) -> Result<()> {
    let mut cmd = Args::command();
    let name = match command {
        None => None,
        Some(Command::Ip { .. }) => Some("ip"),
        Some(Command::Asn { .. }) => Some("asn"),
    };
    match name.and_then(|name| cmd.find_subcommand_mut(name)) {
        Some(sub) => sub.print_help()?,
        None => cmd.print_help()?,
    }
    Ok(())
}

/// Map the `-v` count to a log level
fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize `env_logger`. `RUST_LOG` is honoured unless `-v` is given.
fn init_logger(verbose: u8) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if verbose > 0 {
        builder.filter_level(log_level(verbose));
    }
    builder.filter_module("hickory_proto", LevelFilter::Error);
    builder.filter_module("hickory_resolver", LevelFilter::Error);
    builder.format_timestamp(None);
    // Only fails if a logger is already installed
    let _ = builder.try_init();
}

/// Environment configuration with command-line overrides applied
fn build_config(args: &Args) -> Result<Config> {
    let mut builder = ConfigBuilder::from(Config::from_env()?);
    if let Some(host) = &args.whois_host {
        builder = builder.whois_host(host.as_str());
    }
    if let Some(port) = args.whois_port {
        builder = builder.whois_port(port);
    }
    if let Some(server) = &args.dns_server {
        builder = builder.dns_server(server.as_str());
    }
    Ok(builder.build()?)
}

/// Resolve one query and render it
async fn lookup(
    resolver: &Resolver,
    mode: Mode,
    query: &str,
    options: OutputOptions,
) -> Result<String> {
    let kind = match (mode, QueryKind::detect(query)) {
        (Mode::Any, Some(kind)) => kind,
        (Mode::Ip, Some(QueryKind::Ip)) => QueryKind::Ip,
        (Mode::Asn, _) if addr::asn::is_asn(query) => QueryKind::Asn,
        _ => anyhow::bail!("invalid argument '{}'", query),
    };

    match kind {
        QueryKind::Ip => {
            let record = resolver.resolve_ip(query).await?;
            let hostnames = match record.ip {
                Some(ip) if options.rdns => reverse_names(resolver, ip).await,
                _ => Vec::new(),
            };
            if options.json {
                render_json(query, &record, Some(hostnames.as_slice()))
            } else {
                Ok(render_ip(&record, &hostnames))
            }
        }
        QueryKind::Asn => {
            let record = resolver.resolve_asn(query).await?;
            if options.json {
                render_json(query, &record, None)
            } else {
                Ok(render_asn(&record))
            }
        }
    }
}

/// PTR names for an address; failures only hide the names
async fn reverse_names(resolver: &Resolver, ip: IpAddr) -> Vec<String> {
    match resolver.reverse_lookup(ip).await {
        Ok(names) => names,
        Err(e) => {
            log::debug!("Reverse lookup for {} failed: {}", ip, e);
            Vec::new()
        }
    }
}

fn render_json(
    query: &str,
    record: &ResolvedRecord,
    hostnames: Option<&[String]>,
) -> Result<String> {
    let output = JsonOutput {
        query,
        record,
        hostnames,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Organization name followed by the country flag, if known
fn owner_line(record: &ResolvedRecord) -> String {
    match &record.country {
        Some(country) => format!("{} {}", record.name, country.flag()),
        None => record.name.clone(),
    }
}

/// Display an address or prefix lookup as text
fn render_ip(record: &ResolvedRecord, hostnames: &[String]) -> String {
    let mut lines = Vec::new();

    let title = record
        .ip
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown address".to_string());
    lines.push(title);

    for name in hostnames {
        lines.push(format!("  {}", name));
    }

    let prefix = record
        .prefix
        .map(|p| p.to_string())
        .unwrap_or_else(|| "unknown prefix".to_string());
    if record.from_query {
        lines.push(format!("  advertised as {}", prefix));
        lines.push(format!("  {}", record.asn));
    } else {
        lines.push(format!("  from {}", prefix));
        lines.push("  Never Advertised".to_string());
    }
    lines.push(format!("  {}", owner_line(record)));
    lines.push(format!("  Registry: {}", record.registry));

    lines.join("\n")
}

/// Display an ASN lookup as text
fn render_asn(record: &ResolvedRecord) -> String {
    format!("{}\n  {}", record.asn, owner_line(record))
}
