use std::net::Ipv4Addr;
use std::process::ExitCode;

use clap::Parser;

mod resolver;

#[derive(Parser)]
#[command(name = "dnsq")]
#[command(version)]
#[command(about = "Resolve a domain name to an IPv4 address over UDP")]
struct Cli {
    /// The domain name to resolve to an IP address
    domain: String,

    /// Upstream resolver to query on port 53
    #[arg(short, long, default_value_t = Ipv4Addr::new(8, 8, 8, 8))]
    server: Ipv4Addr,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match resolver::resolve(&cli.domain, cli.server) {
        Ok(address) => {
            println!("{address}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
