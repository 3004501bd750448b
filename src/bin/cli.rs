//! Thin command-line driver: connects to a cluster, sends one command, and
//! prints the rendered reply. Grounded in the original source's `example.c`
//! demo driver.

use clap::Parser;
use rscluster::config::{parse_host_port, ClusterConfig, Endpoint};
use rscluster::resp::render;
use rscluster::ClusterClient;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "redis-cluster-cli", about = "Send one command to a sharded key-value cluster")]
struct Args {
    /// Bootstrap node, as host:port. May be repeated.
    #[arg(long = "node", required = true)]
    nodes: Vec<String>,

    /// Maximum number of cached connections.
    #[arg(long = "max-conn")]
    max_conn: Option<usize>,

    /// Command name and arguments, e.g. `GET foo`.
    #[arg(required = true)]
    command: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let bootstrap: Result<Vec<Endpoint>, _> = args.nodes.iter().map(|s| parse_host_port(s)).collect();
    let bootstrap = match bootstrap {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = match ClusterConfig::new(bootstrap) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(max_conn) = args.max_conn {
        config = config.with_max_conn(max_conn);
    }

    let mut client = match ClusterClient::new(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let argv: Vec<&[u8]> = args.command.iter().map(|s| s.as_bytes()).collect();
    match client.execute(&argv) {
        Ok(reply) => {
            let text = render(&reply);
            if !text.is_empty() {
                println!("{text}");
            }
            if reply.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
