//! `switchctl` — command-line front end for the switch network controller.
//!
//! ```text
//! switchctl [--port <dev>] [--timeout <secs>] [--no-verify] <pathname>
//! switchctl [--port <dev>] [--timeout <secs>] [--no-verify] powerdown
//! switchctl list
//! ```

use std::env;
use std::process::ExitCode;

use anyhow::{Result, bail};
use log::info;

use switchnet::SwitchNetwork;
use switchnet::config::ControllerConfig;

struct Args {
    config: ControllerConfig,
    verify: bool,
    target: String,
}

fn parse_args() -> Result<Args> {
    let mut config = ControllerConfig::default();
    let mut verify = true;
    let mut target = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--port" => match args.next() {
                Some(port) => config.serial_port = port,
                None => bail!("--port needs a value"),
            },
            "--timeout" => match args.next().map(|v| v.parse()) {
                Some(Ok(secs)) => config.timeout_secs = secs,
                _ => bail!("--timeout needs a whole number of seconds"),
            },
            "--no-verify" => verify = false,
            other if other.starts_with('-') => bail!("unknown option: {other}"),
            other => {
                if target.replace(other.to_owned()).is_some() {
                    bail!("expected exactly one path name");
                }
            }
        }
    }

    let Some(target) = target else {
        bail!(
            "usage: switchctl [--port <dev>] [--timeout <secs>] [--no-verify] \
             <pathname>|powerdown|list"
        );
    };

    Ok(Args {
        config,
        verify,
        target,
    })
}

fn run() -> Result<()> {
    let args = parse_args()?;

    if args.target == "list" {
        for (name, bits) in &args.config.paths {
            println!("{name:>8}  {bits}");
        }
        return Ok(());
    }

    let mut network = SwitchNetwork::open(&args.config)?;
    info!("connected to {}", args.config.serial_port);

    let outcome = if args.target == "powerdown" {
        network.powerdown(args.verify)?
    } else {
        network.switch(&args.target, args.verify)?
    };

    match outcome {
        Some(o) if o.matched => {
            println!("{} verified ({})", o.set_pathname, o.set_bits);
        }
        Some(o) => {
            println!(
                "MISMATCH: requested {}, switch reports {} ({})",
                args.target, o.set_pathname, o.set_bits
            );
        }
        None => println!("{} sent (unverified)", args.target),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
