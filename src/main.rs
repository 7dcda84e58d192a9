use indoc::indoc;
use log::{debug, LevelFilter};
use openit::{Config, Dispatcher, Error, Host, Registry, Spawned};
use std::io::Write;
use std::process::ExitCode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage() {
    println!(indoc! {"
usage: openit [options] <resource> [<args>...]

Open a URL or file with the right program for this machine, without
waiting for that program to exit (except on Windows, where the launch
command itself returns immediately).

options:
    --debug            Log how the launcher was chosen
    --dry-run          Print the command instead of running it
    --host-os <name>   Pretend to be running on <name>, e.g. darwin
    --version          Print the version of openit and exit
    --help             Print this help
"});
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    debug: bool,
    dry_run: bool,
    host_os: Option<String>,
}

#[derive(Debug, PartialEq)]
enum Args {
    Help,
    Version,
    Open(Options, Vec<String>),
    Error(String),
}

fn parse_args(args: Vec<String>) -> Args {
    let mut options = Options::default();
    let mut rest = Vec::new();

    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        if !rest.is_empty() {
            // Everything after the resource belongs to it.
            rest.push(arg);
            continue;
        }
        match arg.as_str() {
            "--help" | "-h" | "-?" => return Args::Help,
            "--version" => return Args::Version,
            "--debug" => options.debug = true,
            "--dry-run" => options.dry_run = true,
            "--host-os" => match iter.next() {
                Some(host_os) => options.host_os = Some(host_os),
                None => return Args::Error("--host-os needs a value".to_string()),
            },
            "--" => rest.extend(iter.by_ref()),
            a if a.starts_with("--") => {
                return Args::Error(format!("unknown option {a}"))
            }
            _ => rest.push(arg),
        }
    }

    if rest.is_empty() {
        Args::Error("nothing to open".to_string())
    } else {
        Args::Open(options, rest)
    }
}

fn init_logging(debug: bool) {
    let debug = debug
        || std::env::var("OPENIT_DEBUG").is_ok_and(|v| v == "1" || v == "true");
    env_logger::Builder::new()
        .filter_level(if debug { LevelFilter::Debug } else { LevelFilter::Warn })
        .parse_env("OPENIT_LOG")
        .init();
}

#[derive(Debug, PartialEq)]
enum Outcome {
    Launched,
    Printed,
    Unsupported,
}

fn exit_code(result: &anyhow::Result<Outcome>) -> u8 {
    match result {
        Ok(Outcome::Launched) | Ok(Outcome::Printed) => 0,
        Ok(Outcome::Unsupported) => 2,
        Err(_) => 1,
    }
}

fn apply_options(config: &mut Config, options: Options) {
    if options.host_os.is_some() {
        config.host_os = options.host_os;
    }
    config.dry_run |= options.dry_run;
}

fn configure(options: Options) -> anyhow::Result<Config> {
    let mut config = openit::load_config()?;
    config.apply_env(&openit::process_vars());
    apply_options(&mut config, options);
    Ok(config)
}

fn run<W: Write>(
    config: &Config,
    host: Host,
    resource: &[String],
    out: &mut W,
) -> anyhow::Result<Outcome> {
    let dispatcher = Dispatcher::new(Registry::with_builtin_handlers(config), host);

    if config.dry_run {
        let prepared = match dispatcher.prepare(resource) {
            Ok(prepared) => prepared,
            Err(Error::NoHandler(_)) => return Ok(Outcome::Unsupported),
            Err(e) => return Err(e.into()),
        };
        writeln!(out, "{}: {}", prepared.handler, prepared.request)?;
        return Ok(Outcome::Printed);
    }

    match dispatcher.open(resource) {
        Ok(Spawned::Detached { pid }) => debug!("launched as pid {pid}"),
        Ok(Spawned::Completed(status)) => debug!("launcher exited with {status}"),
        Err(Error::NoHandler(_)) => return Ok(Outcome::Unsupported),
        Err(e) => return Err(e.into()),
    }
    Ok(Outcome::Launched)
}

fn main() -> ExitCode {
    match parse_args(std::env::args().collect()) {
        Args::Help => {
            usage();
            ExitCode::SUCCESS
        }
        Args::Version => {
            println!("openit {VERSION}");
            ExitCode::SUCCESS
        }
        Args::Open(options, resource) => {
            init_logging(options.debug);
            let result = configure(options).and_then(|config| {
                let host = Host::current(&config);
                run(&config, host, &resource, &mut std::io::stdout())
            });
            match &result {
                Ok(Outcome::Unsupported) => eprintln!(
                    "Don't know how to open `{}` here",
                    resource.join(" ")
                ),
                Err(e) => eprintln!("Error: {e:?}"),
                Ok(_) => (),
            }
            ExitCode::from(exit_code(&result))
        }
        Args::Error(message) => {
            eprintln!("openit: {message}");
            usage();
            ExitCode::FAILURE
        }
    }
}
