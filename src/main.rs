use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use std::{ffi::OsString, path::PathBuf};

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("preview")
                .about("Prints the tree a fixture file describes")
                .arg(fixture_arg()),
        )
        .subcommand(
            Command::new("apply")
                .about("Writes a fixture into a new temp directory and keeps it")
                .arg(fixture_arg()),
        )
        .subcommand(
            Command::new("run")
                .about("Writes a fixture into a temp directory, runs a command inside it, then removes it")
                .arg(fixture_arg())
                .arg(
                    Arg::new("command")
                        .help("Program and arguments to run, after `--`")
                        .required(true)
                        .num_args(1..)
                        .last(true)
                        .value_parser(clap::value_parser!(OsString)),
                ),
        )
        .get_matches();

    init_logger(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("preview", args)) => handle_preview(args),
        Some(("apply", args)) => handle_apply(args),
        Some(("run", args)) => handle_run(args),
        _ => unreachable!(),
    }
}

fn fixture_arg() -> Arg {
    Arg::new("fixture")
        .help("TOML fixture file describing the tree")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
}

fn init_logger(is_verbose: bool) {
    let default_level = if is_verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn handle_preview(args: &ArgMatches) -> miette::Result<()> {
    let fixture = args
        .get_one::<PathBuf>("fixture")
        .expect("fixture required");

    tmptree::api::preview_fixture(fixture)?;

    Ok(())
}

fn handle_apply(args: &ArgMatches) -> miette::Result<()> {
    let fixture = args
        .get_one::<PathBuf>("fixture")
        .expect("fixture required");

    let root = tmptree::api::apply_fixture(fixture)?;

    println!("{}", root.display());

    Ok(())
}

fn handle_run(args: &ArgMatches) -> miette::Result<()> {
    let fixture = args
        .get_one::<PathBuf>("fixture")
        .expect("fixture required");
    let mut command = args
        .get_many::<OsString>("command")
        .expect("command required")
        .cloned();
    let program = command.next().expect("command has a program");
    let rest: Vec<OsString> = command.collect();

    let code = tmptree::api::run_fixture(fixture, &program, &rest)?;

    std::process::exit(code);
}
