mod debug_report;

use datesniff::{Config, DateResolutionMode, FormatInferrer};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    init_logging();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let mut inferrer = match FormatInferrer::new(cli.config) {
        Ok(inferrer) => inferrer,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let palette = debug_report::Palette::new(cli.color);
    for sample in &cli.samples {
        let trace = inferrer.classify_verbose(sample);
        let recorded = inferrer.train(Some(sample));
        debug_report::print_sample(&trace, recorded.as_deref(), &palette);
    }
    debug_report::print_summary(&inferrer, &palette);

    if cli.dump_state {
        match inferrer.serialize() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "datesniff=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

struct Cli {
    config: Config,
    samples: Vec<String>,
    color: bool,
    dump_state: bool,
}

fn parse_args() -> Result<Cli, String> {
    let mut config = Config::default();
    let mut samples: Vec<String> = Vec::new();
    let mut color = io::stdout().is_terminal();
    let mut dump_state = false;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("datesniff {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--strict" => config.strict = true,
            "--lenient" => config.lenient = true,
            "--no-lenient" => config.lenient = false,
            "--no-abbreviation-punctuation" => config.no_abbreviation_punctuation = true,
            "--state" => dump_state = true,
            "--locale" | "-l" => {
                config.locale = args.next().ok_or_else(|| "error: --locale expects a value".to_string())?;
            }
            "--resolution" | "-r" => {
                let value = args.next().ok_or_else(|| "error: --resolution expects a value".to_string())?;
                config.resolution_mode = parse_resolution(&value)?;
            }
            "--" => {
                samples.extend(args.by_ref());
                break;
            }
            _ if arg.starts_with("--locale=") => {
                config.locale = arg.trim_start_matches("--locale=").to_string();
            }
            _ if arg.starts_with("--resolution=") => {
                config.resolution_mode = parse_resolution(arg.trim_start_matches("--resolution="))?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => samples.push(arg),
        }
    }

    if samples.is_empty() {
        samples = read_stdin_samples()?;
    }
    if samples.is_empty() {
        return Err(format!("error: no samples provided\n\n{}", help_text()));
    }

    Ok(Cli { config, samples, color, dump_state })
}

fn parse_resolution(value: &str) -> Result<DateResolutionMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "none" => Ok(DateResolutionMode::None),
        "day-first" | "dayfirst" => Ok(DateResolutionMode::DayFirst),
        "month-first" | "monthfirst" => Ok(DateResolutionMode::MonthFirst),
        "auto" => Ok(DateResolutionMode::Auto),
        _ => Err(format!("error: invalid --resolution '{value}' (expected none, day-first, month-first or auto)")),
    }
}

fn read_stdin_samples() -> Result<Vec<String>, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.lines().map(str::to_string).collect())
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "datesniff {version}

Infer a date/time format pattern from sample values.

Usage:
  datesniff [OPTIONS] [--] <sample...>
  datesniff [OPTIONS] < samples.txt

Options:
  -l, --locale <tag>             Locale of the samples. Default: en-US
  -r, --resolution <mode>        none, day-first, month-first or auto.
                                 Default: none
  --strict                       Give up after the first sample that does not fit.
  --lenient / --no-lenient       Accept all-zero dates such as 0000-00-00.
                                 Default: lenient
  --no-abbreviation-punctuation  Match abbreviations without their period (AUG for Aug.).
  --state                        Print the serialized training state after the report.
  --color                        Force ANSI color output.
  --no-color                     Disable ANSI color output.
  -h, --help                     Show this help message.
  -V, --version                  Print version information.

Set RUST_LOG=datesniff=trace to log every classification pass.

Exit codes:
  0  Success.
  1  Internal error.
  2  Invalid arguments, unsupported locale or missing samples.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
