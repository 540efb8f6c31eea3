use clap::Parser;
use pkgdeps::config::{DiscoverConfig, PkgdepsConfig};
use pkgdeps::output::{OutputFormat, OutputFormatter};
use pkgdeps::{FileImports, Importer, SearchRoots};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// List the imports used across a Go package.
#[derive(Parser, Debug)]
#[command(name = "pkgdeps", version)]
struct Cli {
    /// Package import path (e.g. github.com/user/repo/pkg)
    package: Option<String>,

    /// Print the imports of a single source file instead of a package
    #[arg(long, value_name = "PATH", conflicts_with = "package")]
    file: Option<PathBuf>,

    /// Search roots, overriding GOPATH (path-list separated)
    #[arg(long, value_name = "PATHS")]
    gopath: Option<OsString>,

    /// Descend into symlinked directories
    #[arg(long, overrides_with = "no_follow_links")]
    follow_links: bool,

    /// Do not descend into symlinked directories (default)
    #[arg(long, overrides_with = "follow_links")]
    no_follow_links: bool,

    /// Include *_test.go files (default)
    #[arg(long, overrides_with = "no_tests")]
    tests: bool,

    /// Skip *_test.go files
    #[arg(long, overrides_with = "tests")]
    no_tests: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Output as JSON Lines
    #[arg(long, conflicts_with = "json")]
    jsonl: bool,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Reset SIGPIPE to default behavior so piping to `head` etc. doesn't panic.
#[cfg(unix)]
fn reset_sigpipe() {
    // SAFETY: libc::signal is a standard POSIX function; this only changes
    // the disposition of SIGPIPE back to "terminate".
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}

/// `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `--x` / `--no-x` as an override; `None` leaves the configured value.
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = PkgdepsConfig::load(&cwd);

    let roots = match &cli.gopath {
        Some(list) => SearchRoots::from_path_list(list),
        None => config.search_roots(SearchRoots::from_env("GOPATH")),
    };
    let discover = config
        .discover
        .merge(DiscoverConfig {
            follow_links: flag_pair(cli.follow_links, cli.no_follow_links),
            include_tests: flag_pair(cli.tests, cli.no_tests),
        })
        .options();
    let format = OutputFormat::from_cli(cli.json, cli.jsonl, config.output.format);
    let importer = Importer::go(roots).with_discover_options(discover);

    if let Some(file) = cli.file {
        let imports = importer
            .file_imports(&file)
            .map_err(|e| format!("Error getting imports: {}", e))?;
        FileImports { file, imports }.print(format);
        return Ok(());
    }

    let Some(package) = cli.package else {
        return Err("package name required as argument".to_string());
    };
    let report = importer
        .package_report(&package)
        .map_err(|e| format!("Error getting imports: {}", e))?;
    report.print(format);
    Ok(())
}

fn main() {
    reset_sigpipe();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(message) = run(cli) {
        eprintln!("{}", message);
        std::process::exit(1);
    }
}
