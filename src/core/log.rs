use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Level for the crate's own events. `--verbose` turns on debug output,
/// otherwise nothing is logged unless `RUST_LOG` asks for it.
fn crate_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    }
}

/// Crate events at the requested level. Verbose runs also surface warnings
/// from the HTTP client, which is where transport failures are reported.
fn target_filter(verbose: bool) -> Targets {
    let level = crate_level(verbose);
    let http_level = level.min(LevelFilter::WARN);
    Targets::new()
        .with_target("fxtable", level)
        .with_target("reqwest", http_level)
}

/// Installs the global subscriber on stderr so table output on stdout stays
/// clean. `RUST_LOG` narrows what `verbose` enables.
pub fn init_logging(verbose: bool) {
    let fallback = crate_level(verbose).to_string().to_lowercase();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(target_filter(verbose))
        .with(env_filter)
        .init();
}
