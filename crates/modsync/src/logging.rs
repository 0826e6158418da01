use tracing_subscriber::EnvFilter;

const CRATES: &[&str] = &["modsync", "modsync_catalog", "modsync_fetch", "modsync_fs", "modsync_sync"];

/// Install the global subscriber. `RUST_LOG` wins over `-v`.
pub fn init(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = CRATES.iter().map(|c| format!("{c}={level}")).collect();
        EnvFilter::new(format!("warn,{}", directives.join(",")))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose > 1)
        .with_writer(std::io::stderr)
        .init();
}
