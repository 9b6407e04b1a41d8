use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global tracing subscriber. Later calls are ignored.
///
/// `RUST_LOG` overrides the default `info` filter. On Android output goes to
/// logcat under the `otobus` tag, elsewhere to stderr.
#[uniffi::export]
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    #[cfg(target_os = "android")]
    {
        use tracing_logcat::{LogcatMakeWriter, LogcatTag};

        let writer = match LogcatMakeWriter::new(LogcatTag::Fixed("otobus".to_owned())) {
            Ok(writer) => writer,
            Err(error) => {
                eprintln!("failed to open logcat writer: {error}");
                return;
            }
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .without_time()
            .try_init();
    }

    #[cfg(not(target_os = "android"))]
    {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
