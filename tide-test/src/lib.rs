//! Shared test setup for the Tide crates.
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::{collections::HashSet, sync::Once};

use color_eyre::section::PanicMessage;
use owo_colors::OwoColorize;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod prelude;
pub mod vectors;

/// Log filter used when `RUST_LOG` is unset.
///
/// Rejected transactions and scripts are logged at `debug` and `trace`, so
/// they stay quiet unless a test run asks for them.
const DEFAULT_FILTER: &str = "warn";

/// Backtrace frames from the test harness and proptest runner, which never
/// point at Tide code.
const HARNESS_FRAMES: &[&str] = &[
    "std::panic",
    "core::ops::function",
    "test::run_test",
    "test::assert_test_result",
    "proptest::",
];

static INIT: Once = Once::new();

/// Install the tracing subscriber and the error report hooks.
///
/// Safe to call from every test: only the first call has an effect.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // Another harness might have installed a subscriber already.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .with(ErrorLayer::default())
            .try_init();

        color_eyre::config::HookBuilder::default()
            .add_frame_filter(Box::new(|frames| {
                let mut seen = HashSet::new();
                frames.retain(|frame| {
                    seen.insert((frame.lineno, frame.filename.clone()))
                        && !frame
                            .name
                            .as_deref()
                            .is_some_and(|name| HARNESS_FRAMES.iter().any(|f| name.starts_with(f)))
                });
            }))
            .panic_message(TestPanicMessage)
            .install()
            .expect("error report hooks are installed once");
    })
}

/// Hides the panic the test harness raises for a test that returned `Err`,
/// since the report has already been printed.
struct TestPanicMessage;

impl PanicMessage for TestPanicMessage {
    fn display(
        &self,
        info: &std::panic::PanicInfo<'_>,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let payload = info
            .payload()
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("<non string panic payload>");

        if payload.contains("the test returned a termination value with a non-zero status code") {
            return write!(f, "---- test returned an error ----");
        }

        writeln!(f, "{} {}", "test panicked:".red(), payload.cyan())?;
        match info.location() {
            Some(location) => write!(
                f,
                "  at {}:{}",
                location.file().purple(),
                location.line().purple()
            ),
            None => write!(f, "  at <unknown>"),
        }
    }
}
