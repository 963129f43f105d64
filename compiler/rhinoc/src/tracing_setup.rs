use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Filter directives, e.g. `RHINO_LOG=rhino_sema=debug`.
const LOG_ENV: &str = "RHINO_LOG";

/// When set, spans are printed as an indented tree instead of flat lines.
const TREE_ENV: &str = "RHINO_LOG_TREE";

/// Initialize tracing for debug output.
///
/// Does nothing unless `RHINO_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(directives) = std::env::var(LOG_ENV) else {
            return;
        };
        let registry = tracing_subscriber::registry().with(EnvFilter::new(directives));
        let installed = if std::env::var_os(TREE_ENV).is_some() {
            registry
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_level(true))
                .try_init()
        };
        if let Err(err) = installed {
            eprintln!("rhinoc: tracing already initialised: {err}");
        }
    });
}
