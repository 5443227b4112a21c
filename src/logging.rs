use anyhow::Result;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

const QUIET: &str = "warn";
const VERBOSE: &str = "scicalc=debug";

/// Handle on the installed subscriber's filter, for the `:debug` command.
pub struct LogControl {
    handle: reload::Handle<EnvFilter, Registry>,
    debug: bool,
}

impl LogControl {
    /// Installs the global subscriber. `RUST_LOG` wins unless `debug` is set.
    pub fn init(debug: bool) -> Result<Self> {
        let filter = if debug {
            EnvFilter::new(VERBOSE)
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(QUIET))
        };
        let (filter, handle) = reload::Layer::new(filter);
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()?;
        Ok(LogControl { handle, debug })
    }

    /// Flips between quiet and debug output. Returns the new state.
    pub fn toggle_debug(&mut self) -> Result<bool> {
        self.debug = !self.debug;
        let level = if self.debug { VERBOSE } else { QUIET };
        self.handle.reload(EnvFilter::new(level))?;
        Ok(self.debug)
    }
}
