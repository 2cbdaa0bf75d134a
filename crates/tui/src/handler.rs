use eyre::EyreHandler;
use itertools::Itertools;
use std::{error::Error, fmt};

/// Reports startup errors as one line of deduplicated causes.
///
/// The debug form lists the causes under "Context:" unless a verbose handler is attached.
#[derive(Default)]
pub struct Handler {
    debug_handler: Option<Box<dyn EyreHandler>>,
}

impl Handler {
    /// Delegates the debug form to `debug_handler`, if any.
    pub fn debug_handler(mut self, debug_handler: Option<Box<dyn EyreHandler>>) -> Self {
        self.debug_handler = debug_handler;
        self
    }
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Display;
        dedup_chain(error).into_iter().format("; ").fmt(f)
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(debug_handler) = &self.debug_handler {
            return debug_handler.debug(error, f);
        }

        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }

        let errors = dedup_chain(error);
        let Some((error, sources)) = errors.split_first() else { return Ok(()) };
        write!(f, "{error}")?;

        if !sources.is_empty() {
            write!(f, "\n\nContext:")?;

            let multiple = sources.len() > 1;
            for (n, error) in sources.iter().enumerate() {
                writeln!(f)?;
                if multiple {
                    write!(f, "- Error #{n}: {error}")?;
                } else {
                    write!(f, "- {error}")?;
                }
            }
        }

        Ok(())
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(debug_handler) = &mut self.debug_handler {
            debug_handler.track_caller(location);
        }
    }
}

/// Returns the messages of `error` and all of its sources.
///
/// A cause whose message is already part of the previous one is dropped, so `msg1: msg2; msg2`
/// becomes `msg1: msg2`.
fn dedup_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut causes: Vec<String> = std::iter::successors(Some(error), |&err| err.source())
        .map(|cause| cause.to_string().trim().to_string())
        .collect();
    causes.dedup_by(|b, a| a.contains(b.as_str()));
    causes
}

/// Sets the process-wide [`eyre`] and [`panic`](mod@std::panic) hooks.
///
/// Errors get the one-line [`Handler`] report; with `WAVEPORTAL_DEBUG` set they get color-eyre's
/// full report instead. Panics always get the full report.
pub fn install() {
    let (panic_hook, debug_hook) = color_eyre::config::HookBuilder::default()
        .panic_section("This is a bug. Consider reporting it with the log file attached.")
        .into_hooks();
    panic_hook.install();
    let debug_hook = debug_hook.into_eyre_hook();
    let debug = std::env::var_os("WAVEPORTAL_DEBUG").is_some();
    if let Err(e) = eyre::set_hook(Box::new(move |e| {
        Box::new(Handler::default().debug_handler(debug.then(|| debug_hook(e))))
    })) {
        debug!("failed to install eyre error hook: {e}");
    }
}
