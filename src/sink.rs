//! Destinations for the records emitted by rules.
//!
//! Rules never log on their own: they hand a level, a message template and its parameters to the
//! [`Sink`] given by the host. Placeholders in the template are written `{}` and are replaced by
//! the parameters in order, see [`Template`].

use std::{fmt, sync::Arc};

use tracing::Level;

/// Receives the records emitted by rules.
pub trait Sink: Send + Sync {
    /// Record a message at the given level.
    fn record(&self, level: Level, message: &str, params: &[&dyn fmt::Display]);
}

impl<S> Sink for &S
where
    S: Sink + ?Sized,
{
    fn record(&self, level: Level, message: &str, params: &[&dyn fmt::Display]) {
        (**self).record(level, message, params)
    }
}

impl<S> Sink for Box<S>
where
    S: Sink + ?Sized,
{
    fn record(&self, level: Level, message: &str, params: &[&dyn fmt::Display]) {
        (**self).record(level, message, params)
    }
}

impl<S> Sink for Arc<S>
where
    S: Sink + ?Sized,
{
    fn record(&self, level: Level, message: &str, params: &[&dyn fmt::Display]) {
        (**self).record(level, message, params)
    }
}

/// [`Sink`] emitting every record as a [`tracing`] event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn record(&self, level: Level, message: &str, params: &[&dyn fmt::Display]) {
        let message = Template::new(message, params);

        macro_rules! emit {
            ($level:expr) => {
                tracing::event!(target: "tower_header_inject", $level, "{}", message)
            };
        }

        match level {
            Level::ERROR => emit!(Level::ERROR),
            Level::WARN => emit!(Level::WARN),
            Level::INFO => emit!(Level::INFO),
            Level::DEBUG => emit!(Level::DEBUG),
            Level::TRACE => emit!(Level::TRACE),
        }
    }
}

/// [`Sink`] discarding every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl Sink for NoopSink {
    fn record(&self, _level: Level, _message: &str, _params: &[&dyn fmt::Display]) {}
}

/// A message template with its parameters, rendered lazily.
///
/// Each `{}` takes the next parameter. Placeholders left without a parameter are written as is,
/// parameters left without a placeholder are dropped.
pub struct Template<'a> {
    message: &'a str,
    params: &'a [&'a dyn fmt::Display],
}

impl<'a> Template<'a> {
    pub fn new(message: &'a str, params: &'a [&'a dyn fmt::Display]) -> Self {
        Self { message, params }
    }
}

impl fmt::Display for Template<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params = self.params.iter();
        let mut pieces = self.message.split("{}");

        if let Some(head) = pieces.next() {
            f.write_str(head)?;
        }
        for piece in pieces {
            match params.next() {
                Some(param) => fmt::Display::fmt(param, f)?,
                None => f.write_str("{}")?,
            }
            f.write_str(piece)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Template<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("message", &self.message)
            .field("params", &self.params.len())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn template_fills_placeholders_in_order() {
        let url = "http://tunnel.local/api/v1/proxy/forward-to";

        assert_eq!(
            Template::new("{} header to: {}", &[&"bypass-tunnel-reminder", &url]).to_string(),
            "bypass-tunnel-reminder header to: http://tunnel.local/api/v1/proxy/forward-to"
        );
    }

    #[test]
    fn template_with_missing_or_surplus_params() {
        assert_eq!(Template::new("{} and {}", &[&1]).to_string(), "1 and {}");
        assert_eq!(Template::new("no placeholder", &[&1, &2]).to_string(), "no placeholder");
        assert_eq!(Template::new("", &[]).to_string(), "");
    }

    #[test]
    fn tracing_sink_emits_rendered_message() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.record(Level::INFO, "Added header to: {}", &[&"/forward-to"]);
            TracingSink.record(Level::DEBUG, "filtered out: {}", &[&"/health"]);
        });

        let output = captured.contents();
        assert!(output.contains("INFO"));
        assert!(output.contains("tower_header_inject"));
        assert!(output.contains("Added header to: /forward-to"));
        assert!(!output.contains("filtered out"));
    }

    #[test]
    fn shared_sinks_forward_records() {
        let sink = Arc::new(testing::RecordingSink::default());
        let boxed: Box<dyn Sink> = Box::new(sink.clone());
        boxed.record(Level::WARN, "value {}", &[&42]);
        sink.record(Level::INFO, "plain", &[]);

        assert_eq!(
            sink.records(),
            vec![
                (Level::WARN, "value 42".to_owned()),
                (Level::INFO, "plain".to_owned()),
            ]
        );
    }
}
