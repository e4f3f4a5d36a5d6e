use cinebook_core::clock::Clock;
use cinebook_store::app_config::IdScheme;
use std::sync::{Arc, Mutex, PoisonError};

const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Issues `prefix + YYYYMMDDHHMMSS + suffix` identifiers.
///
/// Issuing is serialized. With [`IdScheme::Timestamp`] two ids issued within
/// the same second are identical; [`IdScheme::Sequenced`] never repeats an id
/// within a process. It tags repeats with `-N` and holds on to the highest
/// stamp issued so far when the clock steps back.
pub struct IdGenerator {
    prefix: String,
    suffix: String,
    scheme: IdScheme,
    clock: Arc<dyn Clock>,
    last: Mutex<(String, u32)>,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>, scheme: IdScheme, clock: Arc<dyn Clock>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: String::new(),
            scheme,
            clock,
            last: Mutex::new((String::new(), 0)),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn next(&self) -> String {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now().format(STAMP_FORMAT).to_string();

        match self.scheme {
            IdScheme::Timestamp => {
                *last = (now.clone(), 0);
                format!("{}{}{}", self.prefix, now, self.suffix)
            }
            IdScheme::Sequenced => {
                // Fixed-width stamps order lexically
                if now > last.0 {
                    *last = (now, 0);
                } else {
                    last.1 += 1;
                }
                match last.1 {
                    0 => format!("{}{}{}", self.prefix, last.0, self.suffix),
                    n => format!("{}{}-{}{}", self.prefix, last.0, n, self.suffix),
                }
            }
        }
    }
}
