//! env_logger setup, optionally copying every record into a log file.

use env_logger::{Env, Target};
use log::warn;
use std::fs::File;
use std::io::{self, Write};

pub const LOG_FILE: &str = "server_output.log";

/// Writes everything to both inner writers.
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

/// Installs the global logger. Default filter is `info`, overridable with
/// `RUST_LOG`. With `log_file` set, output goes to stderr and to `LOG_FILE`.
pub fn init(log_file: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));

    let file_error = if log_file {
        match File::create(LOG_FILE) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(Tee::new(io::stderr(), file))));
                None
            }
            Err(e) => Some(e),
        }
    } else {
        None
    };

    builder.init();

    if let Some(e) = file_error {
        warn!("Unable to open {}: {}. Logging to stderr only.", LOG_FILE, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_writes_to_both() {
        let mut tee = Tee::new(Vec::new(), Vec::new());
        writeln!(tee, "INFO  Accepted 127.0.0.1:5000").unwrap();
        tee.flush().unwrap();

        let (first, second) = tee.into_inner();
        assert_eq!(first, b"INFO  Accepted 127.0.0.1:5000\n");
        assert_eq!(first, second);
    }

    #[test]
    fn test_tee_stops_on_first_failure() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::ErrorKind::BrokenPipe.into())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut tee = Tee::new(Broken, Vec::new());
        assert!(tee.write(b"line\n").is_err());
        assert!(tee.into_inner().1.is_empty());
    }
}
