//! Interactive prompt sequence
//!
//! Reads the six calculator inputs one line at a time. Generic over the
//! reader and writer so the flow can be driven from memory in tests.

use std::io::{BufRead, Write};

use crate::error::{QueueError, QueueResult};
use crate::types::{validate_positive, validate_servers, QueueInputs, RateInput, TimeUnit, ValueKind};

/// Line-oriented prompter over any reader/writer pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write `label: ` and read one trimmed line
    fn ask(&mut self, label: &str, field: &str) -> QueueResult<String> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(QueueError::invalid_input(field, "no input provided"));
        }
        Ok(line.trim().to_string())
    }

    pub fn read_kind(&mut self, role: &str) -> QueueResult<ValueKind> {
        let field = format!("{} type", role);
        let label = format!("Enter 'r' for rate or 'm' for mean ({})", role);
        let raw = self.ask(&label, &field)?;
        raw.parse().map_err(|e: String| QueueError::invalid_input(field, e))
    }

    pub fn read_value(&mut self, role: &str) -> QueueResult<f64> {
        let field = format!("{} value", role);
        let raw = self.ask(&format!("Enter {} value", role), &field)?;
        let value: f64 = raw.parse().map_err(|_| {
            QueueError::invalid_input(field.as_str(), format!("expected a number, got '{}'", raw))
        })?;
        validate_positive(&field, value)?;
        Ok(value)
    }

    pub fn read_unit(&mut self) -> QueueResult<TimeUnit> {
        let raw = self.ask("Enter time unit (hour/min/sec)", "time unit")?;
        Ok(TimeUnit::parse_lenient(&raw))
    }

    pub fn read_servers(&mut self) -> QueueResult<u32> {
        let raw = self.ask("Enter number of servers (s)", "servers")?;
        let servers: u32 = raw.parse().map_err(|_| {
            QueueError::invalid_input("servers", format!("expected a positive integer, got '{}'", raw))
        })?;
        validate_servers(servers)?;
        Ok(servers)
    }

    /// Run the full prompt sequence, stopping at the first bad answer
    pub fn read_inputs(&mut self) -> QueueResult<QueueInputs> {
        let arrival_kind = self.read_kind("arrival")?;
        let arrival = self.read_value("arrival")?;
        let service_kind = self.read_kind("service")?;
        let service = self.read_value("service")?;
        let time_unit = self.read_unit()?;
        let servers = self.read_servers()?;

        Ok(QueueInputs::new(
            RateInput { kind: arrival_kind, value: arrival },
            RateInput { kind: service_kind, value: service },
            time_unit,
            servers,
        ))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
