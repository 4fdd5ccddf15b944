//! JSON lines record output
//!
//! Writes each record as one JSON object per line. Stands in for a metrics
//! pipeline when the binary runs on its own.

use std::io::Write;

use tracing::warn;

use crate::collector::{OutputRecord, Sink};

/// Sink writing one JSON document per record
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for JsonLinesSink<W> {
    fn add_record(&mut self, record: OutputRecord) {
        let result = serde_json::to_writer(&mut self.writer, &record)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush());

        if let Err(e) = result {
            warn!(error = %e, measurement = %record.measurement, "Failed to write record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{FieldValue, AGENT_URL_TAG, RESPONSE_MEASUREMENT};
    use std::collections::BTreeMap;

    #[test]
    fn test_writes_one_line_per_record() {
        let mut sink = JsonLinesSink::new(Vec::new());
        let record = OutputRecord {
            measurement: RESPONSE_MEASUREMENT.to_string(),
            fields: BTreeMap::from([("x".to_string(), FieldValue::Integer(1))]),
            tags: BTreeMap::from([(AGENT_URL_TAG.to_string(), "http://a/jolokia".to_string())]),
            timestamp: 1000,
        };

        sink.add_record(record.clone());
        sink.add_record(record);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"measurement":"response","fields":{"x":1},"tags":{"jolokia_agent_url":"http://a/jolokia"},"timestamp":1000}"#
        );
    }
}
