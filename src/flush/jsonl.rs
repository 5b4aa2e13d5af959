use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::ecs::resources::EventLog;

pub const EVENTS_FILE: &str = "siege_events.jsonl";
pub const EFFECTS_FILE: &str = "siege_effects.jsonl";

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Flush the siege audit trail to JSONL files in `output_dir`.
///
/// Creates the directory if needed and overwrites both files:
/// - `siege_events.jsonl`: one `SiegeRecord` per line
/// - `siege_effects.jsonl`: one `EventEffect` per line
///
/// The log itself is left untouched; call `EventLog::clear` afterwards to
/// start a fresh batch.
pub fn flush_to_jsonl(log: &EventLog, output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;
    write_jsonl(&output_dir.join(EVENTS_FILE), log.records.iter())?;
    write_jsonl(&output_dir.join(EFFECTS_FILE), log.effects.iter())?;
    tracing::debug!(
        records = log.records.len(),
        effects = log.effects.len(),
        "flushed siege log to {}",
        output_dir.display()
    );
    Ok(())
}
