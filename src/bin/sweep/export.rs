// CSV Export - raw event timeline and per-scenario sweep tables
// Plain comma-separated rows with a header line, no quoting needed

use queue_arena::EventTimeline;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::report::ScenarioReport;

/// Write the sorted timeline as `EVENT,TIME,PACKET LENGTH` rows.
///
/// Observers have an empty length cell.
pub fn write_events_csv(path: &Path, timeline: &EventTimeline) -> std::io::Result<()> {
    let mut out = create(path)?;
    write_events(&mut out, timeline)?;
    out.flush()
}

fn write_events<W: Write>(out: &mut W, timeline: &EventTimeline) -> std::io::Result<()> {
    writeln!(out, "EVENT,TIME,PACKET LENGTH")?;
    for row in timeline.rows() {
        match row.packet_length {
            Some(length) => writeln!(out, "{},{},{}", row.kind.as_str(), row.time, length)?,
            None => writeln!(out, "{},{},", row.kind.as_str(), row.time)?,
        }
    }
    Ok(())
}

/// Write one row per load point with the replication means.
pub fn write_scenario_csv(path: &Path, report: &ScenarioReport) -> std::io::Result<()> {
    let mut out = create(path)?;
    write_scenario(&mut out, report)?;
    out.flush()
}

fn write_scenario<W: Write>(out: &mut W, report: &ScenarioReport) -> std::io::Result<()> {
    writeln!(
        out,
        "k,rho,arrivals,departures,observations,meanOccupancy,idleProbability,lossProbability"
    )?;
    let k = report.capacity.to_string();
    for p in report.points.iter().filter(|p| p.has_results()) {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            k,
            p.rho,
            p.arrivals.mean,
            p.departures.mean,
            p.observations.mean,
            p.mean_occupancy.mean,
            p.idle_probability.mean,
            p.loss_probability.mean,
        )?;
    }
    Ok(())
}

fn create(path: &Path) -> std::io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}
