//! CSV export of rankings: a `Node,Score` header, then one row per node.

use std::fmt::Display;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::Result;

/// Write `ranking` as CSV. Rows keep the order given (heaviest first from [`crate::ranking`]).
///
/// Scores use the shortest representation that round-trips to the same `f64`.
pub fn write_csv<W: Write, N: Display>(writer: W, ranking: &[(&N, f64)]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Node", "Score"])?;
    for (node, score) in ranking {
        wtr.write_record([node.to_string(), score.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_csv<N: Display>(path: impl AsRef<Path>, ranking: &[(&N, f64)]) -> Result<()> {
    write_csv(File::create(path)?, ranking)
}
