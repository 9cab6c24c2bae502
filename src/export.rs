use std::fs::File;
use std::io::{self, BufWriter, Write};

use anchor_grid::{AnchorFloat, AnchorMap};
use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Serialize;

use crate::config::Format;

#[derive(Serialize)]
struct TensorRecord<'a, F> {
    shape: [usize; 3],
    data: &'a [F],
}

/// Writes one `size ratio row col xmin ymin xmax ymax` line per anchor.
pub fn write_csv<F, W>(anchors: &AnchorMap<F>, writer: W) -> Result<()>
where
    F: AnchorFloat + Serialize,
    W: Write,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .from_writer(writer);
    for anchor in anchors.anchors() {
        writer.serialize(anchor)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the full tensor as `{"shape": [C, H, W], "data": [...]}`.
pub fn write_json<F, W>(anchors: &AnchorMap<F>, writer: W) -> Result<()>
where
    F: AnchorFloat + Serialize,
    W: Write,
{
    let record = TensorRecord {
        shape: anchors.shape(),
        data: anchors.as_slice(),
    };
    serde_json::to_writer(writer, &record)?;
    Ok(())
}

#[tracing::instrument(name = "Exporting anchors", skip(anchors))]
pub fn export<F>(anchors: &AnchorMap<F>, format: Format, output: Option<&Utf8Path>) -> Result<()>
where
    F: AnchorFloat + Serialize,
{
    let mut writer: BufWriter<Box<dyn Write>> = match output {
        Some(path) => BufWriter::new(Box::new(
            File::create(path).with_context(|| format!("Unable to create {path}"))?,
        )),
        None => BufWriter::new(Box::new(io::stdout().lock())),
    };
    match format {
        Format::Csv => write_csv(anchors, &mut writer)?,
        Format::Json => write_json(anchors, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}
