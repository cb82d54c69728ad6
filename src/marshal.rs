use crate::{ChannelLayout, Error, PixelGrid, PixelRecord};

/// Reshapes a flat record into a `[height][width][channels]` grid.
///
/// This is a pure reshape: no interpolation or color conversion happens.
pub fn unmarshal(record: &PixelRecord) -> Result<PixelGrid, Error> {
    let width = record.width() as usize;
    let height = record.height() as usize;
    let channels = record.channel_count();
    let samples = record.samples();

    // Upheld by PixelRecord::new; checked again before slicing.
    let expected = record.layout().sample_count(width, height).ok_or_else(|| {
        Error::MalformedRecord(format!(
            "{width}x{height}x{channels} overflows the sample count"
        ))
    })?;
    if width == 0 || height == 0 || samples.len() != expected {
        return Err(Error::MalformedRecord(format!(
            "expected {expected} samples for {width}x{height}x{channels}, got {}",
            samples.len()
        )));
    }

    let rows = samples
        .chunks_exact(width * channels)
        .map(|row| {
            row.chunks_exact(channels)
                .map(<[i32]>::to_vec)
                .collect::<Vec<_>>()
        })
        .collect();

    Ok(PixelGrid::new(rows))
}

/// Flattens a grid into a record, row-major, exactly inverse to [`unmarshal`].
///
/// Every row must have the same width and every cell the same channel count
/// (1, 3 or 4); anything else is [`Error::MalformedGrid`].
pub fn marshal(grid: &PixelGrid) -> Result<PixelRecord, Error> {
    let height = grid.height();
    let width = grid.width();
    let channels = grid.channel_count();

    check_dimensions(width, height)?;
    let layout = ChannelLayout::from_channel_count(channels).ok_or_else(|| {
        Error::MalformedGrid(format!("unsupported channel count {channels}"))
    })?;

    let mut samples = Vec::with_capacity(grid_sample_count(width, height, layout)?);
    for (y, row) in grid.rows.iter().enumerate() {
        if row.len() != width {
            return Err(Error::MalformedGrid(format!(
                "row {y} has {} columns, expected {width}",
                row.len()
            )));
        }
        for (x, cell) in row.iter().enumerate() {
            if cell.len() != channels {
                return Err(Error::MalformedGrid(format!(
                    "pixel ({y}, {x}) has {} channels, expected {channels}",
                    cell.len()
                )));
            }
            samples.extend_from_slice(cell);
        }
    }

    PixelRecord::new(width as u32, height as u32, layout, samples)
        .map_err(|e| Error::MalformedGrid(e.to_string()))
}

/// Flattens a 2-dimensional grayscale grid (no channel axis).
pub fn marshal_gray(rows: &[Vec<i32>]) -> Result<PixelRecord, Error> {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    check_dimensions(width, height)?;

    let mut samples = Vec::with_capacity(grid_sample_count(width, height, ChannelLayout::Gray)?);
    for (y, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(Error::MalformedGrid(format!(
                "row {y} has {} columns, expected {width}",
                row.len()
            )));
        }
        samples.extend_from_slice(row);
    }

    PixelRecord::new(width as u32, height as u32, ChannelLayout::Gray, samples)
        .map_err(|e| Error::MalformedGrid(e.to_string()))
}

fn check_dimensions(width: usize, height: usize) -> Result<(), Error> {
    if width == 0 || height == 0 {
        return Err(Error::MalformedGrid(format!(
            "grid must be non-empty, got {width}x{height}"
        )));
    }
    if u32::try_from(width).is_err() || u32::try_from(height).is_err() {
        return Err(Error::MalformedGrid(format!(
            "grid dimensions {width}x{height} exceed the native range"
        )));
    }
    Ok(())
}

fn grid_sample_count(width: usize, height: usize, layout: ChannelLayout) -> Result<usize, Error> {
    layout.sample_count(width, height).ok_or_else(|| {
        Error::MalformedGrid(format!(
            "{width}x{height}x{} overflows the sample count",
            layout.channel_count()
        ))
    })
}
