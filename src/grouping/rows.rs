use crate::models::Photo;

/// Chunk photos into fixed-width grid rows.
///
/// Used for flat grids and within each date group, so a group's rows
/// are always complete before the next header: a header never lands
/// mid-row. A column count of zero is treated as one.
pub fn split_photos_into_rows(photos: &[Photo], columns: usize) -> Vec<Vec<Photo>> {
    photos
        .chunks(columns.max(1))
        .map(<[Photo]>::to_vec)
        .collect()
}
