//! Unicode sparkline rendering for dimension/report tables (§4.6).

/// 9 Unicode block characters, index 0 = space (lowest) to index 8 = full block.
const SPARK_BLOCKS: [char; 9] = [' ', '\u{2581}', '\u{2582}', '\u{2583}', '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}', '\u{2588}'];

/// Mid-height block, used for a single value or a constant series.
const MID_BLOCK: char = SPARK_BLOCKS[4];

/// Render `values` as a compact Unicode block sparkline, compressed to at
/// most `width` characters by bucket-averaging.
///
/// - Empty input renders to an empty string.
/// - A single value renders as one mid-height block.
/// - A constant series (all buckets equal) renders as a flat mid-height line.
#[must_use]
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() {
        return String::new();
    }
    if values.len() == 1 {
        return MID_BLOCK.to_string();
    }

    let compressed = if values.len() > width && width > 0 {
        compress(values, width)
    } else {
        values.to_vec()
    };

    let min = compressed.iter().copied().fold(f64::INFINITY, f64::min);
    let max = compressed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range == 0.0 {
        return MID_BLOCK.to_string().repeat(compressed.len());
    }

    compressed
        .iter()
        .map(|&v| {
            let idx = ((v - min) / range * 8.0) as i64;
            SPARK_BLOCKS[idx.clamp(0, 8) as usize]
        })
        .collect()
}

/// Bucket-average `values` down to exactly `width` buckets. Bucket
/// boundaries are computed the same way the original does: `bucket_size =
/// len / width` (float), each bucket spanning `[i*bucket_size,
/// (i+1)*bucket_size)` truncated to integer indices — so buckets are not
/// perfectly even when `len` doesn't divide `width`.
fn compress(values: &[f64], width: usize) -> Vec<f64> {
    let len = values.len();
    let bucket_size = len as f64 / width as f64;
    (0..width)
        .map(|i| {
            let start = (i as f64 * bucket_size) as usize;
            let end = (((i + 1) as f64) * bucket_size) as usize;
            let end = end.max(start + 1).min(len);
            let bucket = &values[start..end];
            bucket.iter().sum::<f64>() / bucket.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_string() {
        assert_eq!(sparkline(&[], 30), "");
    }

    #[test]
    fn single_value_is_mid_block() {
        assert_eq!(sparkline(&[42.0], 30), MID_BLOCK.to_string());
    }

    #[test]
    fn constant_series_is_flat_mid_line() {
        let values = vec![5.0; 10];
        assert_eq!(sparkline(&values, 30), MID_BLOCK.to_string().repeat(10));
    }

    #[test]
    fn monotonic_series_spans_full_block_range() {
        let values: Vec<f64> = (0..9).map(f64::from).collect();
        let line = sparkline(&values, 30);
        let chars: Vec<char> = line.chars().collect();
        assert_eq!(chars.first(), Some(&SPARK_BLOCKS[0]));
        assert_eq!(chars.last(), Some(&SPARK_BLOCKS[8]));
    }

    #[test]
    fn long_series_compresses_to_width() {
        let values: Vec<f64> = (0..120).map(f64::from).collect();
        let line = sparkline(&values, 30);
        assert_eq!(line.chars().count(), 30);
    }

    #[test]
    fn short_series_is_not_padded_to_width() {
        let values = vec![1.0, 2.0, 3.0];
        let line = sparkline(&values, 30);
        assert_eq!(line.chars().count(), 3);
    }
}
