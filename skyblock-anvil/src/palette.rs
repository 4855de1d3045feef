//! Compact long-array packing for paletted section storage.
//!
//! Indices are packed little-end first inside each `i64`; an entry never
//! spans two longs, so trailing bits of a long may stay unused.

/// Bits used per palette index. Minecraft never goes below 4.
pub fn bits_per_entry(palette_len: usize) -> usize {
    let needed = (usize::BITS - palette_len.saturating_sub(1).leading_zeros()) as usize;
    needed.max(4)
}

/// Pack palette indices into the long array stored under `data`.
pub fn pack(indices: &[usize], palette_len: usize) -> Vec<i64> {
    let bits = bits_per_entry(palette_len);
    let per_long = 64 / bits;
    let mask = (1u64 << bits) - 1;

    let mut longs = vec![0i64; indices.len().div_ceil(per_long)];
    for (i, &idx) in indices.iter().enumerate() {
        let shift = (i % per_long) * bits;
        // Treat i64 as u64 for bitwise ops, then cast back
        let current = longs[i / per_long] as u64;
        longs[i / per_long] = (current | (((idx as u64) & mask) << shift)) as i64;
    }
    longs
}

/// Unpack `count` palette indices. Missing longs decode as index 0.
pub fn unpack(data: &[i64], palette_len: usize, count: usize) -> Vec<usize> {
    let bits = bits_per_entry(palette_len);
    let per_long = 64 / bits;
    let mask = (1u64 << bits) - 1;

    (0..count)
        .map(|i| {
            let long = data.get(i / per_long).copied().unwrap_or(0) as u64;
            ((long >> ((i % per_long) * bits)) & mask) as usize
        })
        .collect()
}
