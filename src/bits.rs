#[cfg(test)]
mod test;

// Bit i of a bitboard is square (row = i / 8, column = i % 8), A1 = bit 0.

pub fn popcnt(x: u64) -> u32 {
    x.count_ones()
}

// swap rows: 1 <-> 8, 2 <-> 7, ...
pub fn flip_vertical(x: u64) -> u64 {
    x.swap_bytes()
}

// swap columns: A <-> H, B <-> G, ...
pub fn flip_horizontal(mut x: u64) -> u64 {
    x = ((x >> 4) & 0x0F0F_0F0F_0F0F_0F0F) | ((x << 4) & 0xF0F0_F0F0_F0F0_F0F0);
    x = ((x >> 2) & 0x3333_3333_3333_3333) | ((x << 2) & 0xCCCC_CCCC_CCCC_CCCC);
    x = ((x >> 1) & 0x5555_5555_5555_5555) | ((x << 1) & 0xAAAA_AAAA_AAAA_AAAA);
    x
}

// exchange the bits selected by `mask` with the bits `delta` positions below them
fn delta_swap(x: u64, mask: u64, delta: u32) -> u64 {
    let t = (x ^ (x >> delta)) & mask;
    x ^ t ^ (t << delta)
}

// transpose along the A1-H8 diagonal
pub fn flip_diag(mut x: u64) -> u64 {
    x = delta_swap(x, 0x0000_0000_F0F0_F0F0, 28);
    x = delta_swap(x, 0x0000_CCCC_0000_CCCC, 14);
    x = delta_swap(x, 0x00AA_00AA_00AA_00AA, 7);
    x
}

pub fn rot90(x: u64) -> u64 {
    flip_vertical(flip_diag(x))
}
