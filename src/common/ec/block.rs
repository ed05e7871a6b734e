use std::ops::Deref;

use super::galois::ecc;
use crate::common::error::QRResult;
use crate::common::metadata::{ECLevel, Version};

// Block partition
//------------------------------------------------------------------------------

// Splits data codewords into group 1 blocks followed by the one codeword longer
// group 2 blocks
pub fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
    let (block1_size, block1_count, block2_size, block2_count) =
        version.data_codewords_per_block(ec_level);

    let total_blocks = block1_count + block2_count;
    let total_block1_size = block1_size * block1_count;
    let total_size = total_block1_size + block2_size * block2_count;

    debug_assert!(
        total_size == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
        data.len(),
        total_size
    );

    let mut data_blocks = Vec::with_capacity(total_blocks);
    data_blocks.extend(data[..total_block1_size].chunks(block1_size));
    if block2_size > 0 {
        data_blocks.extend(data[total_block1_size..].chunks(block2_size));
    }
    data_blocks
}

// ECC: Error Correction Codeword generator
pub fn compute_ecc(
    data: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> QRResult<(Vec<&[u8]>, Vec<Vec<u8>>)> {
    let data_blocks = blockify(data, version, ec_level);

    let ecc_size_per_block = version.ecc_per_block(ec_level);
    let ecc_blocks =
        data_blocks.iter().map(|b| ecc(b, ecc_size_per_block)).collect::<QRResult<Vec<_>>>()?;

    Ok((data_blocks, ecc_blocks))
}

// Round robin over blocks, shorter blocks drop out once exhausted
pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}
