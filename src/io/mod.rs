mod bytes;

pub use bytes::{
    read_fourcc, read_u16_be, read_u16_le, read_u24_le, read_u32_be, read_u32_le,
    slice_at, split_at_nul, trim_trailing_nuls,
};
