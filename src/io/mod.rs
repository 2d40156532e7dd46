mod random_access;

pub use random_access::{
    decode_uint_be, decode_uint_le, encode_uint_be, encode_uint_le, file_size, RandomAccess,
};
