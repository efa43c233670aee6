pub mod bits;
pub mod chunked;
pub mod codebook;
pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod tree;

pub use bits::EncodedBits;
pub use chunked::{decode_chunked, encode_chunked};
pub use codebook::CodeBook;
pub use codec::{CodingStats, HuffmanCodec};
pub use decoder::decode;
pub use encoder::encode;
pub use error::{CodingError, ErrorKind};
pub use frequency::FrequencyTable;
pub use tree::{HuffmanNode, HuffmanTree, NodeId};
