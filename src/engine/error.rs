use std::fmt;

/// Broad failure classes callers can match on without caring about detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Lookup,
    MalformedInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodingError {
    EmptyInput,
    ZeroFrequency { symbol: String },
    InvalidChunkSize,
    WeightOverflow,
    UnknownSymbol { position: usize, symbol: String },
    TruncatedCode { decoded: usize, dangling_bits: usize },
    UnexpectedBit { position: usize },
    InvalidBitChar { position: usize, found: char },
    BitLengthOverflow { bit_len: usize, available: usize },
}

impl CodingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodingError::EmptyInput
            | CodingError::ZeroFrequency { .. }
            | CodingError::InvalidChunkSize
            | CodingError::WeightOverflow => ErrorKind::InvalidInput,
            CodingError::UnknownSymbol { .. } => ErrorKind::Lookup,
            CodingError::TruncatedCode { .. }
            | CodingError::UnexpectedBit { .. }
            | CodingError::InvalidBitChar { .. }
            | CodingError::BitLengthOverflow { .. } => ErrorKind::MalformedInput,
        }
    }
}

impl fmt::Display for CodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodingError::EmptyInput =>
                write!(f, "cannot build a code from an empty symbol sequence"),
            CodingError::ZeroFrequency { symbol } =>
                write!(f, "symbol {} has a zero frequency", symbol),
            CodingError::InvalidChunkSize =>
                write!(f, "chunk size must be at least one symbol"),
            CodingError::WeightOverflow =>
                write!(f, "symbol counts sum past the largest representable weight"),
            CodingError::UnknownSymbol { position, symbol } =>
                write!(f, "symbol {} at position {} is not in the codebook", symbol, position),
            CodingError::TruncatedCode { decoded, dangling_bits } => write!(
                f,
                "bitstream ends inside a codeword after {} symbols ({} dangling bits)",
                decoded, dangling_bits
            ),
            CodingError::UnexpectedBit { position } =>
                write!(f, "bit {} does not follow any codeword path", position),
            CodingError::InvalidBitChar { position, found } =>
                write!(f, "invalid bit character {:?} at position {}", found, position),
            CodingError::BitLengthOverflow { bit_len, available } =>
                write!(f, "bit length {} exceeds the {} bits available", bit_len, available),
        }
    }
}

impl std::error::Error for CodingError {}
