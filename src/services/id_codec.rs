/*
 * Responsibility
 * - public id <-> store id (encode/decode) for resources
 * - keep the encoding scheme inside this module so extractors and DTOs don't care
 */
use sqids::Sqids;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IdCodecError>;

#[derive(Debug, Error)]
pub enum IdCodecError {
    #[error("SQIDS_MIN_LENGTH must be between 0 and 255, got {value}")]
    InvalidMinLength { value: usize },
    #[error("sqids error: {0}")]
    Sqids(#[from] sqids::Error),
    #[error("id must be positive, got {value}")]
    NonPositiveId { value: i64 },
    #[error("invalid public id format")]
    DecodeInvalidFormat,
    #[error("decoded id is out of range")]
    DecodeOutOfRange,
}

#[derive(Clone, Debug)]
pub struct IdCodec {
    sqids: Sqids,
}

impl IdCodec {
    pub fn new(min_length: usize, alphabet: &str) -> Result<Self> {
        let min_length: u8 = min_length
            .try_into()
            .map_err(|_| IdCodecError::InvalidMinLength { value: min_length })?;

        let sqids = Sqids::builder()
            .min_length(min_length)
            .alphabet(alphabet.chars().collect())
            .build()?;

        Ok(Self { sqids })
    }

    pub fn encode(&self, id: i64) -> Result<String> {
        if id <= 0 {
            return Err(IdCodecError::NonPositiveId { value: id });
        }
        Ok(self.sqids.encode(&[id as u64])?)
    }

    /// Only canonical encodings are accepted: sqids decodes many strings to
    /// the same number, so the result is re-encoded and compared.
    pub fn decode(&self, public_id: &str) -> Result<i64> {
        let nums = self.sqids.decode(public_id);
        let [n] = nums.as_slice() else {
            return Err(IdCodecError::DecodeInvalidFormat);
        };

        let id = i64::try_from(*n).map_err(|_| IdCodecError::DecodeOutOfRange)?;
        if id <= 0 {
            return Err(IdCodecError::DecodeOutOfRange);
        }

        match self.sqids.encode(&[*n]) {
            Ok(canonical) if canonical == public_id => Ok(id),
            _ => Err(IdCodecError::DecodeInvalidFormat),
        }
    }
}
