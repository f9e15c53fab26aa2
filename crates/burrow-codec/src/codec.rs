use crate::error::Error;
use crate::hashids::HashidsLayout;
use crate::shortcode::ShortCode;
use harsh::{Harsh, HarshBuilder};
use typed_builder::TypedBuilder;

pub const DEFAULT_MIN_LENGTH: usize = 7;
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Largest value a single encoded part may carry. Hashids implementations
/// built on signed integers cannot go past it, so larger IDs are split.
const MAX_PART: u64 = i64::MAX as u64;

#[derive(Debug, Clone, TypedBuilder)]
pub struct CodecSettings {
    #[builder(default, setter(into))]
    pub salt: String,
    #[builder(default = DEFAULT_MIN_LENGTH)]
    pub min_length: usize,
    #[builder(default = DEFAULT_ALPHABET.to_string(), setter(into))]
    pub alphabet: String,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Salted, reversible mapping between `u64` IDs and [`ShortCode`]s.
///
/// `encode` is total over `u64` and `decode(encode(id)) == id` for every
/// `id`. `decode` only accepts the exact string `encode` would produce.
pub struct CodeCodec {
    harsh: Harsh,
    layout: HashidsLayout,
    alphabet: Vec<u8>,
    min_length: usize,
    max_length: usize,
}

impl std::fmt::Debug for CodeCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeCodec")
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

impl CodeCodec {
    pub fn new(settings: CodecSettings) -> Result<Self, Error> {
        let harsh = HarshBuilder::new()
            .salt(settings.salt.as_bytes())
            .alphabet(settings.alphabet.as_bytes())
            .length(settings.min_length)
            .build()
            .map_err(|e| Error::Build(e.to_string()))?;

        let layout = HashidsLayout::new(settings.alphabet.as_bytes(), settings.salt.as_bytes());

        let mut codec = Self {
            harsh,
            layout,
            alphabet: settings.alphabet.into_bytes(),
            min_length: settings.min_length,
            max_length: 0,
        };
        // u64::MAX takes three parts, so no other id encodes longer
        codec.max_length = codec.encode(u64::MAX).as_str().len().max(codec.min_length);

        Ok(codec)
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Length of the longest code this codec can produce.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn encode(&self, id: u64) -> ShortCode {
        let (parts, len) = split(id);
        ShortCode::new_unchecked(self.harsh.encode(&parts[..len]))
    }

    pub fn decode(&self, code: &str) -> Result<u64, Error> {
        if code.len() < self.min_length {
            return Err(Error::invalid(code, "shorter than minimum length"));
        }
        if code.len() > self.max_length {
            return Err(Error::invalid(code, "longer than any issued code"));
        }
        if !code.bytes().all(|b| self.alphabet.contains(&b)) {
            return Err(Error::invalid(code, "contains characters outside the alphabet"));
        }

        let parts = self
            .layout
            .decode(code.as_bytes())
            .ok_or_else(|| Error::invalid(code, "malformed hashid"))?;
        let id = join(&parts).ok_or_else(|| Error::invalid(code, "not a canonical id encoding"))?;

        // foreign salts and non-canonical spellings decode to *something*;
        // only the exact re-encoding counts
        if self.encode(id).as_str() != code {
            return Err(Error::invalid(code, "not produced by this codec"));
        }

        Ok(id)
    }
}

/// Splits `id` into parts that each fit into `i64` and sum back to `id`.
fn split(id: u64) -> ([u64; 3], usize) {
    match id {
        u64::MAX => ([MAX_PART, MAX_PART, 1], 3),
        id if id > MAX_PART => ([MAX_PART, id - MAX_PART, 0], 2),
        id => ([id, 0, 0], 1),
    }
}

/// Inverse of [`split`]. Returns `None` unless `parts` is exactly what
/// `split` would produce for their sum.
fn join(parts: &[u64]) -> Option<u64> {
    if parts.is_empty() || parts.len() > 3 || parts.iter().any(|&p| p > MAX_PART) {
        return None;
    }

    let id = parts.iter().try_fold(0u64, |acc, &p| acc.checked_add(p))?;
    let (canonical, len) = split(id);

    (canonical[..len] == *parts).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn codec() -> CodeCodec {
        CodeCodec::new(CodecSettings::default()).unwrap()
    }

    fn salted(salt: &str) -> CodeCodec {
        CodeCodec::new(CodecSettings::builder().salt(salt).build()).unwrap()
    }

    #[test]
    fn split_edge_cases() {
        assert_eq!(split(0), ([0, 0, 0], 1));
        assert_eq!(split(1), ([1, 0, 0], 1));
        assert_eq!(split(MAX_PART), ([MAX_PART, 0, 0], 1));
        assert_eq!(split(MAX_PART + 1), ([MAX_PART, 1, 0], 2));
        assert_eq!(split(u64::MAX - 1), ([MAX_PART, MAX_PART, 0], 2));
        assert_eq!(split(u64::MAX), ([MAX_PART, MAX_PART, 1], 3));
    }

    #[test]
    fn join_rejects_non_canonical_parts() {
        assert_eq!(join(&[]), None);
        assert_eq!(join(&[5, 3]), None);
        assert_eq!(join(&[MAX_PART + 1]), None);
        assert_eq!(join(&[MAX_PART, MAX_PART, 2]), None);
        assert_eq!(join(&[1, 1, 1, 1]), None);
        assert_eq!(join(&[MAX_PART, MAX_PART, 1]), Some(u64::MAX));
    }

    #[test]
    fn codes_have_minimum_length() {
        let codec = codec();
        for id in [0, 1, 42, 1_000_000] {
            assert!(codec.encode(id).as_str().len() >= DEFAULT_MIN_LENGTH);
        }
    }

    #[test]
    fn boundary_ids_round_trip() {
        let codec = codec();
        for id in [0, 1, MAX_PART - 1, MAX_PART, MAX_PART + 1, u64::MAX - 1, u64::MAX] {
            let code = codec.encode(id);
            assert_eq!(codec.decode(code.as_str()), Ok(id), "id {id} via {code}");
        }
    }

    #[test]
    fn distinct_ids_give_distinct_codes() {
        let codec = codec();
        assert_ne!(codec.encode(99), codec.encode(100));
        assert_ne!(codec.encode(MAX_PART), codec.encode(MAX_PART + 1));
        assert_ne!(codec.encode(u64::MAX - 1), codec.encode(u64::MAX));
    }

    #[test]
    fn foreign_salt_is_rejected() {
        let ours = codec();
        let theirs = salted("some other salt");

        let code = theirs.encode(0);
        assert_eq!(code.as_str().len(), DEFAULT_MIN_LENGTH);
        assert!(matches!(
            ours.decode(code.as_str()),
            Err(Error::InvalidCode { .. })
        ));
    }

    #[test]
    fn malformed_input_is_rejected() {
        let codec = codec();
        let too_long = "a".repeat(codec.max_length() + 1);
        for input in ["", "abc", "abc-def", "!!!!!!!", "ééééééé", too_long.as_str()] {
            assert!(
                matches!(codec.decode(input), Err(Error::InvalidCode { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn corrupted_code_only_decodes_to_its_own_spelling() {
        let codec = codec();
        let mut corrupted = codec.encode(12345).into_string().into_bytes();
        corrupted[0] = if corrupted[0] == b'a' { b'b' } else { b'a' };
        let corrupted = String::from_utf8(corrupted).unwrap();

        match codec.decode(&corrupted) {
            Ok(id) => assert_eq!(codec.encode(id).as_str(), corrupted),
            Err(e) => assert!(matches!(e, Error::InvalidCode { .. })),
        }
    }

    #[test]
    fn digit_overflow_is_rejected() {
        let codec = codec();
        assert!(matches!(
            codec.decode("H9JJDAjg00gJ0H"),
            Err(Error::InvalidCode { .. })
        ));
        assert!(matches!(
            codec.decode(&"9".repeat(codec.max_length())),
            Err(Error::InvalidCode { .. })
        ));
    }

    #[test]
    fn default_max_length_is_code_for_largest_id() {
        let codec = codec();
        assert_eq!(codec.max_length(), codec.encode(u64::MAX).as_str().len());
        assert!(codec.max_length() > DEFAULT_MIN_LENGTH);
    }

    #[test]
    fn long_min_length_still_round_trips() {
        let codec = CodeCodec::new(CodecSettings::builder().min_length(100).build()).unwrap();
        assert_eq!(codec.max_length(), 100);

        for id in [0, 5, MAX_PART + 1, u64::MAX] {
            let code = codec.encode(id);
            assert_eq!(code.as_str().len(), 100);
            assert_eq!(codec.decode(code.as_str()), Ok(id));
        }
        assert!(codec.decode(&"a".repeat(101)).is_err());
    }

    #[test]
    fn build_fails_for_short_alphabet() {
        let settings = CodecSettings::builder().alphabet("abc").build();
        assert!(matches!(CodeCodec::new(settings), Err(Error::Build(_))));
    }

    proptest! {
        #[test]
        fn round_trip_full_domain(id in any::<u64>()) {
            let codec = codec();
            let code = codec.encode(id);
            prop_assert!(code.as_str().len() >= DEFAULT_MIN_LENGTH);
            prop_assert_eq!(codec.decode(code.as_str()), Ok(id));
        }

        #[test]
        fn round_trip_above_signed_range(id in (MAX_PART..=u64::MAX)) {
            let codec = codec();
            prop_assert_eq!(codec.decode(codec.encode(id).as_str()), Ok(id));
        }

        #[test]
        fn arbitrary_strings_never_panic(input in "[a-zA-Z0-9]{7,64}") {
            let codec = codec();
            if let Ok(id) = codec.decode(&input) {
                let reencoded = codec.encode(id);
                prop_assert_eq!(reencoded.as_str(), input.as_str());
            }
        }

        #[test]
        fn salts_do_not_cross_decode(id in 0u64..1_000_000) {
            let ours = codec();
            let theirs = salted("pepper");
            let code = theirs.encode(id);
            if let Ok(decoded) = ours.decode(code.as_str()) {
                // an accidental collision must still be our own exact encoding
                prop_assert_eq!(ours.encode(decoded), code);
            }
        }
    }
}
