pub mod counter;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use pinhole_core::ShortCode;

pub use counter::CounterGenerator;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;
    /// Generates a type that can be converted into a short code.
    ///
    /// Successive calls on one instance must not repeat a code.
    fn generate(&self) -> Self::Output;
}

/// Encodes a counter value as a short code.
///
/// The value is rendered as decimal text, and that text is encoded with the
/// URL-safe base64 alphabet (`-` and `_`), padding included.
pub fn encode_counter(value: u64) -> ShortCode {
    ShortCode::new_unchecked(URL_SAFE.encode(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_decimal_text() {
        assert_eq!(encode_counter(1).as_str(), "MQ==");
        assert_eq!(encode_counter(10).as_str(), "MTA=");
        assert_eq!(encode_counter(123).as_str(), "MTIz");
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(encode_counter(42), encode_counter(42));
    }

    #[test]
    fn encoded_codes_pass_validation() {
        for value in [1, 9, 10, 99, 1_000, 65_535, u64::MAX] {
            let code = encode_counter(value);
            assert!(ShortCode::new(code.as_str()).is_ok(), "{code}");
        }
    }

    #[test]
    fn encoding_is_reversible() {
        let code = encode_counter(98_765);
        let decoded = URL_SAFE.decode(code.as_str()).unwrap();
        assert_eq!(decoded, b"98765");
    }
}
