//! Key encoding utilities for `RocksDB`.

use eagle_core::UserId;

/// Encode a user id as a fixed-width store key.
#[must_use]
pub fn user_key(user_id: UserId) -> [u8; 8] {
    user_id.to_be_bytes()
}

/// Decode a user id from a store key.
///
/// Returns `None` if the key is not exactly 8 bytes.
#[must_use]
pub fn decode_user_key(key: &[u8]) -> Option<UserId> {
    let bytes: [u8; 8] = key.try_into().ok()?;
    Some(UserId::new(i64::from_be_bytes(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_key_roundtrip() {
        let id = UserId::new(123_456_789);
        let key = user_key(id);
        assert_eq!(decode_user_key(&key), Some(id));
    }

    #[test]
    fn decode_rejects_wrong_width() {
        assert_eq!(decode_user_key(&[1, 2, 3]), None);
    }
}
