use proptest::prelude::*;

use badged_types::{Badge, PublicKey, Serial, Timestamp};

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Timestamp elapsed_since: elapsed_since(now) = now - self (saturating).
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000_000, offset in 0u64..1_000_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.elapsed_since(now), offset);
    }

    /// Timestamp has_expired agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired(base in 0u64..1_000_000, window in 0u64..10_000, now in 0u64..2_000_000) {
        let t = Timestamp::new(base);
        prop_assert_eq!(t.has_expired(window, Timestamp::new(now)), now >= base + window);
    }

    /// Integer serials expose their numeric value.
    #[test]
    fn integer_serials_are_numeric(n in any::<i64>()) {
        let serial = Serial::new(n.to_string());
        prop_assert_eq!(serial.as_number(), Some(n as i128));
    }

    /// Hex encoding of public keys is lossless.
    #[test]
    fn public_key_hex(bytes in prop::array::uniform32(0u8..)) {
        let key = PublicKey(bytes);
        prop_assert_eq!(PublicKey::from_hex(&key.to_hex()).unwrap(), key);
    }

    /// The date formatter never panics, whatever the timestamp.
    #[test]
    fn formatted_date_total(millis in any::<u64>()) {
        let badge = Badge::new(Serial::new("1"), None, None, None, "", Timestamp::new(millis));
        prop_assert!(!badge.formatted_date().is_empty());
    }
}
