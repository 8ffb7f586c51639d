//! Order identifier generation.
//!
//! Ids look like `XC` + base-36 unix millis + 4 random base-36 chars, all
//! uppercase. Uniqueness is best effort; the order store's unique key is the
//! real guarantee and callers retry on collision.

use chrono::Utc;
use rand::Rng;
use crate::domain::value_objects::OrderId;

pub const DEFAULT_PREFIX: &str = "XC";
const SUFFIX_LEN: usize = 4;
const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Clone, Debug)]
pub struct OrderIdGenerator {
    prefix: String,
}

impl OrderIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into().trim().to_uppercase() }
    }

    pub fn generate(&self) -> OrderId {
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        self.generate_at(millis, &mut rand::thread_rng())
    }

    pub fn generate_at<R: Rng + ?Sized>(&self, unix_millis: u64, rng: &mut R) -> OrderId {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        OrderId::from_generated(format!("{}{}{}", self.prefix, to_base36(unix_millis), suffix))
    }
}

impl Default for OrderIdGenerator {
    fn default() -> Self { Self::new(DEFAULT_PREFIX) }
}

pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
