use std::array::from_fn;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

/// Length of a hello random on the wire.
pub const RANDOM_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Random {
    pub gmt_unix_time: u32,
    pub random_bytes: [u8; 28],
}

impl Random {
    pub fn new() -> Self {
        let gmt_unix_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);

        let mut t = rand::thread_rng();

        Self {
            gmt_unix_time,
            random_bytes: from_fn(|_| t.gen()),
        }
    }

    pub fn from_bytes(bytes: [u8; RANDOM_LEN]) -> Self {
        let mut random_bytes = [0u8; 28];
        random_bytes.copy_from_slice(&bytes[4..]);
        Random {
            gmt_unix_time: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            random_bytes,
        }
    }

    pub fn to_bytes(&self) -> [u8; RANDOM_LEN] {
        let mut out = [0u8; RANDOM_LEN];
        out[..4].copy_from_slice(&self.gmt_unix_time.to_be_bytes());
        out[4..].copy_from_slice(&self.random_bytes);
        out
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}
