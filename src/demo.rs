use rand::Rng;

use crate::types::{LotteryData, Prizes};
use crate::utils::vn_now;

pub const DEMO_SOURCE: &str = "Demo (Chờ cập nhật)";

fn random_digits(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Synthetic stand-in used when every live source is down. Mirrors the
/// real XSHCM board exactly: one number per tier except G6 (3), G4 (7)
/// and G3 (2), with the real digit length for each tier.
pub fn generate_fallback_data() -> LotteryData {
    let date_str = vn_now().format("%d/%m").to_string();

    LotteryData {
        date: format!("Xổ số TP.HCM ngày {}", date_str),
        prizes: Prizes {
            g8: vec![random_digits(2)],
            g7: vec![random_digits(3)],
            g6: (0..3).map(|_| random_digits(4)).collect(),
            g5: vec![random_digits(4)],
            g4: (0..7).map(|_| random_digits(5)).collect(),
            g3: (0..2).map(|_| random_digits(5)).collect(),
            g2: vec![random_digits(5)],
            g1: vec![random_digits(5)],
            db: vec![random_digits(6)],
        },
        dau_duoi: None,
        source: DEMO_SOURCE.to_string(),
        is_demo: Some(true),
    }
}
