use chrono::{Local, NaiveDate};
use rand::Rng;

/// Tracking ids are the local date as `YYMMDD` followed by a random
/// four digit suffix, e.g. `2601051234`.
pub fn generate_id() -> String {
    generate_id_at(Local::now().date_naive(), &mut rand::thread_rng())
}

pub fn generate_id_at<R: Rng + ?Sized>(date: NaiveDate, rng: &mut R) -> String {
    let suffix: u16 = rng.gen_range(1000..=9999);
    format!("{}{suffix}", date.format("%y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn id_is_date_prefix_plus_four_digits() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let id = generate_id_at(date, &mut rng);
            assert_eq!(id.len(), 10);
            assert!(id.starts_with("260105"));
            assert!(id.chars().all(|c| c.is_ascii_digit()));
            let suffix: u16 = id[6..].parse().unwrap();
            assert!((1000..=9999).contains(&suffix));
        }
    }

    #[test]
    fn today_id_is_ten_digits() {
        let id = generate_id();
        assert_eq!(id.len(), 10);
        assert!(id.chars().all(|c| c.is_ascii_digit()));
    }
}
