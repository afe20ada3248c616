use crate::models::TripEstimate;

/// Fixed rate per minute fare model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareModel {
    pub rate_per_minute: f64,
}

impl Default for FareModel {
    fn default() -> Self {
        Self {
            rate_per_minute: 12.0,
        }
    }
}

impl FareModel {
    pub fn new(rate_per_minute: f64) -> Self {
        Self { rate_per_minute }
    }

    /// Derive time and price from the two route legs.
    ///
    /// Total minutes are rounded to 2 decimals first and the price is computed
    /// from that rounded value, then rounded to a whole amount.
    pub fn estimate(&self, seconds_to_user: u64, seconds_to_destination: u64) -> TripEstimate {
        let total_seconds = seconds_to_user.saturating_add(seconds_to_destination);
        let time = round_to(total_seconds as f64 / 60.0, 2);
        let price = (time * self.rate_per_minute).round();

        TripEstimate {
            time,
            price: format!("{}", price as i64),
            time_to_user: seconds_to_user,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
