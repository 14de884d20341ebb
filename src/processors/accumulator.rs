use crate::models::MonthlyValues;
use crate::utils::constants::MONTHS_PER_YEAR;

/// Running mean that stays absent until something is added
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: f64,
    hits: usize,
}

impl MeanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.hits += 1;
    }

    pub fn add_option(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.add(v);
        }
    }

    pub fn mean(&self) -> Option<f64> {
        (self.hits > 0).then(|| self.sum / self.hits as f64)
    }
}

/// One [`MeanAccumulator`] per calendar month
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthlyAccumulator {
    months: [MeanAccumulator; MONTHS_PER_YEAR],
}

impl MonthlyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, month: usize, value: f64) {
        if let Some(acc) = self.months.get_mut(month) {
            acc.add(value);
        }
    }

    pub fn add_values(&mut self, values: &MonthlyValues) {
        for (acc, value) in self.months.iter_mut().zip(values) {
            acc.add_option(*value);
        }
    }

    pub fn means(&self) -> MonthlyValues {
        self.months.map(|acc| acc.mean())
    }
}
