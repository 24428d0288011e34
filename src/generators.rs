use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::draw::Draw;
use crate::errors::{DrawError, TicketError};
use crate::source::{Mapping, RandomSource};

/// The inclusive range and number of values for one draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawRequest {
    pub min: i32,
    pub max: i32,
    pub count: usize,
}

impl Default for DrawRequest {
    /// Six numbers from 1 to 60.
    fn default() -> Self {
        Self {
            min: 1,
            max: 60,
            count: 6,
        }
    }
}

impl DrawRequest {
    pub fn new(min: i32, max: i32, count: usize) -> Self {
        Self { min, max, count }
    }

    /// Number of distinct values in `min..=max`, at most `2^32`.
    pub fn span(&self) -> Result<u64, DrawError> {
        if self.min > self.max {
            return Err(DrawError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok((i64::from(self.max) - i64::from(self.min) + 1) as u64)
    }

    /// Checks the request can be satisfied and returns its span.
    pub fn validate(&self) -> Result<u64, DrawError> {
        let span = self.span()?;
        if self.count as u64 > span {
            return Err(DrawError::CountExceedsRange {
                count: self.count,
                available: span,
            });
        }
        Ok(span)
    }

    /// Checks hand-picked numbers against this request.
    ///
    /// The checks run in this order: how many numbers there are, whether
    /// each lies in range, uniqueness, then ascending order.
    pub fn validate_ticket(&self, numbers: &[i32]) -> Result<Draw, TicketError> {
        if numbers.len() != self.count {
            return Err(TicketError::WrongCount {
                expected: self.count,
                found: numbers.len(),
            });
        }

        if let Some(&value) = numbers.iter().find(|v| !(self.min..=self.max).contains(*v)) {
            return Err(TicketError::OutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }

        let mut seen = BTreeSet::new();
        if let Some(&value) = numbers.iter().find(|&&v| !seen.insert(v)) {
            return Err(TicketError::Duplicate(value));
        }

        Draw::try_from(numbers.to_vec())
    }

    fn value_at(&self, offset: u64) -> i32 {
        // offset < span, so the sum stays inside min..=max.
        (i64::from(self.min) + offset as i64) as i32
    }
}

/// How unique values are collected.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Rejection when the draw takes at most half the range, shuffle otherwise.
    #[default]
    Auto,
    /// Draw single values and drop the ones already taken.
    Rejection,
    /// Partially shuffle the range and keep the prefix. Only swapped
    /// positions are stored, so memory follows `count`, not the range.
    Shuffle,
}

impl Strategy {
    fn resolve(self, count: usize, span: u64) -> Strategy {
        match self {
            Strategy::Auto if (count as u64).saturating_mul(2) > span => Strategy::Shuffle,
            Strategy::Auto => Strategy::Rejection,
            other => other,
        }
    }
}

/// Draws unique values from a range with a given mapping and strategy.
///
/// The random source is passed to each call, so one generator can serve
/// both the secure production source and deterministic test sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniqueDrawGenerator {
    pub mapping: Mapping,
    pub strategy: Strategy,
}

impl UniqueDrawGenerator {
    pub fn new(mapping: Mapping, strategy: Strategy) -> Self {
        Self { mapping, strategy }
    }

    /// Draws `count` distinct values from `min..=max`, sorted ascending.
    pub fn generate<S: RandomSource + ?Sized>(
        &self,
        source: &mut S,
        min: i32,
        max: i32,
        count: usize,
    ) -> Result<Draw, DrawError> {
        self.generate_request(source, &DrawRequest::new(min, max, count))
    }

    pub fn generate_request<S: RandomSource + ?Sized>(
        &self,
        source: &mut S,
        request: &DrawRequest,
    ) -> Result<Draw, DrawError> {
        let span = request.validate()?;
        if request.count == 0 {
            return Ok(Draw::default());
        }

        let strategy = self.strategy.resolve(request.count, span);
        tracing::debug!(
            min = request.min,
            max = request.max,
            count = request.count,
            ?strategy,
            mapping = ?self.mapping,
            "generating draw"
        );

        let numbers = match strategy {
            Strategy::Shuffle => self.shuffle(source, request, span),
            _ => self.reject_duplicates(source, request, span),
        };
        Ok(Draw::from_sorted(numbers))
    }

    fn reject_duplicates<S: RandomSource + ?Sized>(
        &self,
        source: &mut S,
        request: &DrawRequest,
        span: u64,
    ) -> Vec<i32> {
        let mut draw = BTreeSet::new();
        let mut duplicates = 0usize;

        while draw.len() < request.count {
            let value = request.value_at(self.mapping.sample(source, span));
            if !draw.insert(value) {
                duplicates += 1;
            }
        }

        tracing::debug!(duplicates, "rejection sampling finished");
        draw.into_iter().collect()
    }

    fn shuffle<S: RandomSource + ?Sized>(
        &self,
        source: &mut S,
        request: &DrawRequest,
        span: u64,
    ) -> Vec<i32> {
        // Positions 0..span hold min + position until a swap moves something there.
        let mut swapped: HashMap<u64, i32> = HashMap::with_capacity(request.count);
        let mut values = Vec::with_capacity(request.count);

        for i in 0..request.count as u64 {
            let j = i + self.mapping.sample(source, span - i);
            let at_i = swapped.get(&i).copied().unwrap_or_else(|| request.value_at(i));
            let at_j = swapped.get(&j).copied().unwrap_or_else(|| request.value_at(j));
            swapped.insert(j, at_i);
            values.push(at_j);
        }

        values.sort_unstable();
        values
    }
}
