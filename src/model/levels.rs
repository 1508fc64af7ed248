use serde::Serialize;

use crate::core::SeverityLevel;

/// One value per severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PerLevel<T> {
    pub high: T,
    pub medium: T,
    pub low: T,
}

impl<T> PerLevel<T> {
    pub fn from_fn(mut f: impl FnMut(SeverityLevel) -> T) -> Self {
        Self {
            high: f(SeverityLevel::High),
            medium: f(SeverityLevel::Medium),
            low: f(SeverityLevel::Low),
        }
    }

    pub fn try_from_fn<E>(mut f: impl FnMut(SeverityLevel) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            high: f(SeverityLevel::High)?,
            medium: f(SeverityLevel::Medium)?,
            low: f(SeverityLevel::Low)?,
        })
    }

    pub fn get(&self, level: SeverityLevel) -> &T {
        match level {
            SeverityLevel::High => &self.high,
            SeverityLevel::Medium => &self.medium,
            SeverityLevel::Low => &self.low,
        }
    }

    pub fn get_mut(&mut self, level: SeverityLevel) -> &mut T {
        match level {
            SeverityLevel::High => &mut self.high,
            SeverityLevel::Medium => &mut self.medium,
            SeverityLevel::Low => &mut self.low,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SeverityLevel, &T)> {
        SeverityLevel::ALL.into_iter().map(move |level| (level, self.get(level)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(SeverityLevel, &T) -> U) -> PerLevel<U> {
        PerLevel::from_fn(|level| f(level, self.get(level)))
    }
}
