//! 轮盘加权抽奖
//!
//! 每个候选项按 weight / total 的概率被选中。随机数来源通过 [`RandomSource`]
//! 注入，生产环境使用 [`ThreadRandom`]，测试使用固定序列。

use rand::Rng;
use thiserror::Error;

/// 可参与加权抽奖的条目
pub trait Weighted {
    fn weight(&self) -> f64;
}

/// 随机数来源：返回 `[0, total)` 内的均匀随机值
pub trait RandomSource {
    fn sample(&mut self, total: f64) -> f64;
}

/// 基于线程本地 CSPRNG，每个请求各自持有，无需同步
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn sample(&mut self, total: f64) -> f64 {
        rand::rng().random_range(0.0..total)
    }
}

/// 按顺序回放预设的随机值，用尽后重复最后一个
#[derive(Debug, Clone)]
pub struct FixedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for FixedRandom {
    fn sample(&mut self, _total: f64) -> f64 {
        let idx = self.cursor.min(self.values.len().saturating_sub(1));
        self.cursor += 1;
        self.values.get(idx).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DrawError {
    #[error("No candidates to draw from")]
    Empty,
    #[error("Active weight sum must be positive (got {0})")]
    NonPositiveTotal(f64),
}

/// 所有条目的权重之和
pub fn total_weight<T: Weighted>(candidates: &[T]) -> f64 {
    candidates.iter().map(Weighted::weight).sum()
}

/// 加权选择一个中奖条目。
///
/// 逻辑:
/// 1. total = 所有权重之和，必须 > 0
/// 2. r 取 `[0, total)` 内随机值
/// 3. 按顺序累加权重，返回第一个累计值 >= r 的条目
/// 4. 浮点累加误差导致无条目命中时返回最后一个
pub fn select_winner<'a, T, R>(candidates: &'a [T], source: &mut R) -> Result<&'a T, DrawError>
where
    T: Weighted,
    R: RandomSource + ?Sized,
{
    let last = candidates.last().ok_or(DrawError::Empty)?;

    let total = total_weight(candidates);
    if !total.is_finite() || total <= 0.0 {
        return Err(DrawError::NonPositiveTotal(total));
    }

    let r = source.sample(total);
    let mut acc = 0.0;
    for candidate in candidates {
        acc += candidate.weight();
        if r <= acc {
            return Ok(candidate);
        }
    }

    Ok(last)
}
