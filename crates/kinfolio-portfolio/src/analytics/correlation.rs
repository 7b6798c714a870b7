//! Pairwise correlation of daily returns and the diversification score.

use kinfolio_math::stats::correlation;
use serde::{Deserialize, Serialize};

use super::returns::ReturnTable;

/// Symmetric symbol × symbol Pearson correlation matrix.
///
/// Each pair uses only the dates on which both symbols have a return. A cell
/// is `None` when the coefficient is undefined for that pair (fewer than two
/// shared dates, or a flat series). The diagonal is always 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Row and column labels.
    pub symbols: Vec<String>,
    /// `values[i][j]` is the correlation of `symbols[i]` and `symbols[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlations of every symbol in the table. Empty for an empty table.
    #[must_use]
    pub fn from_table(table: &ReturnTable) -> Self {
        let symbols = table.symbols().to_vec();
        let n = symbols.len();
        let mut values = vec![vec![None; n]; n];

        for i in 0..n {
            values[i][i] = Some(1.0);
            for j in (i + 1)..n {
                let (a, b) = table.pairwise(&symbols[i], &symbols[j]);
                let r = correlation(&a, &b).ok().flatten();
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Self { symbols, values }
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True when no symbol had history.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Correlation of two symbols, if both are present and it is defined.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        self.values[i][j]
    }

    /// Mean of the off-diagonal cells.
    ///
    /// `None` when there are no off-diagonal cells or any of them is
    /// undefined.
    #[must_use]
    pub fn average_off_diagonal(&self) -> Option<f64> {
        let n = self.len();
        if n < 2 {
            return None;
        }

        let mut sum = 0.0;
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    sum += self.values[i][j]?;
                }
            }
        }
        Some(sum / (n * (n - 1)) as f64)
    }
}

/// Neutral score used when correlations cannot be assessed.
pub const NEUTRAL_DIVERSIFICATION: f64 = 5.0;

/// Diversification score on a 0 to 10 scale.
///
/// Half the score rewards breadth (saturating at 20 holdings), half rewards
/// low average correlation. A single holding scores 0; a matrix with fewer
/// than two symbols or an undefined average scores
/// [`NEUTRAL_DIVERSIFICATION`].
#[must_use]
pub fn diversification_score(holding_count: usize, matrix: &CorrelationMatrix) -> f64 {
    if holding_count <= 1 {
        return 0.0;
    }

    match matrix.average_off_diagonal() {
        Some(avg) => {
            let breadth = (holding_count as f64 / 20.0).min(1.0) * 5.0;
            breadth + (1.0 - avg) * 5.0
        }
        None => NEUTRAL_DIVERSIFICATION,
    }
}
