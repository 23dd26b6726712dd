use super::error::DomainError;
use rust_decimal::Decimal;
use serde::Serialize;

/// One marginal rate, applying to income up to `upper` (inclusive).
///
/// `upper: None` marks the unbounded top band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band {
    pub name: &'static str,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

impl Band {
    pub fn new(name: &'static str, upper: Decimal, rate: Decimal) -> Self {
        Band {
            name,
            upper: Some(upper),
            rate,
        }
    }

    pub fn unbounded(name: &'static str, rate: Decimal) -> Self {
        Band {
            name,
            upper: None,
            rate,
        }
    }
}

/// Ordered progressive bands, each defined by its upper bound.
///
/// Slice widths are always derived from consecutive bounds, so a table can be
/// edited without recomputing widths by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandTable {
    bands: Vec<Band>,
}

impl BandTable {
    /// Build a table, checking that bounds strictly increase, rates lie in
    /// [0, 1] and only the last band is unbounded.
    pub fn new(bands: Vec<Band>) -> Result<Self, DomainError> {
        let Some(last) = bands.last() else {
            return Err(DomainError::InvalidBandTable("no bands".to_string()));
        };
        if last.upper.is_some() {
            return Err(DomainError::InvalidBandTable(format!(
                "last band '{}' must be unbounded",
                last.name
            )));
        }

        let mut previous = Decimal::ZERO;
        for (i, band) in bands.iter().enumerate() {
            if band.rate < Decimal::ZERO || band.rate > Decimal::ONE {
                return Err(DomainError::InvalidBandTable(format!(
                    "rate {} of band '{}' is outside [0, 1]",
                    band.rate, band.name
                )));
            }
            match band.upper {
                Some(upper) if upper <= previous => {
                    return Err(DomainError::InvalidBandTable(format!(
                        "upper bound {} of band '{}' does not exceed {}",
                        upper, band.name, previous
                    )));
                }
                Some(upper) => previous = upper,
                None if i + 1 < bands.len() => {
                    return Err(DomainError::InvalidBandTable(format!(
                        "only the last band may be unbounded, found '{}'",
                        band.name
                    )));
                }
                None => {}
            }
        }

        Ok(BandTable { bands })
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Slice `amount` across the bands and accumulate the charge for each slice.
    ///
    /// An amount exactly at a bound is charged entirely in the lower band.
    pub fn apply(&self, amount: Decimal) -> BandedAmount {
        let mut remaining = amount;
        let mut lower = Decimal::ZERO;
        let mut slices = Vec::new();
        let mut total = Decimal::ZERO;

        for band in &self.bands {
            if remaining <= Decimal::ZERO {
                break;
            }
            let taxable = match band.upper {
                Some(upper) => remaining.min(upper - lower),
                None => remaining,
            };
            let tax = taxable * band.rate;
            log::debug!(
                "{} band: {} from {} at {} = {}",
                band.name,
                taxable,
                lower,
                band.rate,
                tax
            );
            slices.push(BandSlice {
                name: band.name,
                lower,
                upper: band.upper,
                rate: band.rate,
                taxable,
                tax,
            });
            total += tax;
            remaining -= taxable;
            if let Some(upper) = band.upper {
                lower = upper;
            }
        }

        BandedAmount { slices, total }
    }
}

/// The part of an amount that fell into one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandSlice {
    pub name: &'static str,
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
    pub taxable: Decimal,
    pub tax: Decimal,
}

/// Result of applying a band table: total charge plus the slices it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BandedAmount {
    pub slices: Vec<BandSlice>,
    pub total: Decimal,
}

impl BandedAmount {
    /// Income covered by the slices
    pub fn taxed_income(&self) -> Decimal {
        self.slices.iter().map(|s| s.taxable).sum()
    }
}

/// Income tax on `taxable_income` once `allowance` has been deducted.
pub fn income_tax(taxable_income: Decimal, allowance: Decimal, table: &BandTable) -> BandedAmount {
    table.apply(taxable_income - allowance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn ruk() -> BandTable {
        BandTable::new(vec![
            Band::new("basic", dec!(37700), dec!(0.20)),
            Band::new("higher", dec!(125140), dec!(0.40)),
            Band::unbounded("additional", dec!(0.45)),
        ])
        .unwrap()
    }

    #[test]
    fn nothing_due_below_allowance() {
        let tax = income_tax(dec!(10000), dec!(12570), &ruk());
        assert_eq!(tax.total, dec!(0));
        assert!(tax.slices.is_empty());
    }

    #[test]
    fn nothing_due_at_allowance() {
        let tax = income_tax(dec!(12570), dec!(12570), &ruk());
        assert_eq!(tax.total, dec!(0));
    }

    #[test]
    fn basic_rate_only() {
        let tax = income_tax(dec!(30000), dec!(12570), &ruk());
        assert_eq!(tax.total, dec!(3486));
        assert_eq!(tax.slices.len(), 1);
    }

    #[test]
    fn higher_rate_example() {
        // (50270 - 12570) * 0.20 + (60000 - 50270) * 0.40
        let tax = income_tax(dec!(60000), dec!(12570), &ruk());
        assert_eq!(tax.total, dec!(11432));
        assert_eq!(tax.slices[0].tax, dec!(7540));
        assert_eq!(tax.slices[1].tax, dec!(3892));
    }

    #[test]
    fn amount_on_threshold_stays_in_lower_band() {
        let tax = ruk().apply(dec!(37700));
        assert_eq!(tax.slices.len(), 1);
        assert_eq!(tax.slices[0].name, "basic");
        assert_eq!(tax.total, dec!(7540));
    }

    #[test]
    fn additional_rate_uses_unbounded_band() {
        let tax = ruk().apply(dec!(200000));
        assert_eq!(tax.slices.len(), 3);
        let last = &tax.slices[2];
        assert_eq!(last.lower, dec!(125140));
        assert_eq!(last.upper, None);
        assert_eq!(last.taxable, dec!(74860));
        assert_eq!(tax.total, dec!(7540) + dec!(34976) + dec!(33687));
    }

    #[test]
    fn rejects_bounded_last_band() {
        let err = BandTable::new(vec![Band::new("basic", dec!(100), dec!(0.2))]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidBandTable(_)));
    }

    #[test]
    fn rejects_unordered_bounds() {
        let err = BandTable::new(vec![
            Band::new("higher", dec!(125140), dec!(0.40)),
            Band::new("basic", dec!(37700), dec!(0.20)),
            Band::unbounded("additional", dec!(0.45)),
        ])
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidBandTable(_)));
    }

    #[test]
    fn rejects_unbounded_band_before_last() {
        let err = BandTable::new(vec![
            Band::unbounded("basic", dec!(0.20)),
            Band::unbounded("higher", dec!(0.40)),
        ])
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidBandTable(_)));
    }

    #[test]
    fn rejects_rate_above_one() {
        let err = BandTable::new(vec![Band::unbounded("all", dec!(1.5))]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidBandTable(_)));
    }

    #[test]
    fn rejects_empty_table() {
        assert!(BandTable::new(Vec::new()).is_err());
    }

    proptest! {
        #[test]
        fn slices_cover_income_above_allowance(pence in 0i64..100_000_000i64, allowance in 0i64..20_000i64) {
            let income = Decimal::new(pence, 2);
            let allowance = Decimal::from(allowance);
            let tax = income_tax(income, allowance, &ruk());
            prop_assert_eq!(tax.taxed_income(), (income - allowance).max(Decimal::ZERO));
        }

        #[test]
        fn tax_never_decreases_with_income(a in 0i64..50_000_000i64, b in 0i64..50_000_000i64) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let low = income_tax(Decimal::new(low, 2), dec!(12570), &ruk());
            let high = income_tax(Decimal::new(high, 2), dec!(12570), &ruk());
            prop_assert!(low.total <= high.total);
        }
    }
}
