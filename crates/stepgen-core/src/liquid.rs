//! Liquid volume arithmetic.
//!
//! Wells and tips hold mixtures keyed by liquid id. Removal is proportional
//! across the mixture, and a request for more than is present takes
//! everything and leaves the container empty — volumes never go negative.

use std::collections::BTreeMap;

use stepgen_model::LiquidId;

/// Mixture of liquids, µL per liquid id.
pub type WellContents = BTreeMap<LiquidId, f64>;

/// Total volume of a mixture, µL.
pub fn total_volume(contents: &WellContents) -> f64 {
    contents.values().sum()
}

/// Remove `volume` µL proportionally from `contents`.
///
/// Returns `(removed, remaining)`. When `volume` is at least the total, the
/// whole mixture moves to `removed` and `remaining` is empty.
pub fn split_liquid(volume: f64, contents: &WellContents) -> (WellContents, WellContents) {
    let total = total_volume(contents);
    if total <= 0.0 {
        return (WellContents::new(), WellContents::new());
    }
    if volume >= total {
        return (contents.clone(), WellContents::new());
    }
    let fraction = volume / total;
    let mut removed = WellContents::new();
    let mut remaining = WellContents::new();
    for (liquid, amount) in contents {
        let taken = amount * fraction;
        removed.insert(liquid.clone(), taken);
        remaining.insert(liquid.clone(), amount - taken);
    }
    (removed, remaining)
}

/// Merge `addition` into `base`, summing per-liquid volumes.
pub fn merge_liquid(base: &WellContents, addition: &WellContents) -> WellContents {
    let mut merged = base.clone();
    for (liquid, amount) in addition {
        *merged.entry(liquid.clone()).or_insert(0.0) += amount;
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixture(pairs: &[(&str, f64)]) -> WellContents {
        pairs
            .iter()
            .map(|(id, volume)| (LiquidId::from(*id), *volume))
            .collect()
    }

    #[test]
    fn split_is_proportional() {
        let contents = mixture(&[("water", 60.0), ("dye", 40.0)]);
        let (removed, remaining) = split_liquid(50.0, &contents);
        assert_eq!(removed.get(&"water".into()), Some(&30.0));
        assert_eq!(removed.get(&"dye".into()), Some(&20.0));
        assert_eq!(total_volume(&remaining), 50.0);
    }

    #[test]
    fn overdraft_takes_everything() {
        let contents = mixture(&[("water", 30.0)]);
        let (removed, remaining) = split_liquid(100.0, &contents);
        assert_eq!(total_volume(&removed), 30.0);
        assert!(remaining.is_empty());
    }

    #[test]
    fn split_of_empty_is_empty() {
        let (removed, remaining) = split_liquid(10.0, &WellContents::new());
        assert!(removed.is_empty());
        assert!(remaining.is_empty());
    }

    #[test]
    fn merge_sums_shared_liquids() {
        let base = mixture(&[("water", 10.0)]);
        let addition = mixture(&[("water", 5.0), ("dye", 1.0)]);
        let merged = merge_liquid(&base, &addition);
        assert_eq!(merged.get(&"water".into()), Some(&15.0));
        assert_eq!(merged.get(&"dye".into()), Some(&1.0));
    }
}
