use std::collections::BTreeMap;

use crate::{
    core::{ValidationError, meter::MeterProfile, tier::PriceTier, usage::TierUsage},
    quantity::{cost::Cost, energy::KilowattHours},
};

/// Carry-over state: the tier the previous billing period stopped in and
/// the kWh already consumed inside it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Position {
    /// 1-based tier index.
    pub tier: u8,

    pub existing: KilowattHours,
}

impl Default for Position {
    fn default() -> Self {
        Self { tier: 1, existing: KilowattHours::ZERO }
    }
}

/// One consumption total spread over the tiers it falls into.
///
/// Built once per calculation and immutable afterwards. Tiers below the
/// carry-over tier were settled by the previous period and never appear;
/// the carry-over kWh shrink the first tier's remaining width.
pub struct UsageAllocation<'a> {
    meter: &'a MeterProfile,
    nb_kwh: KilowattHours,
    position: Position,
    slices: BTreeMap<u8, TierUsage>,
    lighting: Cost,
}

impl<'a> UsageAllocation<'a> {
    pub fn new(
        meter: &'a MeterProfile,
        nb_kwh: KilowattHours,
        position: Position,
    ) -> Result<Self, ValidationError> {
        if nb_kwh < KilowattHours::ZERO {
            return Err(ValidationError::NegativeKwh(nb_kwh));
        }

        let mut slices = BTreeMap::new();
        let mut remaining = nb_kwh;
        let mut carry_over = Some(position.existing);
        for tier in meter.tiers() {
            if tier.index() < position.tier {
                continue;
            }
            if remaining <= KilowattHours::ZERO {
                break;
            }
            let width = effective_width(tier, &mut carry_over);
            let assigned = width.map_or(remaining, |width| remaining.min(width));
            remaining -= assigned;
            slices.insert(
                tier.index(),
                TierUsage::builder()
                    .nb_kwh(assigned)
                    .price(tier.price(assigned))
                    .vat(tier.vat(assigned))
                    .maint(tier.maintenance(assigned))
                    .cost(tier.cost(assigned))
                    .build(),
            );
        }

        let lighting = meter.lighting_cost(nb_kwh);
        Ok(Self { meter, nb_kwh, position, slices, lighting })
    }

    pub const fn nb_kwh(&self) -> KilowattHours {
        self.nb_kwh
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    /// Public lighting surcharge, computed once on the total.
    pub const fn lighting(&self) -> Cost {
        self.lighting
    }

    pub const fn slices(&self) -> &BTreeMap<u8, TierUsage> {
        &self.slices
    }

    /// Grand total: the lighting surcharge plus every tier cost.
    pub fn cost(&self) -> Cost {
        (self.lighting + self.slices.values().map(|usage| usage.cost).sum::<Cost>()).round_std()
    }

    /// Where the next billing period resumes: the first tier not filled to
    /// its remaining width, together with the kWh already standing in it.
    pub fn current_position(&self) -> Position {
        let mut carry_over = Some(self.position.existing);
        let mut last = self.position;
        for tier in self.meter.tiers() {
            if tier.index() < self.position.tier {
                continue;
            }
            let width = effective_width(tier, &mut carry_over);
            let base = if tier.index() == self.position.tier {
                self.position.existing
            } else {
                KilowattHours::ZERO
            };
            let Some(usage) = self.slices.get(&tier.index()) else {
                return Position { tier: tier.index(), existing: base };
            };
            let existing = base + usage.nb_kwh;
            if width.is_some_and(|width| usage.nb_kwh < width) {
                return Position { tier: tier.index(), existing };
            }
            last = Position { tier: tier.index(), existing };
        }
        last
    }

    /// How many kWh the budget buys, walking the same tiers the forward
    /// pass fills.
    ///
    /// Bounded tiers are settled at their full-width cost for as long as
    /// the running total stays under the budget; the first tier that the
    /// budget cannot clear is billed partially at its linear unit cost.
    /// The unbounded final tier has no full-width cost and absorbs any
    /// budget that outruns the bounded tiers. Unrounded.
    pub fn kwh_for(&self, amount: Cost) -> KilowattHours {
        let mut carry_over = Some(self.position.existing);
        let mut slices_max = Cost::ZERO;
        let mut total_kwh = KilowattHours::ZERO;
        let mut boundary = None;
        for tier in self.meter.tiers() {
            if tier.index() < self.position.tier {
                continue;
            }
            let width = effective_width(tier, &mut carry_over);
            boundary = Some(tier);
            match (tier.max_total_cost(), width) {
                (Some(max_cost), Some(width)) if slices_max + max_cost < amount => {
                    slices_max += max_cost;
                    total_kwh += width;
                }
                _ => break,
            }
        }
        let Some(boundary) = boundary else {
            return total_kwh;
        };
        total_kwh + boundary.kwh_for(amount - slices_max)
    }
}

/// The first processed tier loses the carried-over kWh from its width; an
/// unbounded width is never reduced.
fn effective_width(
    tier: PriceTier<'_>,
    carry_over: &mut Option<KilowattHours>,
) -> Option<KilowattHours> {
    match (tier.width(), carry_over.take()) {
        (Some(width), Some(existing)) => Some((width - existing).max(KilowattHours::ZERO)),
        (width, _) => width,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::meter::test_profile;

    fn kwh(value: f64) -> KilowattHours {
        KilowattHours::from(value)
    }

    #[test]
    fn test_fresh_meter() {
        let profile = test_profile();
        let allocation = UsageAllocation::new(&profile, kwh(60.0), Position::default()).unwrap();

        assert_eq!(allocation.slices().len(), 2);
        let first = &allocation.slices()[&1];
        assert_eq!(first.nb_kwh, kwh(50.0));
        assert_eq!(first.price, Cost::from(3000));
        assert_eq!(first.vat, Cost::from(300));
        assert_eq!(first.cost, Cost::from(3300));
        let second = &allocation.slices()[&2];
        assert_eq!(second.nb_kwh, kwh(10.0));
        assert_eq!(second.cost, Cost::from(770));

        assert_eq!(allocation.lighting(), Cost::from(120));
        assert_eq!(allocation.cost(), Cost::from(4190));
    }

    #[test]
    fn test_zero_consumption() {
        let profile = test_profile();
        let allocation = UsageAllocation::new(&profile, kwh(0.0), Position::default()).unwrap();
        assert!(allocation.slices().is_empty());
        assert_eq!(allocation.lighting(), Cost::ZERO);
        assert_eq!(allocation.cost(), Cost::ZERO);
    }

    #[test]
    fn test_negative_consumption() {
        let profile = test_profile();
        let error = UsageAllocation::new(&profile, kwh(-1.0), Position::default()).unwrap_err();
        assert!(matches!(error, ValidationError::NegativeKwh(_)));
    }

    #[test]
    fn test_conservation() {
        let profile = test_profile();
        for total in [0.0, 7.5, 50.0, 60.0, 123.4, 250.0] {
            let allocation =
                UsageAllocation::new(&profile, kwh(total), Position::default()).unwrap();
            let allocated: KilowattHours =
                allocation.slices().values().map(|usage| usage.nb_kwh).sum();
            assert_abs_diff_eq!(allocated.0.into_inner(), total, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_carry_over() {
        let profile = test_profile();
        let position = Position { tier: 2, existing: kwh(20.0) };
        let allocation = UsageAllocation::new(&profile, kwh(40.0), position).unwrap();

        assert_eq!(allocation.slices().len(), 2);
        assert_eq!(allocation.slices()[&2].nb_kwh, kwh(30.0));
        assert_eq!(allocation.slices()[&2].cost, Cost::from(2310));
        assert_eq!(allocation.slices()[&3].nb_kwh, kwh(10.0));
        assert_eq!(allocation.slices()[&3].cost, Cost::from(880));
        assert_eq!(allocation.lighting(), Cost::from(80));
        assert_eq!(allocation.cost(), Cost::from(3270));
    }

    #[test]
    fn test_position_mid_tier() {
        let profile = test_profile();
        let allocation = UsageAllocation::new(&profile, kwh(70.0), Position::default()).unwrap();
        assert_eq!(allocation.current_position(), Position { tier: 2, existing: kwh(20.0) });
    }

    #[test]
    fn test_position_at_boundary() {
        let profile = test_profile();
        let allocation = UsageAllocation::new(&profile, kwh(100.0), Position::default()).unwrap();
        assert_eq!(allocation.current_position(), Position { tier: 3, existing: kwh(0.0) });
    }

    #[test]
    fn test_position_after_carry_over() {
        let profile = test_profile();
        let position = Position { tier: 2, existing: kwh(20.0) };
        let allocation = UsageAllocation::new(&profile, kwh(40.0), position).unwrap();
        assert_eq!(allocation.current_position(), Position { tier: 3, existing: kwh(10.0) });
    }

    #[test]
    fn test_position_in_unbounded_tier() {
        let profile = test_profile();
        let allocation = UsageAllocation::new(&profile, kwh(250.0), Position::default()).unwrap();
        assert_eq!(allocation.current_position(), Position { tier: 4, existing: kwh(50.0) });
    }

    #[test]
    fn test_position_without_usage() {
        let profile = test_profile();
        let position = Position { tier: 2, existing: kwh(20.0) };
        let allocation = UsageAllocation::new(&profile, kwh(0.0), position).unwrap();
        assert_eq!(allocation.current_position(), position);
    }

    #[test]
    fn test_inverse() {
        let profile = test_profile();
        let allocation = UsageAllocation::new(&profile, kwh(0.0), Position::default()).unwrap();
        // The first tier costs 3400 in full; the remaining 790 buys
        // 10 kWh of tier 2 at 79 F/kWh.
        assert_eq!(allocation.kwh_for(Cost::from(4190)), kwh(60.0));
    }

    #[test]
    fn test_inverse_reaches_unbounded_tier() {
        let profile = test_profile();
        let allocation = UsageAllocation::new(&profile, kwh(0.0), Position::default()).unwrap();
        // All bounded tiers cost 3400 + 3950 + 9000 = 16350 F in full.
        assert_eq!(allocation.kwh_for(Cost::from(21400)), kwh(250.0));
    }

    #[test]
    fn test_inverse_exact_boundary() {
        let profile = test_profile();
        let allocation = UsageAllocation::new(&profile, kwh(0.0), Position::default()).unwrap();
        // A budget matching the first tier exactly is billed as a partial
        // fill of that tier, which here resolves to its full width.
        assert_eq!(allocation.kwh_for(Cost::from(3400)), kwh(50.0));
    }

    #[test]
    fn test_inverse_with_carry_over() {
        let profile = test_profile();
        let position = Position { tier: 2, existing: kwh(20.0) };
        let allocation = UsageAllocation::new(&profile, kwh(0.0), position).unwrap();
        // Tier 2 settles at its full-width cost of 3950 while only its
        // remaining 30 kWh count; 790 F more buys 790/90 kWh of tier 3.
        let affordable = allocation.kwh_for(Cost::from(4740));
        assert_abs_diff_eq!(affordable.0.into_inner(), 30.0 + 790.0 / 90.0, epsilon = 1e-9);
    }
}
