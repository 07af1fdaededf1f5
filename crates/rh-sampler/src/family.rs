//! Occurrence gating and event family expansion.

use rh_core::{FamilyBounds, Occurrence};
use rh_rng::{DeterministicRng, SamplingContext};

/// How many instances of an event a pass produces, and on which streams.
#[derive(Debug, Clone)]
pub enum Expansion {
    /// The occurrence trial failed; no instances
    Skipped,
    /// One instance, sampled on the pass stream
    Single,
    /// Family members, each with its own forked stream
    Family(Vec<DeterministicRng>),
}

impl Expansion {
    /// Number of instances.
    #[must_use]
    pub fn instances_count(&self) -> u64 {
        match self {
            Expansion::Skipped => 0,
            Expansion::Single => 1,
            Expansion::Family(members) => members.len() as u64,
        }
    }
}

/// Decides how often an event occurs in a pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFamilyExpander;

impl EventFamilyExpander {
    /// Expand one event occurrence.
    ///
    /// Draws, in order and only when applicable: the occurrence trial, the
    /// family size, and one sub-seed per family member.
    pub fn expand(occurrence: &Occurrence, ctx: &mut SamplingContext) -> Expansion {
        if let Some(probability) = occurrence.probability {
            debug_assert!((0.0..=1.0).contains(&probability));
            if !ctx.rng().gen_bool(probability) {
                return Expansion::Skipped;
            }
        }

        match occurrence.family {
            Some(bounds) => {
                let members_count = Self::family_size(bounds, ctx.rng());
                Expansion::Family((0..members_count).map(|_| ctx.fork_rng()).collect())
            }
            None => Expansion::Single,
        }
    }

    /// Draw a family size from `[min, max)`.
    ///
    /// Degenerate bounds (`min == max`) always yield `min` without a draw.
    /// The draw is integral, so it is exact for any `u64` bounds.
    pub fn family_size(bounds: FamilyBounds, rng: &mut DeterministicRng) -> u64 {
        debug_assert!(bounds.min <= bounds.max, "Family bounds must be ordered");

        if bounds.is_degenerate() {
            return bounds.min;
        }

        rng.gen_range(bounds.min..bounds.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(min: u64, max: u64) -> Occurrence {
        Occurrence {
            probability: None,
            family: Some(FamilyBounds { min, max }),
        }
    }

    #[test]
    fn test_plain_event_is_single() {
        let mut ctx = SamplingContext::new(1);
        let expansion = EventFamilyExpander::expand(&Occurrence::default(), &mut ctx);
        assert!(matches!(expansion, Expansion::Single));
        assert_eq!(ctx.stats().rng_calls, 0);
    }

    #[test]
    fn test_family_size_three_to_four_is_three() {
        for seed in 0..100 {
            let mut ctx = SamplingContext::new(seed);
            let expansion = EventFamilyExpander::expand(&family(3, 4), &mut ctx);
            assert_eq!(expansion.instances_count(), 3);
        }
    }

    #[test]
    fn test_degenerate_bounds_yield_min() {
        let mut rng = DeterministicRng::new(4);
        assert_eq!(
            EventFamilyExpander::family_size(FamilyBounds { min: 2, max: 2 }, &mut rng),
            2
        );
        assert_eq!(rng.calls_count(), 0);
    }

    #[test]
    fn test_family_size_covers_range() {
        let bounds = FamilyBounds { min: 1, max: 4 };
        let mut rng = DeterministicRng::new(21);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let size = EventFamilyExpander::family_size(bounds, &mut rng);
            assert!(bounds.admits(size));
            seen[size as usize] = true;
        }
        assert_eq!(seen, [false, true, true, true]);
    }

    #[test]
    fn test_members_get_distinct_streams() {
        let mut ctx = SamplingContext::new(9);
        let Expansion::Family(members) = EventFamilyExpander::expand(&family(3, 4), &mut ctx)
        else {
            panic!("expected a family");
        };

        assert_eq!(ctx.stats().forks_count, 3);
        assert_ne!(members[0].seed(), members[1].seed());
        assert_ne!(members[1].seed(), members[2].seed());

        let draws: Vec<u64> = members.into_iter().map(|mut m| m.gen::<u64>()).collect();
        assert_ne!(draws[0], draws[1]);
        assert_ne!(draws[0], draws[2]);
        assert_ne!(draws[1], draws[2]);
    }

    #[test]
    fn test_family_size_exact_at_large_bounds() {
        // Adjacent bounds far beyond f64 integer precision.
        let bounds = FamilyBounds {
            min: (1 << 60) + 1,
            max: (1 << 60) + 2,
        };
        let mut rng = DeterministicRng::new(6);
        assert_eq!(EventFamilyExpander::family_size(bounds, &mut rng), bounds.min);
    }

    #[test]
    fn test_probability_gate() {
        let never = Occurrence {
            probability: Some(0.0),
            family: None,
        };
        let always = Occurrence {
            probability: Some(1.0),
            ..family(2, 2)
        };

        for seed in 0..50 {
            let mut ctx = SamplingContext::new(seed);
            assert!(matches!(
                EventFamilyExpander::expand(&never, &mut ctx),
                Expansion::Skipped
            ));
            assert_eq!(EventFamilyExpander::expand(&always, &mut ctx).instances_count(), 2);
        }
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let occurrence = Occurrence {
            probability: Some(0.5),
            family: Some(FamilyBounds { min: 0, max: 10 }),
        };
        let seeds = |seed: u64| -> Vec<u64> {
            let mut ctx = SamplingContext::new(seed);
            match EventFamilyExpander::expand(&occurrence, &mut ctx) {
                Expansion::Family(members) => members.iter().map(|m| m.seed()).collect(),
                _ => Vec::new(),
            }
        };
        assert_eq!(seeds(77), seeds(77));
    }
}
