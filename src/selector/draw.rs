use crate::model::{Entry, LocationGroups, SpinSnapshot, WinnerSet};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Winners kept per location unless configured otherwise
pub const DEFAULT_MAX_WINNERS: usize = 20;

/// Pick one entry per location, uniformly and with replacement
pub fn spin<R: Rng + ?Sized>(groups: &LocationGroups, rng: &mut R) -> SpinSnapshot {
    let mut snapshot = SpinSnapshot::new();
    for (location, entries) in groups.iter() {
        if let Some(entry) = entries.choose(rng) {
            snapshot.insert(location, entry.clone());
        }
    }
    snapshot
}

/// Draw at most `max_winners` entries per location.
///
/// Each group is shuffled uniformly and walked in order. An identifier can win
/// only once across the whole draw, so a participant listed under several
/// locations wins in whichever location reaches them first. Every location of
/// `groups` is present in the result, possibly with no winners.
pub fn select_winners<R: Rng + ?Sized>(
    groups: &LocationGroups,
    max_winners: usize,
    rng: &mut R,
) -> WinnerSet {
    let mut winners = WinnerSet::new();
    let mut used: HashSet<&str> = HashSet::new();

    for (location, entries) in groups.iter() {
        let mut shuffled: Vec<&Entry> = entries.iter().collect();
        shuffled.shuffle(rng);

        let mut picked = Vec::with_capacity(max_winners.min(shuffled.len()));
        for entry in shuffled {
            if picked.len() >= max_winners {
                break;
            }
            if used.insert(entry.identifier.as_str()) {
                picked.push(entry.clone());
            }
        }

        log::debug!(
            "{}: {} winners from {} entries",
            location,
            picked.len(),
            entries.len()
        );
        winners.insert(location, picked);
    }

    winners
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::group;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn entry(id: impl ToString, location: &str) -> Entry {
        Entry::new()
            .with_identifier(id.to_string())
            .with_name(format!("Person {}", id.to_string()))
            .with_location(location)
    }

    fn sample_groups() -> LocationGroups {
        let mut entries: Vec<Entry> = (1..=3).map(|i| entry(i, "A")).collect();
        entries.extend((101..=125).map(|i| entry(i, "B")));
        group(entries)
    }

    fn assert_unique_identifiers(winners: &WinnerSet) {
        let mut seen = HashSet::new();
        for (_, list) in winners.iter() {
            for winner in list {
                assert!(seen.insert(winner.identifier.clone()), "duplicate winner {}", winner.identifier);
            }
        }
    }

    #[test]
    fn test_small_group_takes_everyone_large_group_is_capped() {
        let groups = sample_groups();
        let mut rng = StdRng::seed_from_u64(7);
        let winners = select_winners(&groups, DEFAULT_MAX_WINNERS, &mut rng);

        let a = winners.get("A").unwrap();
        let b = winners.get("B").unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 20);

        let mut a_ids: Vec<&str> = a.iter().map(|e| e.identifier.as_str()).collect();
        a_ids.sort();
        assert_eq!(a_ids, vec!["1", "2", "3"]);

        assert!(b.iter().all(|e| {
            let n: u32 = e.identifier.parse().unwrap();
            (101..=125).contains(&n)
        }));
        assert_unique_identifiers(&winners);
    }

    #[test]
    fn test_winners_come_from_their_own_location() {
        let groups = sample_groups();
        for seed in 0..20 {
            let winners = select_winners(&groups, DEFAULT_MAX_WINNERS, &mut StdRng::seed_from_u64(seed));
            for (location, list) in winners.iter() {
                let pool = groups.get(location).unwrap();
                assert!(list.iter().all(|w| pool.contains(w)));
            }
        }
    }

    #[test]
    fn test_shared_identifier_wins_at_most_once() {
        let groups = group(vec![
            entry(42, "A"),
            entry(1, "A"),
            entry(42, "B"),
            entry(2, "B"),
        ]);

        for seed in 0..50 {
            let winners = select_winners(&groups, DEFAULT_MAX_WINNERS, &mut StdRng::seed_from_u64(seed));
            let count = winners
                .iter()
                .flat_map(|(_, list)| list.iter())
                .filter(|e| e.identifier == "42")
                .count();
            assert!(count <= 1);
            assert_unique_identifiers(&winners);
        }
    }

    #[test]
    fn test_first_location_visited_claims_shared_identifier() {
        // "A" is walked first and has a single entry, so it always takes "42".
        let groups = group(vec![entry(42, "A"), entry(42, "B"), entry(7, "B")]);
        let winners = select_winners(&groups, DEFAULT_MAX_WINNERS, &mut StdRng::seed_from_u64(3));

        assert_eq!(winners.get("A").unwrap().len(), 1);
        let b: Vec<&str> = winners.get("B").unwrap().iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(b, vec!["7"]);
    }

    #[test]
    fn test_duplicate_within_location() {
        let groups = group(vec![entry(5, "A"), entry(5, "A"), entry(6, "A")]);
        let winners = select_winners(&groups, DEFAULT_MAX_WINNERS, &mut StdRng::seed_from_u64(11));
        assert_eq!(winners.get("A").unwrap().len(), 2);
        assert_unique_identifiers(&winners);
    }

    #[test]
    fn test_exhausted_location_is_still_listed() {
        let groups = group(vec![entry(1, "A"), entry(1, "B")]);
        let winners = select_winners(&groups, DEFAULT_MAX_WINNERS, &mut StdRng::seed_from_u64(0));
        assert_eq!(winners.len(), 2);
        assert!(winners.get("B").unwrap().is_empty());
    }

    #[test]
    fn test_custom_cap() {
        let groups = sample_groups();
        let winners = select_winners(&groups, 2, &mut StdRng::seed_from_u64(1));
        assert!(winners.iter().all(|(_, list)| list.len() <= 2));
        assert_eq!(winners.get("B").unwrap().len(), 2);
    }

    #[test]
    fn test_same_seed_same_winners() {
        let groups = sample_groups();
        let first = select_winners(&groups, DEFAULT_MAX_WINNERS, &mut StdRng::seed_from_u64(99));
        let second = select_winners(&groups, DEFAULT_MAX_WINNERS, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn test_shuffle_is_roughly_uniform() {
        let groups = group(vec![entry(1, "A"), entry(2, "A"), entry(3, "A")]);
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts: HashMap<Vec<String>, usize> = HashMap::new();

        for _ in 0..6000 {
            let winners = select_winners(&groups, DEFAULT_MAX_WINNERS, &mut rng);
            let order = winners.get("A").unwrap().iter().map(|e| e.identifier.clone()).collect();
            *counts.entry(order).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 6);
        for count in counts.values() {
            assert!((850..=1150).contains(count), "permutation count {} out of range", count);
        }
    }

    #[test]
    fn test_spin_samples_each_location_from_its_group() {
        let groups = sample_groups();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..50 {
            let snapshot = spin(&groups, &mut rng);
            assert_eq!(snapshot.len(), 2);
            for (location, shown) in snapshot.iter() {
                assert_eq!(shown.location, location);
                assert!(groups.get(location).unwrap().contains(shown));
            }
        }
    }

    #[test]
    fn test_spin_on_empty_groups() {
        let snapshot = spin(&LocationGroups::new(), &mut StdRng::seed_from_u64(0));
        assert!(snapshot.is_empty());
    }
}
