//! Integration tests for AND postlists over randomly generated posting lists.

use std::collections::BTreeMap;

use postlist::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A random posting list over `1..=max_doc` with weights that are exact in
/// binary floating point.
fn random_postings(rng: &mut StdRng, max_doc: DocId, density: f64) -> Vec<(DocId, Weight)> {
    (1..=max_doc)
        .filter_map(|did| {
            rng.random_bool(density)
                .then(|| (did, f64::from(rng.random_range(0..20u32)) * 0.25))
        })
        .collect()
}

fn leaf(term: &str, entries: &[(DocId, Weight)]) -> BoxedPostList {
    Box::new(VecPostList::from_weighted(term, entries).unwrap())
}

/// Documents in both lists with their combined weight.
fn brute_force_intersection(
    left: &[(DocId, Weight)],
    right: &[(DocId, Weight)],
) -> BTreeMap<DocId, Weight> {
    let right: BTreeMap<DocId, Weight> = right.iter().copied().collect();
    left.iter()
        .filter_map(|(did, w)| right.get(did).map(|rw| (*did, w + rw)))
        .collect()
}

fn drain(pl: &mut dyn PostList) -> Result<Vec<(DocId, Weight)>> {
    let mut out = Vec::new();
    loop {
        pl.advance(0.0)?;
        match pl.current_id() {
            Some(did) => out.push((did, pl.current_weight())),
            None => break,
        }
    }
    Ok(out)
}

#[test]
fn test_documented_example() -> Result<()> {
    let mut and = AndPostList::new(
        Box::new(VecPostList::from_doc_ids("l", &[1, 3, 5, 7, 9])?),
        Box::new(VecPostList::from_doc_ids("r", &[3, 4, 5, 9, 10])?),
        None,
        10,
        true,
    );
    let ids: Vec<DocId> = drain(&mut and)?.into_iter().map(|(did, _)| did).collect();
    assert_eq!(ids, vec![3, 5, 9]);
    Ok(())
}

#[test]
fn test_random_intersections() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let max_doc = rng.random_range(1..300);
        let (left_density, right_density) = (rng.random_range(0.01..0.9), rng.random_range(0.01..0.9));
        let left = random_postings(&mut rng, max_doc, left_density);
        let right = random_postings(&mut rng, max_doc, right_density);
        let expected: Vec<(DocId, Weight)> =
            brute_force_intersection(&left, &right).into_iter().collect();

        let mut and = AndPostList::new(leaf("l", &left), leaf("r", &right), None, max_doc, true);
        assert_eq!(drain(&mut and)?, expected);
        assert!(and.is_exhausted());
    }
    Ok(())
}

#[test]
fn test_child_order_does_not_change_results() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let max_doc = rng.random_range(1..200);
        let a = random_postings(&mut rng, max_doc, 0.4);
        let b = random_postings(&mut rng, max_doc, 0.4);

        let mut ab = AndPostList::new(leaf("a", &a), leaf("b", &b), None, max_doc, true);
        let mut ba = AndPostList::new(leaf("b", &b), leaf("a", &a), None, max_doc, true);
        assert_eq!(ab.term_freq_estimate(), ba.term_freq_estimate());
        assert_eq!(ab.term_freq_lower_bound(), ba.term_freq_lower_bound());
        assert_eq!(ab.term_freq_upper_bound(), ba.term_freq_upper_bound());
        assert_eq!(drain(&mut ab)?, drain(&mut ba)?);
    }
    Ok(())
}

#[test]
fn test_skip_to_lands_on_first_match_at_or_after_target() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let max_doc: DocId = rng.random_range(10..400);
        let left = random_postings(&mut rng, max_doc, 0.5);
        let right = random_postings(&mut rng, max_doc, 0.5);
        let expected: Vec<DocId> = brute_force_intersection(&left, &right)
            .into_keys()
            .collect();

        let mut and = AndPostList::new(leaf("l", &left), leaf("r", &right), None, max_doc, true);
        let mut last: Option<DocId> = None;
        let mut target: DocId = 1;
        while !and.is_exhausted() {
            if rng.random_bool(0.5) {
                and.advance(0.0)?;
                let want = expected
                    .iter()
                    .copied()
                    .find(|&did| last.is_none_or(|l| did > l));
                assert_eq!(and.current_id(), want);
            } else {
                target = target.max(last.unwrap_or(0)) + rng.random_range(0..20);
                and.skip_to(target, 0.0)?;
                let want = match last {
                    Some(l) if target <= l => Some(l),
                    _ => expected.iter().copied().find(|&did| did >= target),
                };
                assert_eq!(and.current_id(), want);
            }
            if let Some(did) = and.current_id() {
                assert!(last.is_none_or(|l| did >= l));
                last = Some(did);
            }
        }

        and.advance(0.0)?;
        and.skip_to(max_doc + 1, 0.0)?;
        assert!(and.is_exhausted());
    }
    Ok(())
}

#[test]
fn test_weight_additivity_and_recompute() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(99);
    let left = random_postings(&mut rng, 100, 0.5);
    let right = random_postings(&mut rng, 100, 0.5);
    let expected = brute_force_intersection(&left, &right);

    let mut and = AndPostList::new(leaf("l", &left), leaf("r", &right), None, 100, false);
    assert_eq!(and.max_weight(), 0.0);
    loop {
        and.advance(0.0)?;
        let Some(did) = and.current_id() else { break };
        assert_eq!(
            and.current_weight(),
            and.left().current_weight() + and.right().current_weight()
        );
        assert_eq!(Some(&and.current_weight()), expected.get(&did));

        let total = and.recompute_max_weight();
        assert_eq!(total, and.left().max_weight() + and.right().max_weight());
        assert_eq!(and.max_weight(), total);
        assert!(total >= and.current_weight());
    }
    Ok(())
}

#[test]
fn test_term_freq_bound_ordering() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let max_doc: DocId = rng.random_range(1..500);
        let (left_density, right_density) = (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0));
        let left = random_postings(&mut rng, max_doc, left_density);
        let right = random_postings(&mut rng, max_doc, right_density);
        let l = VecPostList::from_weighted("l", &left)?;
        let r = VecPostList::from_weighted("r", &right)?;
        let upper = l.term_freq_upper_bound().min(r.term_freq_upper_bound());

        let and = AndPostList::new(Box::new(l), Box::new(r), None, max_doc, true);
        let lower = and.term_freq_lower_bound();
        let est = and.term_freq_estimate();
        assert!(lower <= est, "{lower} > {est}");
        assert!(est <= and.term_freq_upper_bound());
        assert_eq!(and.term_freq_upper_bound(), upper);

        let actual = brute_force_intersection(&left, &right).len() as DocCount;
        assert!(lower <= actual && actual <= upper);
    }
    Ok(())
}

#[test]
fn test_nested_and_matches_three_way_intersection() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let max_doc = rng.random_range(1..300);
        let a = random_postings(&mut rng, max_doc, 0.6);
        let b = random_postings(&mut rng, max_doc, 0.6);
        let c = random_postings(&mut rng, max_doc, 0.6);

        let ab: Vec<(DocId, Weight)> = brute_force_intersection(&a, &b).into_iter().collect();
        let expected: Vec<(DocId, Weight)> =
            brute_force_intersection(&ab, &c).into_iter().collect();

        let mut tree = and_all(vec![leaf("a", &a), leaf("b", &b), leaf("c", &c)], None, max_doc)?;
        let got = drain(tree.as_mut())?;
        assert_eq!(
            got.iter().map(|(did, _)| *did).collect::<Vec<_>>(),
            expected.iter().map(|(did, _)| *did).collect::<Vec<_>>()
        );
        for ((_, got_w), (_, want_w)) in got.iter().zip(&expected) {
            assert_eq!(got_w, want_w);
        }
    }
    Ok(())
}

#[test]
fn test_threshold_never_drops_qualifying_decimal_weights() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0xdeca1);
    for _ in 0..300 {
        let max_doc: DocId = rng.random_range(1..150);
        let decimal = |rng: &mut StdRng| -> Vec<(DocId, Weight)> {
            (1..=max_doc)
                .filter_map(|did| {
                    rng.random_bool(0.7)
                        .then(|| (did, f64::from(rng.random_range(0..30u32)) * 0.1))
                })
                .collect()
        };
        let left = decimal(&mut rng);
        let right = decimal(&mut rng);
        let expected = brute_force_intersection(&left, &right);
        let Some(&w_min) = expected.values().nth(rng.random_range(0..expected.len().max(1))) else {
            continue;
        };

        let mut and = AndPostList::new(leaf("l", &left), leaf("r", &right), None, max_doc, true);
        let mut seen = Vec::new();
        loop {
            and.advance(w_min)?;
            match and.current_id() {
                Some(did) => seen.push(did),
                None => break,
            }
        }
        for (did, weight) in &expected {
            if *weight >= w_min {
                assert!(seen.contains(did), "doc {did} with weight {weight} >= {w_min} dropped");
            }
        }
    }
    Ok(())
}
