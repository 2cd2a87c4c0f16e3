//! Literal end-to-end scenarios: fixed inputs with fixed expected outputs.

#[test]
fn simple0() {
    let mut v = vec![60, 50, 10, 40, 80, 20, 30, 70, 10, 90];
    timsort::sort(&mut v);
    assert_eq!(v, vec![10, 10, 20, 30, 40, 50, 60, 70, 80, 90]);
}

#[test]
fn historical_regression_0_to_34() {
    // A long-standing regression case for gallop-probe bounds checking: this permutation of
    // 0..=34 previously tripped an off-by-one in some Timsort ports' gallop search.
    let mut v = vec![
        15, 7, 16, 20, 25, 28, 13, 27, 34, 24, 19, 1, 6, 30, 32, 29, 10, 9, 3, 31, 21, 26, 8, 2,
        22, 14, 4, 12, 5, 0, 23, 33, 11, 17, 18,
    ];
    timsort::sort(&mut v);
    let expected: Vec<i32> = (0..=34).collect();
    assert_eq!(v, expected);
}

#[test]
fn stability_by_first_field() {
    let mut v = vec![(3, 'a'), (1, 'b'), (3, 'c'), (1, 'd'), (2, 'e')];
    timsort::sort_by_key(&mut v, |p| p.0);
    assert_eq!(
        v,
        vec![(1, 'b'), (1, 'd'), (2, 'e'), (3, 'a'), (3, 'c')]
    );
}

#[test]
fn projection_negate_reverses_output() {
    let mut v: Vec<i32> = (0..128).collect();
    timsort::sort_by_key(&mut v, |&i| -i);
    let expected: Vec<i32> = (0..128).rev().collect();
    assert_eq!(v, expected);
}

#[test]
fn merge_two_already_sorted_halves() {
    let mut v = vec![10, 10, 20, 30, 40, 50, 60, 70, 80, 90];
    timsort::merge(&mut v, 6);
    assert_eq!(v, vec![10, 10, 20, 30, 40, 50, 60, 70, 80, 90]);
}

#[test]
fn sorting_the_reverse_of_sorted_preserves_duplicate_order() {
    // Sorted originals, tagged with their original index.
    let sorted: Vec<(i32, usize)> = vec![10, 10, 20, 30, 40, 50, 60, 70, 80, 90]
        .into_iter()
        .enumerate()
        .map(|(i, x)| (x, i))
        .collect();

    // `sort`'s input is the reverse of that; after reversal the two `10`s appear with the
    // originally-later one (index 1) first.
    let mut v: Vec<(i32, usize)> = sorted.iter().copied().rev().collect();
    assert_eq!(v[8], (10, 1));
    assert_eq!(v[9], (10, 0));

    timsort::sort_by_key(&mut v, |p| p.0);

    assert_eq!(v[0], (10, 1));
    assert_eq!(v[1], (10, 0));
    assert_eq!(
        v.iter().map(|p| p.0).collect::<Vec<_>>(),
        vec![10, 10, 20, 30, 40, 50, 60, 70, 80, 90]
    );
}
