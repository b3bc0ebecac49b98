use super::*;

fn ids(n: usize) -> Vec<usize> {
    (0..n).collect()
}

fn sizes<T>(pages: &[Page<T>]) -> Vec<usize> {
    pages.iter().map(|p| p.images.len()).collect()
}

#[test]
fn nine_images_on_four_slots_grow_the_last_page() {
    let pages = partition(&ids(9), Grid::new(4).unwrap(), false).unwrap();
    assert_eq!(sizes(&pages), vec![4, 5]);
    assert_eq!(pages[0].images, vec![0, 1, 2, 3]);
    assert_eq!(pages[1].images, vec![4, 5, 6, 7, 8]);
    assert_eq!(pages[0].index, 0);
    assert_eq!(pages[1].index, 1);
}

#[test]
fn even_split_gives_full_pages() {
    let pages = partition(&ids(12), Grid::new(4).unwrap(), false).unwrap();
    assert_eq!(sizes(&pages), vec![4, 4, 4]);
}

#[test]
fn page_counts_hold_for_all_even_grids() {
    for g in (2..=10).step_by(2) {
        let grid = Grid::new(g).unwrap();
        for n in g..(4 * g + 3) {
            let pages = partition(&ids(n), grid, false).unwrap();
            assert_eq!(pages.len(), n / g, "g={g} n={n}");

            let (last, full) = pages.split_last().unwrap();
            assert!(full.iter().all(|p| p.images.len() == g), "g={g} n={n}");
            assert_eq!(last.images.len(), g + n % g, "g={g} n={n}");

            let flat: Vec<usize> = pages.iter().flat_map(|p| p.images.clone()).collect();
            assert_eq!(flat, ids(n), "g={g} n={n}");
            for (i, p) in pages.iter().enumerate() {
                assert_eq!(p.index, i);
            }
        }
    }
}

#[test]
fn odd_tile_request_partitions_by_next_even() {
    let pages = partition(&ids(8), Grid::new(3).unwrap(), false).unwrap();
    assert_eq!(sizes(&pages), vec![4, 4]);
}

#[test]
fn reverse_mirrors_page_and_in_page_order() {
    let pages = partition(&ids(8), Grid::new(4).unwrap(), true).unwrap();
    assert_eq!(pages[0].images, vec![7, 6, 5, 4]);
    assert_eq!(pages[1].images, vec![3, 2, 1, 0]);
}

#[test]
fn too_few_images_is_a_validation_error() {
    let err = partition(&ids(3), Grid::new(4).unwrap(), false).unwrap_err();
    assert!(matches!(err, TilerError::Validation(_)));
    assert!(partition::<usize>(&[], Grid::new(2).unwrap(), false).is_err());
}

#[test]
fn paths_are_the_default_payload() {
    let inputs: Vec<PathBuf> = ["a.jpg", "b.png", "c.webp", "d.jpg"]
        .iter()
        .map(PathBuf::from)
        .collect();
    let pages: Vec<Page> = partition(&inputs, Grid::new(4).unwrap(), false).unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].images, inputs);
}
