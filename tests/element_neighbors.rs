//! Derivation of element neighbor tables across conforming, non-conforming,
//! periodic, and orientation-reversed block interfaces.

use std::collections::BTreeMap;

use dg_domain::mortar::{mortar_size, MortarSize};
use dg_domain::prelude::*;

fn seg(level: u8, index: u64) -> SegmentId {
    SegmentId::new(level, index).unwrap()
}

fn two_block_strip() -> Domain<ProductOfAffineMaps<2>, 2> {
    Rectilinear::<2>::new(
        [vec![0.0, 1.0, 2.0], vec![0.0, 1.0]],
        [false, false],
        [0, 0],
        vec![],
        vec![],
    )
    .unwrap()
    .create_domain()
    .unwrap()
}

#[test]
fn coarse_face_spans_both_fine_neighbors() {
    let domain = two_block_strip();
    // Block 0 is refined once per axis, block 1 twice along the interface
    // tangent, so each coarse face element abuts two fine elements.
    let refinements = [[1, 1], [1, 2]];
    let elements = create_initial_elements(&domain, &refinements).unwrap();
    assert_eq!(elements.len(), 4 + 8);

    let upper = Direction::<2>::upper(0).unwrap();
    let coarse = ElementId::new(0, [seg(1, 1), seg(1, 0)]);
    let neighbors = &elements[&coarse].neighbors()[&upper];
    assert!(neighbors.orientation().is_aligned());
    let expected = [
        ElementId::new(1, [seg(1, 0), seg(2, 0)]),
        ElementId::new(1, [seg(1, 0), seg(2, 1)]),
    ];
    assert_eq!(neighbors.ids().iter().copied().collect::<Vec<_>>(), expected);

    let sizes: Vec<Vec<MortarSize>> = expected
        .iter()
        .map(|fine| mortar_size(&coarse, fine, 0, neighbors.orientation()))
        .collect();
    assert_eq!(
        sizes,
        vec![vec![MortarSize::LowerHalf], vec![MortarSize::UpperHalf]]
    );
}

#[test]
fn fine_face_sees_one_coarse_neighbor_at_full_size() {
    let domain = two_block_strip();
    let refinements = [[1, 1], [1, 2]];
    let elements = create_initial_elements(&domain, &refinements).unwrap();

    let lower = Direction::<2>::lower(0).unwrap();
    let fine = ElementId::new(1, [seg(1, 0), seg(2, 3)]);
    let neighbors = &elements[&fine].neighbors()[&lower];
    assert_eq!(neighbors.len(), 1);
    let coarse = *neighbors.ids().iter().next().unwrap();
    assert_eq!(coarse, ElementId::new(0, [seg(1, 1), seg(1, 1)]));
    assert_eq!(
        mortar_size(&fine, &coarse, 0, neighbors.orientation()),
        vec![MortarSize::Full]
    );
}

#[test]
fn reversed_interface_matches_upper_faces() {
    // Both blocks present their upper face to the interface; the
    // axis-reversing orientation is self-inverse.
    let flip = OrientationMap::new([Direction::<1>::lower(0).unwrap()]).unwrap();
    let upper = Direction::<1>::upper(0).unwrap();
    let map = ProductOfAffineMaps::from_bounds([0.0], [1.0]);
    let domain = Domain::new(vec![
        Block::new(map, 0, BTreeMap::from([(upper, BlockNeighbor::new(1, flip))])),
        Block::new(map, 1, BTreeMap::from([(upper, BlockNeighbor::new(0, flip))])),
    ])
    .unwrap();
    let elements = create_initial_elements(&domain, &[[1], [1]]).unwrap();

    let host = ElementId::new(0, [seg(1, 1)]);
    let neighbors = &elements[&host].neighbors()[&upper];
    assert_eq!(*neighbors.orientation(), flip);
    // The abutting neighbor is the one touching the neighbor block's own
    // upper face.
    assert_eq!(
        neighbors.ids().iter().copied().collect::<Vec<_>>(),
        [ElementId::new(1, [seg(1, 1)])]
    );
}

#[test]
fn periodic_interval_wraps_the_extreme_elements() {
    let domain = Interval::new(0.0, 1.0, 2, true)
        .unwrap()
        .create_domain()
        .unwrap();
    let elements = create_initial_elements(&domain, &[[2]]).unwrap();
    assert_eq!(elements.len(), 4);

    let lower = Direction::<1>::lower(0).unwrap();
    let upper = Direction::<1>::upper(0).unwrap();
    let first = ElementId::new(0, [seg(2, 0)]);
    let last = ElementId::new(0, [seg(2, 3)]);

    // Interior pairing on one side, periodic wraparound on the other.
    assert_eq!(
        elements[&first].neighbors()[&upper].ids().iter().copied().collect::<Vec<_>>(),
        [ElementId::new(0, [seg(2, 1)])]
    );
    assert_eq!(
        elements[&first].neighbors()[&lower].ids().iter().copied().collect::<Vec<_>>(),
        [last]
    );
    assert_eq!(
        elements[&last].neighbors()[&upper].ids().iter().copied().collect::<Vec<_>>(),
        [first]
    );
    assert!(elements.values().all(|element| element.external_boundaries().is_empty()));
}

#[test]
fn open_boundaries_are_inherited_by_face_elements() {
    let domain = Interval::new(0.0, 1.0, 1, false)
        .unwrap()
        .create_domain()
        .unwrap();
    let elements = create_initial_elements(&domain, &[[1]]).unwrap();

    let lower = Direction::<1>::lower(0).unwrap();
    let upper = Direction::<1>::upper(0).unwrap();
    assert!(elements[&ElementId::new(0, [seg(1, 0)])]
        .external_boundaries()
        .contains(&lower));
    assert!(elements[&ElementId::new(0, [seg(1, 1)])]
        .external_boundaries()
        .contains(&upper));
}

#[test]
fn derivation_is_deterministic() {
    let domain = two_block_strip();
    let refinements = [[1, 1], [1, 2]];
    let first = create_initial_elements(&domain, &refinements).unwrap();
    let second = create_initial_elements(&domain, &refinements).unwrap();
    assert_eq!(first, second);
}
