use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use tschart::core::{AlignedData, Band, Series, Threshold, destack_value, stack};

fn aligned(columns: Vec<Vec<Option<f64>>>) -> AlignedData {
    let len = columns.first().map_or(0, Vec::len);
    AlignedData {
        times: (0..len).map(|index| index as f64 * 60.0).collect(),
        columns,
    }
}

#[test]
fn omit_passes_columns_through() {
    let data = aligned(vec![vec![Some(1.0), None], vec![Some(2.0), Some(3.0)]]);
    let stacked = stack(&data, true);
    assert_eq!(stacked.data, data);
    assert!(stacked.bands.is_empty());
}

#[test]
fn two_layers_accumulate_per_index() {
    let data = aligned(vec![vec![Some(1.0), Some(2.0)], vec![Some(3.0), None]]);
    let stacked = stack(&data, false);
    assert_eq!(
        stacked.data.columns,
        vec![vec![Some(1.0), Some(2.0)], vec![Some(4.0), Some(2.0)]]
    );
    assert_eq!(stacked.bands, vec![Band::between(1, 0)]);
    assert_eq!(stacked.data.times, data.times);
}

#[test]
fn destacking_recovers_layer_contributions() {
    let data = aligned(vec![
        vec![Some(5.0), None, Some(1.5)],
        vec![None, Some(2.0), Some(2.5)],
        vec![Some(1.0), Some(1.0), Some(1.0)],
    ]);
    let stacked = stack(&data, false);
    assert_eq!(destack_value(&stacked.data, 0, 0), Some(5.0));
    assert_eq!(destack_value(&stacked.data, 1, 0), Some(0.0));
    assert_eq!(destack_value(&stacked.data, 1, 1), Some(2.0));
    assert_eq!(destack_value(&stacked.data, 2, 2), Some(1.0));
    assert_eq!(destack_value(&stacked.data, 3, 0), None);
}

#[test]
fn thresholds_append_after_stacked_series() {
    let data = AlignedData::from_series(
        vec![0.0, 60.0],
        &[
            Series::new("a", vec![Some(1.0), Some(2.0)]),
            Series::new("b", vec![Some(1.0), Some(1.0)]),
        ],
    )
    .expect("aligned");
    let mut stacked = stack(&data, false);
    let first_columns =
        stacked.append_thresholds(&[Threshold::line(80.0), Threshold::range(10.0, 20.0)]);

    assert_eq!(first_columns, vec![2, 3]);
    assert_eq!(stacked.data.columns.len(), 5);
    assert_eq!(stacked.data.columns[2], vec![Some(80.0); 2]);
    assert_eq!(stacked.data.columns[3], vec![Some(10.0); 2]);
    assert_eq!(stacked.data.columns[4], vec![Some(20.0); 2]);
    // threshold columns never join the stack
    assert_eq!(stacked.bands, vec![Band::between(1, 0)]);
}

#[test]
fn empty_series_pad_with_absent_samples() {
    let mut empty = Series::new("idle", Vec::new());
    empty.is_empty = true;
    let data = AlignedData::from_series(
        vec![0.0, 60.0, 120.0],
        &[Series::new("busy", vec![Some(1.0), Some(2.0), Some(3.0)]), empty],
    )
    .expect("aligned");
    let stacked = stack(&data, false);
    assert_eq!(stacked.data.columns[1], vec![Some(1.0), Some(2.0), Some(3.0)]);
}

fn column_strategy(len: usize) -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(prop::option::of(-1e6f64..1e6), len)
}

proptest! {
    #[test]
    fn destack_of_stack_is_identity_with_absent_as_zero(
        columns in (1usize..20, 1usize..6).prop_flat_map(|(len, count)| {
            prop::collection::vec(column_strategy(len), count)
        })
    ) {
        let data = aligned(columns);
        let stacked = stack(&data, false);
        for (column, values) in data.columns.iter().enumerate() {
            for (index, value) in values.iter().enumerate() {
                let recovered = destack_value(&stacked.data, column, index)
                    .expect("stacked values are always present");
                assert_abs_diff_eq!(recovered, value.unwrap_or(0.0), epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn stacking_yields_one_band_per_adjacent_pair(count in 0usize..10) {
        let data = aligned(vec![vec![Some(1.0); 3]; count]);
        let stacked = stack(&data, false);
        prop_assert_eq!(stacked.bands.len(), count.saturating_sub(1));
        prop_assert!(stacked.bands.iter().all(|band| band.upper == band.lower + 1));
    }
}
