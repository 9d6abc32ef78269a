use chrono::NaiveDate;

use super::synthetic_ohlcv;
use crate::error::PipelineError;
use crate::util::pre_processor::{date_vector, split_by_date_range};

fn date(raw: &str) -> NaiveDate {
    raw.parse().unwrap()
}

#[test]
fn partitions_are_disjoint_and_ordered() {
    let df = synthetic_ohlcv(120);
    let (train, test) = split_by_date_range(
        &df,
        date("2020-01-01"),
        date("2020-02-29"),
        date("2020-03-01"),
        date("2020-04-30"),
    )
    .unwrap();

    assert!(train.height() > 0 && test.height() > 0);
    assert_eq!(train.height() + test.height(), 120);

    let train_dates = date_vector(&train).unwrap();
    let test_dates = date_vector(&test).unwrap();
    assert!(train_dates.iter().max().unwrap() < test_dates.iter().min().unwrap());
    assert!(!test_dates.iter().any(|d| train_dates.contains(d)));
}

#[test]
fn empty_partition_is_rejected() {
    let df = synthetic_ohlcv(60);
    let result = split_by_date_range(
        &df,
        date("2019-01-01"),
        date("2019-06-30"),
        date("2020-01-01"),
        date("2020-02-01"),
    );
    assert!(matches!(result, Err(PipelineError::EmptyPartition(_))));
}

#[test]
fn overlapping_boundaries_are_rejected() {
    let df = synthetic_ohlcv(60);
    let result = split_by_date_range(
        &df,
        date("2020-01-01"),
        date("2020-02-01"),
        date("2020-02-01"),
        date("2020-02-20"),
    );
    assert!(matches!(result, Err(PipelineError::Data(_))));
}
