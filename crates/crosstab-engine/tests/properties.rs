//! Layout invariants that must hold for arbitrary inputs.

use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use proptest::prelude::{any, prop, proptest, prop_assert, prop_assert_eq};

use crosstab_engine::{Dataset, Denominator, Frequency, TableBuilder};

const SEX: [&str; 2] = ["M", "F"];
const ARM: [&str; 3] = ["A", "B", "C"];
const TREATED: [&str; 2] = ["Yes", "No"];

fn dataset(rows: &[(usize, usize, usize)]) -> Dataset {
    let sex: Vec<&str> = rows.iter().map(|(s, _, _)| SEX[*s]).collect();
    let arm: Vec<&str> = rows.iter().map(|(_, a, _)| ARM[*a]).collect();
    let treated: Vec<&str> = rows.iter().map(|(_, _, t)| TREATED[*t]).collect();
    let cols: Vec<Column> = vec![
        Series::new("sex".into(), sex).into(),
        Series::new("arm".into(), arm).into(),
        Series::new("treated".into(), treated).into(),
    ];
    Dataset::new(DataFrame::new(cols).unwrap())
        .with_levels("sex", SEX)
        .with_levels("arm", ARM)
        .with_levels("treated", TREATED)
}

proptest! {
    #[test]
    fn data_block_height_equals_total_level_count(
        rows in prop::collection::vec((0..2usize, 0..3usize, 0..2usize), 0..40),
        n_funcs in 0..3usize,
        with_outcome in any::<bool>(),
        marginal in any::<bool>(),
    ) {
        let data = dataset(&rows);
        let mut builder = TableBuilder::new()
            .independent("Sex", "sex")
            .independent("Arm", "arm")
            .marginal(marginal);
        if with_outcome {
            builder = builder.outcome("Treated", "treated");
        }
        for _ in 0..n_funcs {
            builder = builder.crosstab(Frequency::with_proportion(Denominator::Column));
        }
        let table = builder.build(&data).unwrap();

        // 2 sex levels + 3 arm levels, whatever else is configured.
        prop_assert_eq!(table.data_rows().len(), 5);
        prop_assert!(table.is_rectangular());

        let outcome_cols = if with_outcome { TREATED.len() } else { 0 };
        let total_cols = usize::from(n_funcs > 0 && (marginal || !with_outcome));
        prop_assert_eq!(table.n_cols(), 1 + outcome_cols + total_cols);
    }
}
