use crate::config::RowLabels;
use crate::schema::{LiquiditySnapshot, Statement};
use crate::utils::resolve_row;
use log::warn;

/// Current ratio for one period. Zero liabilities give `f64::INFINITY`.
pub fn current_ratio(assets: f64, liabilities: f64) -> f64 {
    if liabilities == 0.0 {
        f64::INFINITY
    } else {
        assets / liabilities
    }
}

/// Computes the current ratio for both periods.
///
/// A missing row is not an error: the snapshot comes back with
/// `resolvable == false` and the rest of the pipeline carries on.
pub fn extract_liquidity(statement: &Statement, labels: &RowLabels) -> LiquiditySnapshot {
    let assets = resolve_row(statement, &labels.current_assets);
    let liabilities = resolve_row(statement, &labels.current_liabilities);

    match (assets, liabilities) {
        (Some(assets), Some(liabilities)) => LiquiditySnapshot::resolved(
            current_ratio(assets.prior_value, liabilities.prior_value),
            current_ratio(assets.current_value, liabilities.current_value),
        ),
        (assets, liabilities) => {
            let mut missing = Vec::new();
            if assets.is_none() {
                missing.push(labels.current_assets.clone());
            }
            if liabilities.is_none() {
                missing.push(labels.current_liabilities.clone());
            }
            warn!(
                "Current ratio not computed, missing row(s): {}",
                missing.join(", ")
            );
            LiquiditySnapshot::unresolved(missing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LineItem;

    #[test]
    fn test_zero_liabilities_is_unbounded() {
        let statement = Statement::new(vec![
            LineItem::new("CURRENT ASSETS", 50.0, 80.0),
            LineItem::new("CURRENT LIABILITIES", 0.0, 20.0),
        ]);

        let snapshot = extract_liquidity(&statement, &RowLabels::default());

        assert!(snapshot.resolvable);
        assert_eq!(snapshot.prior_ratio, f64::INFINITY);
        assert!((snapshot.current_ratio - 4.0).abs() < 1e-12);
        assert_eq!(snapshot.delta(), None);
    }

    #[test]
    fn test_ratio_and_delta() {
        let statement = Statement::new(vec![
            LineItem::new("I. Current assets", 300.0, 360.0),
            LineItem::new("II. Current liabilities", 200.0, 120.0),
        ]);

        let snapshot = extract_liquidity(&statement, &RowLabels::default());

        assert!((snapshot.prior_ratio - 1.5).abs() < 1e-12);
        assert!((snapshot.current_ratio - 3.0).abs() < 1e-12);
        assert!((snapshot.delta().unwrap() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_row_is_not_applicable() {
        let statement = Statement::new(vec![LineItem::new("CURRENT ASSETS", 50.0, 80.0)]);

        let snapshot = extract_liquidity(&statement, &RowLabels::default());

        assert!(!snapshot.resolvable);
        assert_eq!(snapshot.delta(), None);
        assert_eq!(snapshot.missing_rows, vec!["CURRENT LIABILITIES".to_string()]);
    }

    #[test]
    fn test_vietnamese_labels() {
        let statement = Statement::new(vec![
            LineItem::new("A. TÀI SẢN NGẮN HẠN", 400.0, 500.0),
            LineItem::new("I. Nợ ngắn hạn", 200.0, 250.0),
        ]);

        let snapshot = extract_liquidity(&statement, &RowLabels::vietnamese());

        assert!(snapshot.resolvable);
        assert!((snapshot.prior_ratio - 2.0).abs() < 1e-12);
        assert!((snapshot.current_ratio - 2.0).abs() < 1e-12);
    }
}
