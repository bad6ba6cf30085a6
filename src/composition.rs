use crate::error::{Result, StatementError};
use crate::schema::{AnchorTotals, DerivedLineItem, LineItem, Statement};
use crate::utils::{resolve_row_index, safe_divisor};
use log::debug;

/// Period-over-period growth in percent.
///
/// A zero prior value is replaced by [`crate::utils::EPSILON`], so growth from
/// nothing reports an enormous finite percentage rather than infinity.
pub fn growth_pct(prior: f64, current: f64) -> f64 {
    (current - prior) / safe_divisor(prior) * 100.0
}

pub fn weight_pct(value: f64, anchor: f64) -> f64 {
    value / safe_divisor(anchor) * 100.0
}

pub fn resolve_anchor(statement: &Statement, label: &str) -> Result<AnchorTotals> {
    let row_index =
        resolve_row_index(statement, label).ok_or_else(|| StatementError::AnchorNotFound {
            label: label.to_string(),
        })?;
    let row = &statement.items[row_index];

    Ok(AnchorTotals {
        row_index,
        prior: row.prior_value,
        current: row.current_value,
    })
}

/// Growth and composition weights for every row, in statement order.
///
/// Fails with [`StatementError::AnchorNotFound`] when no row matches
/// `anchor_label`; nothing is derived in that case.
pub fn derive_line_items(
    statement: &Statement,
    anchor_label: &str,
) -> Result<(Vec<DerivedLineItem>, AnchorTotals)> {
    let anchor = resolve_anchor(statement, anchor_label)?;
    debug!(
        "Anchor '{}' resolved at row {} (prior {}, current {})",
        anchor_label, anchor.row_index, anchor.prior, anchor.current
    );

    let items = statement
        .items
        .iter()
        .map(|item| derive_item(item, &anchor))
        .collect();

    Ok((items, anchor))
}

fn derive_item(item: &LineItem, anchor: &AnchorTotals) -> DerivedLineItem {
    DerivedLineItem {
        item: item.clone(),
        growth_pct: growth_pct(item.prior_value, item.current_value),
        prior_weight_pct: weight_pct(item.prior_value, anchor.prior),
        current_weight_pct: weight_pct(item.current_value, anchor.current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.005
    }

    #[test]
    fn test_growth_and_weights() {
        let statement = Statement::new(vec![
            LineItem::new("TOTAL ASSETS", 100.0, 150.0),
            LineItem::new("CASH", 20.0, 40.0),
        ]);

        let (items, anchor) = derive_line_items(&statement, "TOTAL ASSETS").unwrap();

        assert_eq!(anchor.row_index, 0);
        let cash = &items[1];
        assert!(approx(cash.growth_pct, 100.0));
        assert!(approx(cash.prior_weight_pct, 20.0));
        assert!(approx(cash.current_weight_pct, 26.67));
        assert!(approx(items[0].prior_weight_pct, 100.0));
        assert!(approx(items[0].growth_pct, 50.0));
    }

    #[test]
    fn test_zero_anchor_is_finite() {
        let statement = Statement::new(vec![LineItem::new("TOTAL ASSETS", 0.0, 50.0)]);

        let (items, _) = derive_line_items(&statement, "total assets").unwrap();

        let item = &items[0];
        assert!(item.prior_weight_pct.is_finite());
        assert_eq!(item.prior_weight_pct, 0.0);
        assert!(item.growth_pct.is_finite());
        assert!(item.growth_pct > 1e12);
        assert!(approx(item.current_weight_pct, 100.0));
    }

    #[test]
    fn test_zero_anchor_weight_for_other_rows() {
        let statement = Statement::new(vec![
            LineItem::new("TOTAL ASSETS", 0.0, 10.0),
            LineItem::new("CASH", 5.0, 5.0),
        ]);

        let (items, _) = derive_line_items(&statement, "TOTAL ASSETS").unwrap();

        assert!(items[1].prior_weight_pct.is_finite());
        assert!(approx(items[1].prior_weight_pct, 5.0 / 1e-9 * 100.0));
    }

    #[test]
    fn test_missing_anchor() {
        let statement = Statement::new(vec![LineItem::new("CASH", 20.0, 40.0)]);

        let result = derive_line_items(&statement, "TOTAL ASSETS");

        assert!(matches!(
            result,
            Err(StatementError::AnchorNotFound { ref label }) if label == "TOTAL ASSETS"
        ));
    }

    #[test]
    fn test_first_anchor_row_is_used() {
        let statement = Statement::new(vec![
            LineItem::new("CASH", 10.0, 10.0),
            LineItem::new("Total assets", 50.0, 50.0),
            LineItem::new("TOTAL ASSETS", 100.0, 100.0),
        ]);

        let (items, anchor) = derive_line_items(&statement, "TOTAL ASSETS").unwrap();

        assert_eq!(anchor.row_index, 1);
        assert!(approx(items[0].prior_weight_pct, 20.0));
    }
}
