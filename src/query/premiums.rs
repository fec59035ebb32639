//! Monthly premium sums per customer and per agent.

use std::collections::{BTreeMap, HashMap};

use crate::model::{Customer, Policy};

/// Sum of `premium_per_month` over the policies owned by `customer_id`; 0.0 when none.
pub fn sum_monthly_premium_for_customer(policies: &[Policy], customer_id: i64) -> f64 {
    policies
        .iter()
        .filter(|p| p.customer_id == customer_id)
        .fold(0.0, |acc, p| acc + p.premium_per_month)
}

/// Monthly premium per customer id, for every customer id that owns at least one policy.
///
/// Each entry equals [`sum_monthly_premium_for_customer`] for that id: premiums are added in
/// policy order.
pub fn premium_by_customer(policies: &[Policy]) -> HashMap<i64, f64> {
    let mut totals: HashMap<i64, f64> = HashMap::new();
    for p in policies {
        *totals.entry(p.customer_id).or_insert(0.0) += p.premium_per_month;
    }
    totals
}

/// Customer paying the highest total monthly premium.
///
/// Only a strictly higher total replaces the current best, so ties go to the earliest customer.
/// Customers without policies count as 0.0, which still competes. `None` only when `customers`
/// is empty.
pub fn customer_with_highest_total_premium<'a>(
    customers: &'a [Customer],
    policies: &[Policy],
) -> Option<&'a Customer> {
    let totals = premium_by_customer(policies);
    let total_for = |c: &Customer| totals.get(&c.id).copied().unwrap_or(0.0);

    let mut iter = customers.iter();
    let mut best = iter.next()?;
    let mut best_total = total_for(best);
    for c in iter {
        let total = total_for(c);
        if total > best_total {
            best = c;
            best_total = total;
        }
    }
    Some(best)
}

/// Total monthly premium across each agent's customers, keyed by the customers' raw `agent_id`.
///
/// Agent ids are not checked against any agent collection. Agents whose customers own no
/// policies do not appear.
pub fn total_premium_by_agent(customers: &[Customer], policies: &[Policy]) -> BTreeMap<i64, f64> {
    let per_customer = premium_by_customer(policies);

    let mut totals = BTreeMap::new();
    for c in customers {
        if let Some(premium) = per_customer.get(&c.id) {
            *totals.entry(c.agent_id).or_insert(0.0) += premium;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_support::{customer, policy};

    fn policies() -> Vec<Policy> {
        vec![
            policy(1, 372, 100.25),
            policy(2, 372, 174.50),
            policy(3, 5, 80.0),
            policy(4, 6, 274.75),
            policy(5, 7, 0.0),
        ]
    }

    #[test]
    fn sums_premiums_for_one_customer() {
        let policies = policies();
        assert!((sum_monthly_premium_for_customer(&policies, 372) - 274.75).abs() < 1e-9);
        assert_eq!(sum_monthly_premium_for_customer(&policies, 0), 0.0);
        assert_eq!(sum_monthly_premium_for_customer(&policies, 5001), 0.0);
        assert_eq!(policies.len(), 5);
    }

    #[test]
    fn premium_by_customer_agrees_with_single_sum() {
        let policies = policies();
        let totals = premium_by_customer(&policies);
        for (&id, &total) in &totals {
            assert_eq!(total, sum_monthly_premium_for_customer(&policies, id));
        }
        assert_eq!(totals.len(), 4);
        assert!(!totals.contains_key(&0));
    }

    #[test]
    fn highest_premium_keeps_first_on_tie() {
        let customers = vec![
            customer(5, "Low", "Payer", "TX", 1),
            customer(372, "Vyky", "First", "TX", 1),
            customer(6, "Vyky", "Second", "TX", 2),
        ];
        let best = customer_with_highest_total_premium(&customers, &policies()).unwrap();
        assert_eq!(best.id, 372);
        assert_eq!(best.last_name, "First");
    }

    #[test]
    fn highest_premium_with_no_policies_is_first_customer() {
        let customers = vec![customer(8, "A", "B", "TX", 1), customer(9, "C", "D", "TX", 1)];
        let best = customer_with_highest_total_premium(&customers, &[]).unwrap();
        assert_eq!(best.id, 8);
        assert!(customer_with_highest_total_premium(&[], &policies()).is_none());
    }

    #[test]
    fn agent_totals_keep_dangling_ids_and_skip_policyless_customers() {
        let customers = vec![
            customer(372, "A", "A", "TX", 13),
            customer(5, "B", "B", "TX", 13),
            // Agent 2000 does not exist anywhere; still keyed.
            customer(6, "C", "C", "TX", 2000),
            // No policies at all.
            customer(8, "D", "D", "TX", 1001),
            // Zero-premium policy still produces an entry.
            customer(7, "E", "E", "TX", 424),
        ];
        let totals = total_premium_by_agent(&customers, &policies());
        assert!((totals[&13] - 354.75).abs() < 0.02);
        assert!((totals[&2000] - 274.75).abs() < 0.02);
        assert_eq!(totals.get(&424), Some(&0.0));
        assert!(!totals.contains_key(&1001));
        assert_eq!(totals.len(), 3);
    }
}
